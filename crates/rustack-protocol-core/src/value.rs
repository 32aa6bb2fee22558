//! The in-memory value model.
//!
//! Every field value flows through the codecs as a [`Value`]. Structured
//! shapes implement [`StructuredValue`], which exposes their static field
//! descriptors and a getter/setter pair keyed by descriptor. Generated shapes
//! implement the trait by hand; [`DynamicStruct`] implements it for shapes
//! known only by their descriptors.

use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::descriptor::{FieldDescriptor, ValueKind};
use crate::error::{ProtocolError, ProtocolResult};

/// A structured value: a shape with named, described fields.
pub trait StructuredValue: fmt::Debug + Send + Sync + 'static {
    /// The ordered field descriptors of this shape.
    fn fields(&self) -> &'static [FieldDescriptor];

    /// Read the value of `field`, or `None` when it is unset.
    fn get(&self, field: &FieldDescriptor) -> Option<Value>;

    /// Write the value of `field`.
    fn set(&mut self, field: &FieldDescriptor, value: Value) -> ProtocolResult<()>;

    /// Clone into a new box.
    fn clone_boxed(&self) -> Box<dyn StructuredValue>;

    /// Convert into `Box<dyn Any>` for downcasting to the concrete shape.
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl Clone for Box<dyn StructuredValue> {
    fn clone(&self) -> Self {
        self.clone_boxed()
    }
}

/// An arbitrary-precision decimal kept in its canonical text form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BigDecimal(String);

impl BigDecimal {
    /// The decimal text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for BigDecimal {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if is_decimal_literal(s) {
            Ok(Self(s.to_owned()))
        } else {
            Err(ProtocolError::ParseError(format!("invalid decimal: {s:?}")))
        }
    }
}

impl fmt::Display for BigDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `-?digits(.digits)?([eE][+-]?digits)?`
fn is_decimal_literal(s: &str) -> bool {
    fn digits(s: &str) -> usize {
        s.bytes().take_while(u8::is_ascii_digit).count()
    }

    let rest = s.strip_prefix(['-', '+']).unwrap_or(s);
    let int_len = digits(rest);
    let mut rest = &rest[int_len..];
    let mut frac_len = 0;
    if let Some(frac) = rest.strip_prefix('.') {
        frac_len = digits(frac);
        if frac_len == 0 {
            return false;
        }
        rest = &frac[frac_len..];
    }
    if int_len == 0 && frac_len == 0 {
        return false;
    }
    if let Some(exp) = rest.strip_prefix(['e', 'E']) {
        let exp = exp.strip_prefix(['-', '+']).unwrap_or(exp);
        let exp_len = digits(exp);
        return exp_len > 0 && exp_len == exp.len();
    }
    rest.is_empty()
}

/// A field value.
#[derive(Debug, Clone)]
pub enum Value {
    /// UTF-8 text.
    String(String),
    /// 32-bit signed integer.
    Integer(i32),
    /// 64-bit signed integer.
    Long(i64),
    /// 32-bit float.
    Float(f32),
    /// 64-bit float.
    Double(f64),
    /// Arbitrary-precision decimal.
    BigDecimal(BigDecimal),
    /// Boolean.
    Boolean(bool),
    /// Point in time.
    Instant(DateTime<Utc>),
    /// Opaque binary.
    Bytes(Bytes),
    /// A structured value.
    Nested(Box<dyn StructuredValue>),
    /// Ordered sequence.
    List(Vec<Value>),
    /// String-keyed map, iterated in key order.
    Map(BTreeMap<String, Value>),
    /// Explicit absence.
    Null,
}

impl Value {
    /// Wrap a structured shape.
    pub fn nested<T: StructuredValue>(value: T) -> Self {
        Self::Nested(Box::new(value))
    }

    /// The kind of this value.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::String(_) => ValueKind::String,
            Self::Integer(_) => ValueKind::Integer,
            Self::Long(_) => ValueKind::Long,
            Self::Float(_) => ValueKind::Float,
            Self::Double(_) => ValueKind::Double,
            Self::BigDecimal(_) => ValueKind::BigDecimal,
            Self::Boolean(_) => ValueKind::Boolean,
            Self::Instant(_) => ValueKind::Instant,
            Self::Bytes(_) => ValueKind::Bytes,
            Self::Nested(_) => ValueKind::Nested,
            Self::List(_) => ValueKind::List,
            Self::Map(_) => ValueKind::Map,
            Self::Null => ValueKind::Null,
        }
    }

    /// Whether this is [`Value::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Fail with [`ProtocolError::ValueMismatch`] unless this value has kind `expected`.
    pub fn expect_kind(&self, expected: ValueKind) -> ProtocolResult<()> {
        let actual = self.kind();
        if actual == expected {
            Ok(())
        } else {
            Err(ProtocolError::ValueMismatch { expected, actual })
        }
    }

    /// Downcast a nested value into its concrete shape.
    pub fn into_structured<T: StructuredValue>(self) -> ProtocolResult<T> {
        match self {
            Self::Nested(inner) => inner.into_any().downcast::<T>().map(|b| *b).map_err(|_| {
                ProtocolError::ParseError(format!(
                    "nested value is not a {}",
                    std::any::type_name::<T>()
                ))
            }),
            other => Err(ProtocolError::ValueMismatch {
                expected: ValueKind::Nested,
                actual: other.kind(),
            }),
        }
    }

    /// Convert into a typed Rust value.
    pub fn into_typed<T: FromValue>(self) -> ProtocolResult<T> {
        T::from_value(self)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Long(a), Self::Long(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Double(a), Self::Double(b)) => a == b,
            (Self::BigDecimal(a), Self::BigDecimal(b)) => a == b,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Instant(a), Self::Instant(b)) => a == b,
            (Self::Bytes(a), Self::Bytes(b)) => a == b,
            (Self::Nested(a), Self::Nested(b)) => structurally_equal(a.as_ref(), b.as_ref()),
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            (Self::Null, Self::Null) => true,
            _ => false,
        }
    }
}

/// Two structured values are equal when they share a shape and every field matches.
#[must_use]
pub fn structurally_equal(a: &dyn StructuredValue, b: &dyn StructuredValue) -> bool {
    let fields = a.fields();
    std::ptr::eq(fields, b.fields()) && fields.iter().all(|f| a.get(f) == b.get(f))
}

/// Conversion out of a [`Value`] into a typed Rust value.
pub trait FromValue: Sized {
    /// Perform the conversion.
    fn from_value(value: Value) -> ProtocolResult<Self>;
}

macro_rules! scalar_value {
    ($ty:ty, $variant:ident) => {
        impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Self::$variant(v)
            }
        }

        impl FromValue for $ty {
            fn from_value(value: Value) -> ProtocolResult<Self> {
                match value {
                    Value::$variant(v) => Ok(v),
                    other => Err(ProtocolError::ValueMismatch {
                        expected: ValueKind::$variant,
                        actual: other.kind(),
                    }),
                }
            }
        }
    };
}

scalar_value!(String, String);
scalar_value!(i32, Integer);
scalar_value!(i64, Long);
scalar_value!(f32, Float);
scalar_value!(f64, Double);
scalar_value!(BigDecimal, BigDecimal);
scalar_value!(bool, Boolean);
scalar_value!(DateTime<Utc>, Instant);
scalar_value!(Bytes, Bytes);

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_owned())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<BTreeMap<String, T>> for Value {
    fn from(v: BTreeMap<String, T>) -> Self {
        Self::Map(v.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl<T: Into<Value>> From<HashMap<String, T>> for Value {
    fn from(v: HashMap<String, T>) -> Self {
        Self::Map(v.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> ProtocolResult<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

/// Null members are kept when `T` can hold them (`Vec<Option<T>>`) and
/// dropped otherwise.
impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> ProtocolResult<Self> {
        match value {
            Value::List(items) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::Null => T::from_value(Value::Null).ok().map(Ok),
                    item => Some(T::from_value(item)),
                })
                .collect(),
            other => Err(ProtocolError::ValueMismatch {
                expected: ValueKind::List,
                actual: other.kind(),
            }),
        }
    }
}

impl<T: FromValue> FromValue for BTreeMap<String, T> {
    fn from_value(value: Value) -> ProtocolResult<Self> {
        match value {
            Value::Map(entries) => entries
                .into_iter()
                .map(|(k, v)| Ok((k, T::from_value(v)?)))
                .collect(),
            other => Err(ProtocolError::ValueMismatch {
                expected: ValueKind::Map,
                actual: other.kind(),
            }),
        }
    }
}

impl<T: FromValue> FromValue for HashMap<String, T> {
    fn from_value(value: Value) -> ProtocolResult<Self> {
        BTreeMap::<String, T>::from_value(value).map(|m| m.into_iter().collect())
    }
}

impl FromValue for Value {
    fn from_value(value: Value) -> ProtocolResult<Self> {
        Ok(value)
    }
}

/// A structured value known only by its field descriptors.
///
/// Values are stored by member name. Setting a field not present in the
/// descriptor table is rejected.
#[derive(Clone)]
pub struct DynamicStruct {
    fields: &'static [FieldDescriptor],
    values: BTreeMap<&'static str, Value>,
}

impl DynamicStruct {
    /// An empty value of the shape described by `fields`.
    #[must_use]
    pub fn new(fields: &'static [FieldDescriptor]) -> Self {
        Self {
            fields,
            values: BTreeMap::new(),
        }
    }

    /// Set a member by name, builder style.
    ///
    /// Unknown member names are ignored.
    #[must_use]
    pub fn with(mut self, member_name: &str, value: impl Into<Value>) -> Self {
        if let Some(field) = self.field(member_name) {
            self.values.insert(field.member_name, value.into());
        }
        self
    }

    /// Read a member by name.
    #[must_use]
    pub fn value(&self, member_name: &str) -> Option<&Value> {
        self.values.get(member_name)
    }

    /// Find a descriptor by member name.
    #[must_use]
    pub fn field(&self, member_name: &str) -> Option<&'static FieldDescriptor> {
        self.fields.iter().find(|f| f.member_name == member_name)
    }
}

impl fmt::Debug for DynamicStruct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.values.iter()).finish()
    }
}

impl StructuredValue for DynamicStruct {
    fn fields(&self) -> &'static [FieldDescriptor] {
        self.fields
    }

    fn get(&self, field: &FieldDescriptor) -> Option<Value> {
        self.values.get(field.member_name).cloned()
    }

    fn set(&mut self, field: &FieldDescriptor, value: Value) -> ProtocolResult<()> {
        let known = self.field(field.member_name).ok_or_else(|| {
            ProtocolError::MissingWireMetadata(format!(
                "shape has no member named '{}'",
                field.member_name
            ))
        })?;
        self.values.insert(known.member_name, value);
        Ok(())
    }

    fn clone_boxed(&self) -> Box<dyn StructuredValue> {
        Box::new(self.clone())
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}
