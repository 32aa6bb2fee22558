//! Field descriptors.
//!
//! A [`FieldDescriptor`] is the static wire metadata of one member of a
//! structured value: its member name, where it is bound in the HTTP exchange,
//! its value kind, its wire name, and the optional traits that refine how it
//! is encoded. Descriptors are built in `const` context so generated shapes
//! can keep them in `static` tables that are shared freely across threads.
//!
//! Each trait has a fixed slot. Asking for a trait the descriptor lacks is a
//! [`ProtocolError::MissingWireMetadata`] error rather than a silent default.

use std::fmt;
use std::str::FromStr;

use crate::error::{ProtocolError, ProtocolResult};
use crate::value::{StructuredValue, Value};

/// Element name used for map entries in XML.
pub const MAP_ENTRY_ELEMENT: &str = "entry";

/// Element name used for list members in XML when no member name is declared.
pub const DEFAULT_LIST_MEMBER: &str = "member";

/// Where in the HTTP exchange a field is bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Location {
    /// The request or response body.
    Payload,
    /// An HTTP header.
    Header,
    /// A query-string parameter.
    QueryParam,
    /// A `{Name}` segment of the URI template.
    PathParam,
    /// A `{Name+}` segment of the URI template that may span slashes.
    GreedyPathParam,
    /// The HTTP status code of a response.
    StatusCode,
}

impl Location {
    /// Number of locations.
    pub const COUNT: usize = 6;

    /// Every location, in index order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Payload,
        Self::Header,
        Self::QueryParam,
        Self::PathParam,
        Self::GreedyPathParam,
        Self::StatusCode,
    ];

    /// Dense index of this location, used by registry tables.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// The semantic type of a field's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueKind {
    /// UTF-8 text.
    String,
    /// 32-bit signed integer.
    Integer,
    /// 64-bit signed integer.
    Long,
    /// 32-bit float.
    Float,
    /// 64-bit float.
    Double,
    /// Arbitrary-precision decimal.
    BigDecimal,
    /// Boolean.
    Boolean,
    /// Point in time.
    Instant,
    /// Opaque binary.
    Bytes,
    /// A structured value with its own field descriptors.
    Nested,
    /// Ordered sequence.
    List,
    /// String-keyed map.
    Map,
    /// Absent value.
    Null,
}

impl ValueKind {
    /// Number of value kinds.
    pub const COUNT: usize = 13;

    /// Every kind, in index order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::String,
        Self::Integer,
        Self::Long,
        Self::Float,
        Self::Double,
        Self::BigDecimal,
        Self::Boolean,
        Self::Instant,
        Self::Bytes,
        Self::Nested,
        Self::List,
        Self::Map,
        Self::Null,
    ];

    /// Kinds that render as a single text token.
    pub const SCALARS: [Self; 9] = [
        Self::String,
        Self::Integer,
        Self::Long,
        Self::Float,
        Self::Double,
        Self::BigDecimal,
        Self::Boolean,
        Self::Instant,
        Self::Bytes,
    ];

    /// Dense index of this kind, used by registry tables.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Whether this kind renders as a single text token.
    #[must_use]
    pub const fn is_scalar(self) -> bool {
        !matches!(self, Self::Nested | Self::List | Self::Map | Self::Null)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Wire format of an instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimestampFormat {
    /// `2024-01-15T10:30:00.000Z`
    Iso8601,
    /// `Mon, 15 Jan 2024 10:30:00 GMT`
    Rfc822,
    /// Seconds since the epoch, with optional fractional milliseconds.
    UnixTimestamp,
}

impl TimestampFormat {
    /// The format tag used in service models.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Iso8601 => "iso8601",
            Self::Rfc822 => "rfc822",
            Self::UnixTimestamp => "unixTimestamp",
        }
    }
}

impl FromStr for TimestampFormat {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "iso8601" => Ok(Self::Iso8601),
            "rfc822" => Ok(Self::Rfc822),
            "unixTimestamp" => Ok(Self::UnixTimestamp),
            other => Err(ProtocolError::UnrecognizedTimestampFormat(other.to_owned())),
        }
    }
}

impl fmt::Display for TimestampFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Creates an empty instance of a nested shape.
pub type Constructor = fn() -> Box<dyn StructuredValue>;

/// Fills in or rewrites a field value before it is marshalled.
pub type DefaultResolver = fn(Option<Value>) -> Option<Value>;

/// List metadata: the member descriptor and XML member naming.
#[derive(Debug, Clone, Copy)]
pub struct ListTrait {
    /// Descriptor applied to every member.
    pub member: &'static FieldDescriptor,
    /// Explicit XML member element name.
    pub member_wire_name: Option<&'static str>,
    /// Whether members are written directly under the parent without a wrapper.
    pub flattened: bool,
}

impl ListTrait {
    /// A wrapped list whose members are described by `member`.
    #[must_use]
    pub const fn new(member: &'static FieldDescriptor) -> Self {
        Self {
            member,
            member_wire_name: None,
            flattened: false,
        }
    }

    /// Set the member element name.
    #[must_use]
    pub const fn member_wire_name(mut self, name: &'static str) -> Self {
        self.member_wire_name = Some(name);
        self
    }

    /// Mark the list as flattened.
    #[must_use]
    pub const fn flattened(mut self) -> Self {
        self.flattened = true;
        self
    }

    /// XML element name of each member of a list whose own wire name is `list_wire_name`.
    ///
    /// An explicit member name wins. Otherwise flattened members repeat the
    /// list's wire name and wrapped members are called `member`.
    #[must_use]
    pub fn member_element_name<'a>(&self, list_wire_name: &'a str) -> &'a str {
        match self.member_wire_name {
            Some(name) => name,
            None if self.flattened => list_wire_name,
            None => DEFAULT_LIST_MEMBER,
        }
    }
}

/// Map metadata: key/value element names and the value descriptor.
#[derive(Debug, Clone, Copy)]
pub struct MapTrait {
    /// Element name of an entry's key.
    pub key_wire_name: &'static str,
    /// Element name of an entry's value.
    pub value_wire_name: &'static str,
    /// Descriptor applied to every value.
    pub value: &'static FieldDescriptor,
    /// Whether entries are written directly under the parent without a wrapper.
    pub flattened: bool,
}

impl MapTrait {
    /// A wrapped map with `key`/`value` element names.
    #[must_use]
    pub const fn new(value: &'static FieldDescriptor) -> Self {
        Self {
            key_wire_name: "key",
            value_wire_name: "value",
            value,
            flattened: false,
        }
    }

    /// Set the key element name.
    #[must_use]
    pub const fn key_wire_name(mut self, name: &'static str) -> Self {
        self.key_wire_name = name;
        self
    }

    /// Set the value element name.
    #[must_use]
    pub const fn value_wire_name(mut self, name: &'static str) -> Self {
        self.value_wire_name = name;
        self
    }

    /// Mark the map as flattened.
    ///
    /// Flattened entries are written as `<entry>` siblings of the other
    /// members, so a structure may hold at most one flattened map.
    #[must_use]
    pub const fn flattened(mut self) -> Self {
        self.flattened = true;
        self
    }
}

/// Static wire metadata of one member of a structured value.
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    /// Name of the member on the in-memory shape.
    pub member_name: &'static str,
    /// Where the field is bound.
    pub location: Location,
    /// The field's value kind.
    pub kind: ValueKind,
    /// Name on the wire: element, JSON member, header, query parameter or path placeholder.
    pub wire_name: &'static str,
    /// Present for list fields.
    pub list: Option<ListTrait>,
    /// Present for map fields.
    pub map: Option<MapTrait>,
    /// Overrides the location's default timestamp format.
    pub timestamp_format: Option<TimestampFormat>,
    /// Default value resolver run before marshalling.
    pub default_value: Option<DefaultResolver>,
    /// Whether the field is the explicit payload of its operation.
    pub payload: bool,
    /// XML namespace URI declared by this field.
    pub xml_namespace: Option<&'static str>,
    /// Whether the field is an XML attribute of its parent element.
    pub xml_attribute: bool,
    /// Present for nested fields.
    pub constructor: Option<Constructor>,
}

impl FieldDescriptor {
    /// A descriptor with no traits.
    #[must_use]
    pub const fn new(
        member_name: &'static str,
        location: Location,
        kind: ValueKind,
        wire_name: &'static str,
    ) -> Self {
        Self {
            member_name,
            location,
            kind,
            wire_name,
            list: None,
            map: None,
            timestamp_format: None,
            default_value: None,
            payload: false,
            xml_namespace: None,
            xml_attribute: false,
            constructor: None,
        }
    }

    /// A payload-bound descriptor whose wire name equals its member name.
    #[must_use]
    pub const fn member(name: &'static str, kind: ValueKind) -> Self {
        Self::new(name, Location::Payload, kind, name)
    }

    /// Attach list metadata.
    #[must_use]
    pub const fn with_list(mut self, list: ListTrait) -> Self {
        self.list = Some(list);
        self
    }

    /// Attach map metadata.
    #[must_use]
    pub const fn with_map(mut self, map: MapTrait) -> Self {
        self.map = Some(map);
        self
    }

    /// Override the timestamp format.
    #[must_use]
    pub const fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = Some(format);
        self
    }

    /// Attach a default value resolver.
    #[must_use]
    pub const fn with_default_value(mut self, resolver: DefaultResolver) -> Self {
        self.default_value = Some(resolver);
        self
    }

    /// Mark as the explicit payload member.
    #[must_use]
    pub const fn as_payload(mut self) -> Self {
        self.payload = true;
        self
    }

    /// Declare an XML namespace.
    #[must_use]
    pub const fn with_xml_namespace(mut self, uri: &'static str) -> Self {
        self.xml_namespace = Some(uri);
        self
    }

    /// Mark as an XML attribute.
    #[must_use]
    pub const fn as_xml_attribute(mut self) -> Self {
        self.xml_attribute = true;
        self
    }

    /// Attach the nested shape constructor.
    #[must_use]
    pub const fn with_constructor(mut self, constructor: Constructor) -> Self {
        self.constructor = Some(constructor);
        self
    }

    /// The list trait, required for list fields.
    pub fn list_trait(&self) -> ProtocolResult<&ListTrait> {
        self.list.as_ref().ok_or_else(|| {
            ProtocolError::MissingWireMetadata(format!(
                "list field '{}' has no list trait",
                self.member_name
            ))
        })
    }

    /// The map trait, required for map fields.
    pub fn map_trait(&self) -> ProtocolResult<&MapTrait> {
        self.map.as_ref().ok_or_else(|| {
            ProtocolError::MissingWireMetadata(format!(
                "map field '{}' has no map trait",
                self.member_name
            ))
        })
    }

    /// Create an empty instance of the nested shape, required for nested fields.
    pub fn construct(&self) -> ProtocolResult<Box<dyn StructuredValue>> {
        self.constructor.map(|ctor| ctor()).ok_or_else(|| {
            ProtocolError::MissingWireMetadata(format!(
                "nested field '{}' has no constructor",
                self.member_name
            ))
        })
    }

    /// Apply the default value resolver, if any.
    #[must_use]
    pub fn resolve_value(&self, value: Option<Value>) -> Option<Value> {
        match self.default_value {
            Some(resolver) => resolver(value),
            None => value,
        }
    }

    /// The registry kind to dispatch `value` on.
    ///
    /// [`Value::Null`] dispatches as [`ValueKind::Null`]; any other value must
    /// have the declared kind.
    pub fn dispatch_kind(&self, value: &Value) -> ProtocolResult<ValueKind> {
        if value.is_null() {
            return Ok(ValueKind::Null);
        }
        value.expect_kind(self.kind)?;
        Ok(self.kind)
    }

    /// Whether the field is a flattened list or map.
    #[must_use]
    pub fn is_flattened(&self) -> bool {
        self.list.is_some_and(|l| l.flattened) || self.map.is_some_and(|m| m.flattened)
    }

    /// The XML element name under which this field's data appears in its parent.
    ///
    /// Flattened lists appear as their member elements and flattened maps as
    /// `entry` elements; everything else uses the wire name.
    #[must_use]
    pub fn xml_element_name(&self) -> &'static str {
        match (self.kind, self.list, self.map) {
            (ValueKind::List, Some(list), _) if list.flattened => {
                list.member_element_name(self.wire_name)
            }
            (ValueKind::Map, _, Some(map)) if map.flattened => MAP_ENTRY_ELEMENT,
            _ => self.wire_name,
        }
    }
}
