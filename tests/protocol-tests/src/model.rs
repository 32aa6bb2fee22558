//! Shapes exercised by the protocol tests, laid out as generated model code.

use std::any::Any;
use std::collections::BTreeMap;

use bytes::Bytes;
use chrono::{DateTime, TimeZone, Utc};
use rustack_protocol_core::{
    BigDecimal, FieldDescriptor, FromValue, ListTrait, Location, MapTrait, ProtocolError,
    ProtocolResult, StructuredValue, TimestampFormat, Value, ValueKind,
};

/// Namespace of the S3 REST-XML API.
pub const S3_NAMESPACE: &str = "http://s3.amazonaws.com/doc/2006-03-01/";

static STRING_MEMBER: FieldDescriptor = FieldDescriptor::member("member", ValueKind::String);

static SIMPLE_STRUCT_MEMBER: FieldDescriptor =
    FieldDescriptor::member("member", ValueKind::Nested).with_constructor(SimpleStruct::construct);

fn unknown_member(shape: &str, member: &str) -> ProtocolError {
    ProtocolError::MissingWireMetadata(format!("{shape} has no member '{member}'"))
}

// ---------------------------------------------------------------------------
// SimpleStruct
// ---------------------------------------------------------------------------

static SIMPLE_STRUCT_FIELDS: [FieldDescriptor; 1] =
    [FieldDescriptor::member("Value", ValueKind::String)];

/// A structure with one string member.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimpleStruct {
    /// `Value`
    pub value: Option<String>,
}

impl SimpleStruct {
    /// A `SimpleStruct` holding `value`.
    #[must_use]
    pub fn of(value: &str) -> Self {
        Self {
            value: Some(value.to_owned()),
        }
    }

    /// An empty instance, used as the nested-shape constructor.
    #[must_use]
    pub fn construct() -> Box<dyn StructuredValue> {
        Box::new(Self::default())
    }
}

impl StructuredValue for SimpleStruct {
    fn fields(&self) -> &'static [FieldDescriptor] {
        &SIMPLE_STRUCT_FIELDS
    }

    fn get(&self, field: &FieldDescriptor) -> Option<Value> {
        match field.member_name {
            "Value" => self.value.clone().map(Value::from),
            _ => None,
        }
    }

    fn set(&mut self, field: &FieldDescriptor, value: Value) -> ProtocolResult<()> {
        match field.member_name {
            "Value" => self.value = Some(value.into_typed()?),
            other => return Err(unknown_member("SimpleStruct", other)),
        }
        Ok(())
    }

    fn clone_boxed(&self) -> Box<dyn StructuredValue> {
        Box::new(self.clone())
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

impl From<SimpleStruct> for Value {
    fn from(v: SimpleStruct) -> Self {
        Value::nested(v)
    }
}

impl FromValue for SimpleStruct {
    fn from_value(value: Value) -> ProtocolResult<Self> {
        value.into_structured()
    }
}

// ---------------------------------------------------------------------------
// AllTypes
// ---------------------------------------------------------------------------

static ALL_TYPES_FIELDS: [FieldDescriptor; 14] = [
    FieldDescriptor::member("StringMember", ValueKind::String),
    FieldDescriptor::member("IntegerMember", ValueKind::Integer),
    FieldDescriptor::member("LongMember", ValueKind::Long),
    FieldDescriptor::member("FloatMember", ValueKind::Float),
    FieldDescriptor::member("DoubleMember", ValueKind::Double),
    FieldDescriptor::member("BigDecimalMember", ValueKind::BigDecimal),
    FieldDescriptor::member("BooleanMember", ValueKind::Boolean),
    FieldDescriptor::member("TimestampMember", ValueKind::Instant),
    FieldDescriptor::member("EpochMember", ValueKind::Instant)
        .with_timestamp_format(TimestampFormat::UnixTimestamp),
    FieldDescriptor::member("BlobMember", ValueKind::Bytes),
    FieldDescriptor::member("ListMember", ValueKind::List)
        .with_list(ListTrait::new(&STRING_MEMBER)),
    FieldDescriptor::member("MapMember", ValueKind::Map).with_map(MapTrait::new(&STRING_MEMBER)),
    FieldDescriptor::member("StructList", ValueKind::List).with_list(
        ListTrait::new(&SIMPLE_STRUCT_MEMBER)
            .member_wire_name("Struct")
            .flattened(),
    ),
    FieldDescriptor::member("Nested", ValueKind::Nested).with_constructor(AllTypes::construct),
];

/// A structure with one member of every value kind, nesting itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AllTypes {
    /// `StringMember`
    pub string_member: Option<String>,
    /// `IntegerMember`
    pub integer_member: Option<i32>,
    /// `LongMember`
    pub long_member: Option<i64>,
    /// `FloatMember`
    pub float_member: Option<f32>,
    /// `DoubleMember`
    pub double_member: Option<f64>,
    /// `BigDecimalMember`
    pub big_decimal_member: Option<BigDecimal>,
    /// `BooleanMember`
    pub boolean_member: Option<bool>,
    /// `TimestampMember`
    pub timestamp_member: Option<DateTime<Utc>>,
    /// `EpochMember`, written as epoch seconds.
    pub epoch_member: Option<DateTime<Utc>>,
    /// `BlobMember`
    pub blob_member: Option<Bytes>,
    /// `ListMember`
    pub list_member: Option<Vec<String>>,
    /// `MapMember`
    pub map_member: Option<BTreeMap<String, String>>,
    /// `StructList`, flattened as `Struct` elements in XML.
    pub struct_list: Option<Vec<SimpleStruct>>,
    /// `Nested`
    pub nested: Option<Box<AllTypes>>,
}

impl AllTypes {
    /// An empty instance, used as the nested-shape constructor.
    #[must_use]
    pub fn construct() -> Box<dyn StructuredValue> {
        Box::new(Self::default())
    }

    /// A value populating every member, nested three levels deep.
    #[must_use]
    pub fn sample() -> Self {
        let leaf = Self {
            string_member: Some("leaf".to_owned()),
            integer_member: Some(i32::MIN),
            ..Self::default()
        };
        let middle = Self {
            long_member: Some(i64::MAX),
            list_member: Some(Vec::new()),
            nested: Some(Box::new(leaf)),
            ..Self::default()
        };
        Self {
            string_member: Some("caf\u{e9} \"quoted\" <tag> & more".to_owned()),
            integer_member: Some(i32::MAX),
            long_member: Some(-9_007_199_254_740_993),
            float_member: Some(1.5),
            double_member: Some(0.1 + 0.2),
            big_decimal_member: "12345678901234567890.000000001".parse().ok(),
            boolean_member: Some(false),
            timestamp_member: Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).single(),
            epoch_member: Utc.timestamp_millis_opt(1_705_314_600_250).single(),
            blob_member: Some(Bytes::from_static(b"\x00\x01binary\xff")),
            list_member: Some(vec!["a".to_owned(), "b".to_owned()]),
            map_member: Some(BTreeMap::from([
                ("k1".to_owned(), "v1".to_owned()),
                ("k2".to_owned(), String::new()),
            ])),
            struct_list: Some(vec![SimpleStruct::of("x"), SimpleStruct::of("y")]),
            nested: Some(Box::new(middle)),
        }
    }
}

impl StructuredValue for AllTypes {
    fn fields(&self) -> &'static [FieldDescriptor] {
        &ALL_TYPES_FIELDS
    }

    fn get(&self, field: &FieldDescriptor) -> Option<Value> {
        match field.member_name {
            "StringMember" => self.string_member.clone().map(Value::from),
            "IntegerMember" => self.integer_member.map(Value::from),
            "LongMember" => self.long_member.map(Value::from),
            "FloatMember" => self.float_member.map(Value::from),
            "DoubleMember" => self.double_member.map(Value::from),
            "BigDecimalMember" => self.big_decimal_member.clone().map(Value::from),
            "BooleanMember" => self.boolean_member.map(Value::from),
            "TimestampMember" => self.timestamp_member.map(Value::from),
            "EpochMember" => self.epoch_member.map(Value::from),
            "BlobMember" => self.blob_member.clone().map(Value::from),
            "ListMember" => self.list_member.clone().map(Value::from),
            "MapMember" => self.map_member.clone().map(Value::from),
            "StructList" => self.struct_list.clone().map(Value::from),
            "Nested" => self.nested.as_deref().cloned().map(Value::nested),
            _ => None,
        }
    }

    fn set(&mut self, field: &FieldDescriptor, value: Value) -> ProtocolResult<()> {
        match field.member_name {
            "StringMember" => self.string_member = Some(value.into_typed()?),
            "IntegerMember" => self.integer_member = Some(value.into_typed()?),
            "LongMember" => self.long_member = Some(value.into_typed()?),
            "FloatMember" => self.float_member = Some(value.into_typed()?),
            "DoubleMember" => self.double_member = Some(value.into_typed()?),
            "BigDecimalMember" => self.big_decimal_member = Some(value.into_typed()?),
            "BooleanMember" => self.boolean_member = Some(value.into_typed()?),
            "TimestampMember" => self.timestamp_member = Some(value.into_typed()?),
            "EpochMember" => self.epoch_member = Some(value.into_typed()?),
            "BlobMember" => self.blob_member = Some(value.into_typed()?),
            "ListMember" => self.list_member = Some(value.into_typed()?),
            "MapMember" => self.map_member = Some(value.into_typed()?),
            "StructList" => self.struct_list = Some(value.into_typed()?),
            "Nested" => self.nested = Some(Box::new(value.into_structured()?)),
            other => return Err(unknown_member("AllTypes", other)),
        }
        Ok(())
    }

    fn clone_boxed(&self) -> Box<dyn StructuredValue> {
        Box::new(self.clone())
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

// ---------------------------------------------------------------------------
// XmlTypes / PutXmlTypesInput
// ---------------------------------------------------------------------------

static OWNER_FIELDS: [FieldDescriptor; 2] = [
    FieldDescriptor::member("Type", ValueKind::String).as_xml_attribute(),
    FieldDescriptor::member("ID", ValueKind::String),
];

/// An owner reference whose type is carried as an XML attribute.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Owner {
    /// `Type` attribute.
    pub owner_type: Option<String>,
    /// `ID`
    pub id: Option<String>,
}

impl Owner {
    /// An empty instance, used as the nested-shape constructor.
    #[must_use]
    pub fn construct() -> Box<dyn StructuredValue> {
        Box::new(Self::default())
    }
}

impl StructuredValue for Owner {
    fn fields(&self) -> &'static [FieldDescriptor] {
        &OWNER_FIELDS
    }

    fn get(&self, field: &FieldDescriptor) -> Option<Value> {
        match field.member_name {
            "Type" => self.owner_type.clone().map(Value::from),
            "ID" => self.id.clone().map(Value::from),
            _ => None,
        }
    }

    fn set(&mut self, field: &FieldDescriptor, value: Value) -> ProtocolResult<()> {
        match field.member_name {
            "Type" => self.owner_type = Some(value.into_typed()?),
            "ID" => self.id = Some(value.into_typed()?),
            other => return Err(unknown_member("Owner", other)),
        }
        Ok(())
    }

    fn clone_boxed(&self) -> Box<dyn StructuredValue> {
        Box::new(self.clone())
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

static ITEM_MEMBER: FieldDescriptor = FieldDescriptor::member("item", ValueKind::String);

static XML_TYPES_FIELDS: [FieldDescriptor; 4] = [
    FieldDescriptor::member("FlattenedListOfStrings", ValueKind::List)
        .with_list(ListTrait::new(&STRING_MEMBER).flattened()),
    FieldDescriptor::member("NonFlattenedListWithLocation", ValueKind::List)
        .with_list(ListTrait::new(&ITEM_MEMBER).member_wire_name("item")),
    FieldDescriptor::member("flatmap", ValueKind::Map).with_map(
        MapTrait::new(&STRING_MEMBER)
            .key_wire_name("thekey")
            .value_wire_name("thevalue")
            .flattened(),
    ),
    FieldDescriptor::member("Owner", ValueKind::Nested).with_constructor(Owner::construct),
];

/// XML collection layouts: flattened and wrapped lists, a flattened map and
/// an attribute-bearing structure.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlTypes {
    /// `FlattenedListOfStrings`
    pub flattened_list_of_strings: Option<Vec<String>>,
    /// `NonFlattenedListWithLocation`, members named `item`.
    pub non_flattened_list_with_location: Option<Vec<String>>,
    /// `flatmap`, entries keyed by `thekey`/`thevalue`.
    pub flatmap: Option<BTreeMap<String, String>>,
    /// `Owner`
    pub owner: Option<Owner>,
}

impl XmlTypes {
    /// An empty instance, used as the nested-shape constructor.
    #[must_use]
    pub fn construct() -> Box<dyn StructuredValue> {
        Box::new(Self::default())
    }
}

impl StructuredValue for XmlTypes {
    fn fields(&self) -> &'static [FieldDescriptor] {
        &XML_TYPES_FIELDS
    }

    fn get(&self, field: &FieldDescriptor) -> Option<Value> {
        match field.member_name {
            "FlattenedListOfStrings" => self.flattened_list_of_strings.clone().map(Value::from),
            "NonFlattenedListWithLocation" => {
                self.non_flattened_list_with_location.clone().map(Value::from)
            }
            "flatmap" => self.flatmap.clone().map(Value::from),
            "Owner" => self.owner.clone().map(Value::nested),
            _ => None,
        }
    }

    fn set(&mut self, field: &FieldDescriptor, value: Value) -> ProtocolResult<()> {
        match field.member_name {
            "FlattenedListOfStrings" => self.flattened_list_of_strings = Some(value.into_typed()?),
            "NonFlattenedListWithLocation" => {
                self.non_flattened_list_with_location = Some(value.into_typed()?);
            }
            "flatmap" => self.flatmap = Some(value.into_typed()?),
            "Owner" => self.owner = Some(value.into_structured()?),
            other => return Err(unknown_member("XmlTypes", other)),
        }
        Ok(())
    }

    fn clone_boxed(&self) -> Box<dyn StructuredValue> {
        Box::new(self.clone())
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

static PUT_XML_TYPES_INPUT_FIELDS: [FieldDescriptor; 2] = [
    FieldDescriptor::new("Bucket", Location::PathParam, ValueKind::String, "Bucket"),
    FieldDescriptor::new("XmlTypes", Location::Payload, ValueKind::Nested, "XmlTypes")
        .as_payload()
        .with_constructor(XmlTypes::construct)
        .with_xml_namespace(S3_NAMESPACE),
];

/// Input whose explicit payload is an [`XmlTypes`] document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PutXmlTypesInput {
    /// HTTP label (URI path).
    pub bucket: String,
    /// HTTP payload body.
    pub xml_types: Option<XmlTypes>,
}

impl StructuredValue for PutXmlTypesInput {
    fn fields(&self) -> &'static [FieldDescriptor] {
        &PUT_XML_TYPES_INPUT_FIELDS
    }

    fn get(&self, field: &FieldDescriptor) -> Option<Value> {
        match field.member_name {
            "Bucket" => Some(Value::from(self.bucket.clone())),
            "XmlTypes" => self.xml_types.clone().map(Value::nested),
            _ => None,
        }
    }

    fn set(&mut self, field: &FieldDescriptor, value: Value) -> ProtocolResult<()> {
        match field.member_name {
            "Bucket" => self.bucket = value.into_typed()?,
            "XmlTypes" => self.xml_types = Some(value.into_structured()?),
            other => return Err(unknown_member("PutXmlTypesInput", other)),
        }
        Ok(())
    }

    fn clone_boxed(&self) -> Box<dyn StructuredValue> {
        Box::new(self.clone())
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

// ---------------------------------------------------------------------------
// ItemsInput
// ---------------------------------------------------------------------------

static ITEMS_FIELDS: [FieldDescriptor; 1] = [FieldDescriptor::member("Items", ValueKind::List)
    .with_list(ListTrait::new(&STRING_MEMBER).flattened())];

/// A structure with one flattened string list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemsInput {
    /// `Items`
    pub items: Option<Vec<String>>,
}

impl StructuredValue for ItemsInput {
    fn fields(&self) -> &'static [FieldDescriptor] {
        &ITEMS_FIELDS
    }

    fn get(&self, field: &FieldDescriptor) -> Option<Value> {
        match field.member_name {
            "Items" => self.items.clone().map(Value::from),
            _ => None,
        }
    }

    fn set(&mut self, field: &FieldDescriptor, value: Value) -> ProtocolResult<()> {
        match field.member_name {
            "Items" => self.items = Some(value.into_typed()?),
            other => return Err(unknown_member("ItemsInput", other)),
        }
        Ok(())
    }

    fn clone_boxed(&self) -> Box<dyn StructuredValue> {
        Box::new(self.clone())
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

// ---------------------------------------------------------------------------
// PutObjectInput / GetObjectOutput
// ---------------------------------------------------------------------------

static PUT_OBJECT_INPUT_FIELDS: [FieldDescriptor; 10] = [
    FieldDescriptor::new("Bucket", Location::PathParam, ValueKind::String, "Bucket"),
    FieldDescriptor::new("Key", Location::GreedyPathParam, ValueKind::String, "Key"),
    FieldDescriptor::new("Metadata", Location::Header, ValueKind::Map, "x-amz-meta-")
        .with_map(MapTrait::new(&STRING_MEMBER)),
    FieldDescriptor::new("Expires", Location::Header, ValueKind::Instant, "Expires"),
    FieldDescriptor::new(
        "ObjectLockRetainUntilDate",
        Location::Header,
        ValueKind::Instant,
        "x-amz-object-lock-retain-until-date",
    )
    .with_timestamp_format(TimestampFormat::Iso8601),
    FieldDescriptor::new("GrantRead", Location::Header, ValueKind::List, "x-amz-grant-read")
        .with_list(ListTrait::new(&STRING_MEMBER)),
    FieldDescriptor::new("VersionId", Location::QueryParam, ValueKind::String, "versionId"),
    FieldDescriptor::new("PartNumber", Location::QueryParam, ValueKind::Integer, "partNumber"),
    FieldDescriptor::new("Prefixes", Location::QueryParam, ValueKind::List, "prefix")
        .with_list(ListTrait::new(&STRING_MEMBER)),
    FieldDescriptor::new("Body", Location::Payload, ValueKind::Bytes, "Body").as_payload(),
];

/// S3-style PutObjectInput exercising every HTTP binding location.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PutObjectInput {
    /// HTTP label (URI path).
    pub bucket: String,
    /// HTTP label (URI path), greedy.
    pub key: String,
    /// HTTP prefix headers: `x-amz-meta-`.
    pub metadata: Option<BTreeMap<String, String>>,
    /// HTTP header: `Expires`.
    pub expires: Option<DateTime<Utc>>,
    /// HTTP header: `x-amz-object-lock-retain-until-date`.
    pub object_lock_retain_until_date: Option<DateTime<Utc>>,
    /// HTTP header: `x-amz-grant-read`.
    pub grant_read: Option<Vec<String>>,
    /// HTTP query: `versionId`.
    pub version_id: Option<String>,
    /// HTTP query: `partNumber`.
    pub part_number: Option<i32>,
    /// HTTP query: `prefix`.
    pub prefixes: Option<Vec<String>>,
    /// HTTP payload body.
    pub body: Option<Bytes>,
}

impl StructuredValue for PutObjectInput {
    fn fields(&self) -> &'static [FieldDescriptor] {
        &PUT_OBJECT_INPUT_FIELDS
    }

    fn get(&self, field: &FieldDescriptor) -> Option<Value> {
        match field.member_name {
            "Bucket" => Some(Value::from(self.bucket.clone())),
            "Key" => Some(Value::from(self.key.clone())),
            "Metadata" => self.metadata.clone().map(Value::from),
            "Expires" => self.expires.map(Value::from),
            "ObjectLockRetainUntilDate" => self.object_lock_retain_until_date.map(Value::from),
            "GrantRead" => self.grant_read.clone().map(Value::from),
            "VersionId" => self.version_id.clone().map(Value::from),
            "PartNumber" => self.part_number.map(Value::from),
            "Prefixes" => self.prefixes.clone().map(Value::from),
            "Body" => self.body.clone().map(Value::from),
            _ => None,
        }
    }

    fn set(&mut self, field: &FieldDescriptor, value: Value) -> ProtocolResult<()> {
        match field.member_name {
            "Bucket" => self.bucket = value.into_typed()?,
            "Key" => self.key = value.into_typed()?,
            "Metadata" => self.metadata = Some(value.into_typed()?),
            "Expires" => self.expires = Some(value.into_typed()?),
            "ObjectLockRetainUntilDate" => {
                self.object_lock_retain_until_date = Some(value.into_typed()?);
            }
            "GrantRead" => self.grant_read = Some(value.into_typed()?),
            "VersionId" => self.version_id = Some(value.into_typed()?),
            "PartNumber" => self.part_number = Some(value.into_typed()?),
            "Prefixes" => self.prefixes = Some(value.into_typed()?),
            "Body" => self.body = Some(value.into_typed()?),
            other => return Err(unknown_member("PutObjectInput", other)),
        }
        Ok(())
    }

    fn clone_boxed(&self) -> Box<dyn StructuredValue> {
        Box::new(self.clone())
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

static GET_OBJECT_OUTPUT_FIELDS: [FieldDescriptor; 7] = [
    FieldDescriptor::new("StatusCode", Location::StatusCode, ValueKind::Integer, "StatusCode"),
    FieldDescriptor::new("Metadata", Location::Header, ValueKind::Map, "x-amz-meta-")
        .with_map(MapTrait::new(&STRING_MEMBER)),
    FieldDescriptor::new("LastModified", Location::Header, ValueKind::Instant, "Last-Modified"),
    FieldDescriptor::new("ContentLength", Location::Header, ValueKind::Long, "Content-Length"),
    FieldDescriptor::new("ETag", Location::Header, ValueKind::String, "ETag"),
    FieldDescriptor::new("GrantRead", Location::Header, ValueKind::List, "x-amz-grant-read")
        .with_list(ListTrait::new(&STRING_MEMBER)),
    FieldDescriptor::new("Body", Location::Payload, ValueKind::Bytes, "Body").as_payload(),
];

/// S3-style GetObjectOutput: envelope fields and a raw body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetObjectOutput {
    /// HTTP status code.
    pub status_code: Option<i32>,
    /// HTTP prefix headers: `x-amz-meta-`.
    pub metadata: Option<BTreeMap<String, String>>,
    /// HTTP header: `Last-Modified`.
    pub last_modified: Option<DateTime<Utc>>,
    /// HTTP header: `Content-Length`.
    pub content_length: Option<i64>,
    /// HTTP header: `ETag`.
    pub e_tag: Option<String>,
    /// HTTP header: `x-amz-grant-read`.
    pub grant_read: Option<Vec<String>>,
    /// HTTP payload body.
    pub body: Option<Bytes>,
}

impl StructuredValue for GetObjectOutput {
    fn fields(&self) -> &'static [FieldDescriptor] {
        &GET_OBJECT_OUTPUT_FIELDS
    }

    fn get(&self, field: &FieldDescriptor) -> Option<Value> {
        match field.member_name {
            "StatusCode" => self.status_code.map(Value::from),
            "Metadata" => self.metadata.clone().map(Value::from),
            "LastModified" => self.last_modified.map(Value::from),
            "ContentLength" => self.content_length.map(Value::from),
            "ETag" => self.e_tag.clone().map(Value::from),
            "GrantRead" => self.grant_read.clone().map(Value::from),
            "Body" => self.body.clone().map(Value::from),
            _ => None,
        }
    }

    fn set(&mut self, field: &FieldDescriptor, value: Value) -> ProtocolResult<()> {
        match field.member_name {
            "StatusCode" => self.status_code = Some(value.into_typed()?),
            "Metadata" => self.metadata = Some(value.into_typed()?),
            "LastModified" => self.last_modified = Some(value.into_typed()?),
            "ContentLength" => self.content_length = Some(value.into_typed()?),
            "ETag" => self.e_tag = Some(value.into_typed()?),
            "GrantRead" => self.grant_read = Some(value.into_typed()?),
            "Body" => self.body = Some(value.into_typed()?),
            other => return Err(unknown_member("GetObjectOutput", other)),
        }
        Ok(())
    }

    fn clone_boxed(&self) -> Box<dyn StructuredValue> {
        Box::new(self.clone())
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}
