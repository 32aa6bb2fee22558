//! JSON response unmarshalling.
//!
//! The body is tokenized once into a `serde_json::Value` tree and walked with
//! decoders resolved from the registry by `(Location, ValueKind)`. Unknown
//! JSON members are skipped. Status-code and header fields are filled from
//! the response envelope before the body is read.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use http::{HeaderMap, StatusCode};
use rustack_protocol_core::binding;
use rustack_protocol_core::convert::{
    parse_double, parse_float, parse_timestamp, resolve_timestamp_format, text_to_value,
};
use rustack_protocol_core::registry::MarshallerRegistry;
use rustack_protocol_core::{
    BigDecimal, FieldDescriptor, Location, OperationBinding, ProtocolError, ProtocolResult,
    SdkHttpResponse, StructuredValue, TimestampFormat, Value, ValueKind,
};
use serde_json::{Map as JsonObject, Value as JsonValue};

/// Decodes one value. Envelope decoders ignore the JSON argument.
pub type JsonUnmarshaller =
    fn(&JsonUnmarshallerContext, &JsonValue, &FieldDescriptor) -> ProtocolResult<Value>;

/// Every `(Location, ValueKind)` pair the JSON response registry must cover.
#[must_use]
pub fn required_combinations() -> Vec<(Location, ValueKind)> {
    let mut pairs: Vec<_> = ValueKind::ALL
        .into_iter()
        .filter(|kind| *kind != ValueKind::Null)
        .map(|kind| (Location::Payload, kind))
        .collect();
    pairs.extend(
        ValueKind::SCALARS
            .into_iter()
            .chain([ValueKind::List, ValueKind::Map])
            .map(|kind| (Location::Header, kind)),
    );
    pairs.push((Location::StatusCode, ValueKind::Integer));
    pairs
}

static REGISTRY: LazyLock<MarshallerRegistry<JsonUnmarshaller>> = LazyLock::new(|| {
    MarshallerRegistry::<JsonUnmarshaller>::builder()
        .register_all(Location::Payload, &ValueKind::SCALARS, unmarshall_scalar)
        .payload(ValueKind::Nested, unmarshall_nested)
        .payload(ValueKind::List, unmarshall_list)
        .payload(ValueKind::Map, unmarshall_map)
        .register_all(Location::Header, &ValueKind::SCALARS, unmarshall_header)
        .header(ValueKind::List, unmarshall_header_list)
        .header(ValueKind::Map, unmarshall_header_map)
        .status_code(ValueKind::Integer, unmarshall_status_code)
        .build()
});

/// The process-wide JSON response registry.
#[must_use]
pub fn registry() -> &'static MarshallerRegistry<JsonUnmarshaller> {
    &REGISTRY
}

/// Per-response decoding state: the envelope and the decoder registry.
#[derive(Debug)]
pub struct JsonUnmarshallerContext {
    status: StatusCode,
    headers: HeaderMap,
    registry: &'static MarshallerRegistry<JsonUnmarshaller>,
}

impl JsonUnmarshallerContext {
    /// A context over the envelope of `response`.
    #[must_use]
    pub fn new(response: &SdkHttpResponse) -> Self {
        Self {
            status: response.status(),
            headers: response.headers().clone(),
            registry: registry(),
        }
    }

    /// Decode `json` as `field` bound at `location`.
    pub fn unmarshall(
        &self,
        location: Location,
        json: &JsonValue,
        field: &FieldDescriptor,
    ) -> ProtocolResult<Value> {
        let decoder = self.registry.get(location, field.kind)?;
        decoder(self, json, field)
    }

    /// Decode the payload fields of `target` from the members of `object`.
    pub fn unmarshall_object(
        &self,
        target: &mut dyn StructuredValue,
        object: &JsonObject<String, JsonValue>,
    ) -> ProtocolResult<()> {
        let fields = target.fields();
        for field in fields.iter().filter(|f| f.location == Location::Payload) {
            match object.get(field.wire_name) {
                None | Some(JsonValue::Null) => {}
                Some(json) => {
                    let value = self.unmarshall(Location::Payload, json, field)?;
                    target.set(field, value)?;
                }
            }
        }
        for key in object.keys() {
            if !fields.iter().any(|f| f.wire_name == key) {
                tracing::trace!(member = %key, "skipping unknown JSON member");
            }
        }
        Ok(())
    }
}

/// Unmarshals JSON responses of one operation.
#[derive(Debug)]
pub struct JsonProtocolUnmarshaller<'a> {
    binding: &'a OperationBinding,
}

impl<'a> JsonProtocolUnmarshaller<'a> {
    /// An unmarshaller for responses of the operation described by `binding`.
    #[must_use]
    pub fn new(binding: &'a OperationBinding) -> Self {
        Self { binding }
    }

    /// Decode `response` into a new `T`.
    pub fn unmarshall<T: StructuredValue + Default>(
        &self,
        response: &SdkHttpResponse,
    ) -> ProtocolResult<T> {
        let mut target = T::default();
        self.unmarshall_into(&mut target, response)?;
        Ok(target)
    }

    /// Decode `response` into `target`.
    pub fn unmarshall_into(
        &self,
        target: &mut dyn StructuredValue,
        response: &SdkHttpResponse,
    ) -> ProtocolResult<()> {
        let context = JsonUnmarshallerContext::new(response);
        let fields = target.fields();

        for field in fields
            .iter()
            .filter(|f| matches!(f.location, Location::StatusCode | Location::Header))
        {
            let value = context.unmarshall(field.location, &JsonValue::Null, field)?;
            if !value.is_null() {
                target.set(field, value)?;
            }
        }

        let body = response.content();
        if let Some(field) = fields.iter().find(|f| f.payload) {
            return match field.kind {
                ValueKind::Bytes => target.set(field, Value::Bytes(body.clone())),
                ValueKind::String => {
                    let text = std::str::from_utf8(body).map_err(ProtocolError::malformed_json)?;
                    target.set(field, Value::String(text.to_owned()))
                }
                _ if body.is_empty() => Ok(()),
                _ => {
                    let json = parse_body(body)?;
                    let value = context.unmarshall(Location::Payload, &json, field)?;
                    target.set(field, value)
                }
            };
        }

        let has_payload_fields = fields.iter().any(|f| f.location == Location::Payload);
        if !has_payload_fields || body.is_empty() || self.binding.has_streaming_output {
            return Ok(());
        }
        match parse_body(body)? {
            JsonValue::Object(object) => context.unmarshall_object(target, &object),
            other => Err(ProtocolError::malformed_json(format!(
                "expected a JSON object, found {}",
                json_type(&other)
            ))),
        }
    }
}

fn parse_body(body: &[u8]) -> ProtocolResult<JsonValue> {
    serde_json::from_slice(body).map_err(ProtocolError::malformed_json)
}

fn json_type(json: &JsonValue) -> &'static str {
    match json {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

fn unexpected(field: &FieldDescriptor, json: &JsonValue) -> ProtocolError {
    ProtocolError::ParseError(format!(
        "member '{}' expects {}, found JSON {}",
        field.wire_name,
        field.kind,
        json_type(json)
    ))
}

fn unmarshall_scalar(
    _ctx: &JsonUnmarshallerContext,
    json: &JsonValue,
    field: &FieldDescriptor,
) -> ProtocolResult<Value> {
    let out_of_range = || {
        ProtocolError::ParseError(format!("number out of range for '{}'", field.wire_name))
    };
    Ok(match (field.kind, json) {
        (ValueKind::String, JsonValue::String(s)) => Value::String(s.clone()),
        (ValueKind::Integer, JsonValue::Number(n)) => Value::Integer(
            n.as_i64()
                .and_then(|v| i32::try_from(v).ok())
                .ok_or_else(out_of_range)?,
        ),
        (ValueKind::Long, JsonValue::Number(n)) => {
            Value::Long(n.as_i64().ok_or_else(out_of_range)?)
        }
        (ValueKind::Float, JsonValue::Number(n)) => {
            Value::Float(parse_float(&n.to_string())?)
        }
        (ValueKind::Float, JsonValue::String(s)) => Value::Float(parse_float(s)?),
        (ValueKind::Double, JsonValue::Number(n)) => {
            Value::Double(n.as_f64().ok_or_else(out_of_range)?)
        }
        (ValueKind::Double, JsonValue::String(s)) => Value::Double(parse_double(s)?),
        (ValueKind::BigDecimal, JsonValue::Number(n)) => {
            Value::BigDecimal(n.to_string().parse::<BigDecimal>()?)
        }
        (ValueKind::BigDecimal, JsonValue::String(s)) => Value::BigDecimal(s.parse()?),
        (ValueKind::Boolean, JsonValue::Bool(b)) => Value::Boolean(*b),
        (ValueKind::Instant, JsonValue::Number(n)) => Value::Instant(parse_timestamp(
            &n.to_string(),
            TimestampFormat::UnixTimestamp,
        )?),
        (ValueKind::Instant, JsonValue::String(s)) => Value::Instant(parse_timestamp(
            s,
            resolve_timestamp_format(field.timestamp_format, Location::Payload)?,
        )?),
        (ValueKind::Bytes, JsonValue::String(s)) => {
            text_to_value(s, ValueKind::Bytes, None, Location::Payload)?
        }
        (_, other) => return Err(unexpected(field, other)),
    })
}

fn unmarshall_nested(
    ctx: &JsonUnmarshallerContext,
    json: &JsonValue,
    field: &FieldDescriptor,
) -> ProtocolResult<Value> {
    let JsonValue::Object(object) = json else {
        return Err(unexpected(field, json));
    };
    let mut target = field.construct()?;
    ctx.unmarshall_object(target.as_mut(), object)?;
    Ok(Value::Nested(target))
}

fn unmarshall_list(
    ctx: &JsonUnmarshallerContext,
    json: &JsonValue,
    field: &FieldDescriptor,
) -> ProtocolResult<Value> {
    let member = field.list_trait()?.member;
    let JsonValue::Array(items) = json else {
        return Err(unexpected(field, json));
    };
    items
        .iter()
        .map(|item| match item {
            JsonValue::Null => Ok(Value::Null),
            item => ctx.unmarshall(Location::Payload, item, member),
        })
        .collect::<ProtocolResult<Vec<_>>>()
        .map(Value::List)
}

fn unmarshall_map(
    ctx: &JsonUnmarshallerContext,
    json: &JsonValue,
    field: &FieldDescriptor,
) -> ProtocolResult<Value> {
    let value_field = field.map_trait()?.value;
    let JsonValue::Object(object) = json else {
        return Err(unexpected(field, json));
    };
    let mut entries = BTreeMap::new();
    for (key, entry) in object {
        if entry.is_null() {
            continue;
        }
        entries.insert(
            key.clone(),
            ctx.unmarshall(Location::Payload, entry, value_field)?,
        );
    }
    Ok(Value::Map(entries))
}

fn unmarshall_header(
    ctx: &JsonUnmarshallerContext,
    _json: &JsonValue,
    field: &FieldDescriptor,
) -> ProtocolResult<Value> {
    binding::unmarshall_header(&ctx.headers, field)
}

fn unmarshall_header_list(
    ctx: &JsonUnmarshallerContext,
    _json: &JsonValue,
    field: &FieldDescriptor,
) -> ProtocolResult<Value> {
    binding::unmarshall_header_list(&ctx.headers, field)
}

fn unmarshall_header_map(
    ctx: &JsonUnmarshallerContext,
    _json: &JsonValue,
    field: &FieldDescriptor,
) -> ProtocolResult<Value> {
    binding::unmarshall_header_map(&ctx.headers, field)
}

fn unmarshall_status_code(
    ctx: &JsonUnmarshallerContext,
    _json: &JsonValue,
    _field: &FieldDescriptor,
) -> ProtocolResult<Value> {
    Ok(binding::unmarshall_status_code(ctx.status))
}
