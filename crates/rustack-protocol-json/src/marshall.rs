//! JSON request marshalling.
//!
//! [`JsonProtocolMarshaller`] walks the input's fields in declaration order.
//! Payload-bound fields stream into one JSON object; header, query and path
//! fields go through the shared HTTP-binding codecs. The object wrapper is
//! implicit unless the operation names an explicit payload member, in which
//! case that member alone forms the body.

use std::sync::LazyLock;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use rustack_protocol_core::binding;
use rustack_protocol_core::convert::{format_timestamp, resolve_timestamp_format};
use rustack_protocol_core::registry::MarshallerRegistry;
use rustack_protocol_core::uri::create_request;
use rustack_protocol_core::{
    FieldDescriptor, Location, OperationBinding, ProtocolConfig, ProtocolError, ProtocolResult,
    SdkHttpRequest, StructuredValue, TimestampFormat, Value, ValueKind,
};

use crate::generator::JsonGenerator;

/// Header naming the target operation of a JSON RPC call.
pub const TARGET_HEADER: &str = "X-Amz-Target";

/// Encodes one value. `name` is the wire name, or `None` for list members and
/// map values, which have no member name of their own.
pub type JsonMarshaller = fn(
    &mut JsonMarshallerContext,
    &Value,
    Option<&str>,
    &FieldDescriptor,
) -> ProtocolResult<()>;

/// Every `(Location, ValueKind)` pair the JSON request registry must cover.
#[must_use]
pub fn required_combinations() -> Vec<(Location, ValueKind)> {
    let mut pairs = Vec::new();
    for kind in ValueKind::ALL {
        pairs.push((Location::Payload, kind));
    }
    for kind in ValueKind::SCALARS.into_iter().chain([ValueKind::Null]) {
        pairs.push((Location::Header, kind));
    }
    for kind in ValueKind::SCALARS
        .into_iter()
        .chain([ValueKind::List, ValueKind::Map, ValueKind::Null])
    {
        pairs.push((Location::QueryParam, kind));
    }
    for kind in [ValueKind::String, ValueKind::Integer, ValueKind::Long, ValueKind::Null] {
        pairs.push((Location::PathParam, kind));
    }
    for kind in [ValueKind::String, ValueKind::Null] {
        pairs.push((Location::GreedyPathParam, kind));
    }
    pairs
}

static REGISTRY: LazyLock<MarshallerRegistry<JsonMarshaller>> = LazyLock::new(|| {
    MarshallerRegistry::<JsonMarshaller>::builder()
        .register_all(Location::Payload, &ValueKind::SCALARS, marshall_scalar)
        .payload(ValueKind::Nested, marshall_nested)
        .payload(ValueKind::List, marshall_list)
        .payload(ValueKind::Map, marshall_map)
        .payload(ValueKind::Null, marshall_null)
        .register_all(Location::Header, &ValueKind::SCALARS, marshall_header)
        .header(ValueKind::Null, marshall_http_null)
        .register_all(Location::QueryParam, &ValueKind::SCALARS, marshall_query_param)
        .query_param(ValueKind::List, marshall_query_list)
        .query_param(ValueKind::Map, marshall_query_map)
        .query_param(ValueKind::Null, marshall_http_null)
        .register_all(
            Location::PathParam,
            &[ValueKind::String, ValueKind::Integer, ValueKind::Long],
            marshall_path_param,
        )
        .path_param(ValueKind::Null, marshall_null_path_param)
        .greedy_path_param(ValueKind::String, marshall_greedy_path_param)
        .greedy_path_param(ValueKind::Null, marshall_null_path_param)
        .build()
});

/// The process-wide JSON request registry.
#[must_use]
pub fn registry() -> &'static MarshallerRegistry<JsonMarshaller> {
    &REGISTRY
}

/// Per-call marshalling state: the generator and the request being built.
#[derive(Debug)]
pub struct JsonMarshallerContext {
    generator: JsonGenerator,
    request: SdkHttpRequest,
    registry: &'static MarshallerRegistry<JsonMarshaller>,
}

impl JsonMarshallerContext {
    /// A context writing into `request`.
    #[must_use]
    pub fn new(request: SdkHttpRequest) -> Self {
        Self {
            generator: JsonGenerator::new(),
            request,
            registry: registry(),
        }
    }

    /// The JSON generator.
    pub fn generator(&mut self) -> &mut JsonGenerator {
        &mut self.generator
    }

    /// The request being built.
    pub fn request(&mut self) -> &mut SdkHttpRequest {
        &mut self.request
    }

    /// Encode `value` with the codec registered for `location` and the field's kind.
    pub fn marshall(
        &mut self,
        location: Location,
        value: &Value,
        name: Option<&str>,
        field: &FieldDescriptor,
    ) -> ProtocolResult<()> {
        let kind = field.dispatch_kind(value)?;
        let marshaller = self.registry.get(location, kind)?;
        marshaller(self, value, name, field)
    }

    /// Encode every field of a nested value as members of the open object.
    pub fn marshall_fields(&mut self, value: &dyn StructuredValue) -> ProtocolResult<()> {
        for field in value.fields() {
            let member = field.resolve_value(value.get(field)).unwrap_or(Value::Null);
            self.marshall(field.location, &member, Some(field.wire_name), field)?;
        }
        Ok(())
    }

    fn write_name(&mut self, name: Option<&str>) -> ProtocolResult<()> {
        match name {
            Some(name) => self.generator.write_field_name(name),
            None => Ok(()),
        }
    }
}

/// Marshals one operation input into a JSON request.
#[derive(Debug)]
pub struct JsonProtocolMarshaller<'a> {
    binding: &'a OperationBinding,
    config: &'a ProtocolConfig,
    context: JsonMarshallerContext,
}

impl<'a> JsonProtocolMarshaller<'a> {
    /// A marshaller for one call of the operation described by `binding`.
    #[must_use]
    pub fn new(binding: &'a OperationBinding, config: &'a ProtocolConfig) -> Self {
        Self {
            binding,
            config,
            context: JsonMarshallerContext::new(create_request(binding)),
        }
    }

    /// Marshal `input` and finish the request.
    pub fn marshall(mut self, input: &dyn StructuredValue) -> ProtocolResult<SdkHttpRequest> {
        if let Some(target) = &self.binding.operation_identifier {
            self.context.request.add_header(TARGET_HEADER, target)?;
        }
        if !self.binding.has_explicit_payload_member {
            self.context.generator.write_start_object();
        }

        for field in input.fields() {
            let value = field.resolve_value(input.get(field));
            if field.payload {
                self.marshall_explicit_payload(value, field)?;
            } else {
                self.context.marshall(
                    field.location,
                    value.as_ref().unwrap_or(&Value::Null),
                    Some(field.wire_name),
                    field,
                )?;
            }
        }

        self.finish()
    }

    fn marshall_explicit_payload(
        &mut self,
        value: Option<Value>,
        field: &FieldDescriptor,
    ) -> ProtocolResult<()> {
        match value {
            None | Some(Value::Null) => Ok(()),
            Some(Value::Bytes(bytes)) => {
                self.context
                    .request
                    .set_header_if_absent("Content-Type", &self.config.binary_content_type)?;
                self.context.request.set_content(bytes);
                Ok(())
            }
            Some(Value::String(text)) => {
                self.context.request.set_content(text);
                Ok(())
            }
            Some(Value::Nested(inner)) => {
                self.context.generator.write_start_object();
                self.context.marshall_fields(inner.as_ref())?;
                self.context.generator.write_end_object()
            }
            Some(other) => Err(ProtocolError::ValueMismatch {
                expected: field.kind,
                actual: other.kind(),
            }),
        }
    }

    fn finish(self) -> ProtocolResult<SdkHttpRequest> {
        let Self {
            binding,
            config,
            context,
        } = self;
        let JsonMarshallerContext {
            mut generator,
            mut request,
            ..
        } = context;

        if !request.has_content() {
            if !binding.has_explicit_payload_member {
                generator.write_end_object()?;
            }
            let content = generator.into_bytes()?;
            if !content.is_empty() {
                request.set_content(content);
            }
        }
        if let Some(length) = request.content().map(bytes::Bytes::len) {
            request.set_header_if_absent("Content-Length", &length.to_string())?;
        }
        if !binding.has_streaming_input {
            request.set_header_if_absent("Content-Type", &config.json_content_type)?;
        }

        tracing::debug!(
            service = %request.service_name(),
            method = %request.method(),
            path = %request.resource_path(),
            body_len = request.content().map_or(0, bytes::Bytes::len),
            "marshalled JSON request"
        );
        Ok(request)
    }
}

fn marshall_scalar(
    ctx: &mut JsonMarshallerContext,
    value: &Value,
    name: Option<&str>,
    field: &FieldDescriptor,
) -> ProtocolResult<()> {
    ctx.write_name(name)?;
    let generator = &mut ctx.generator;
    match value {
        Value::String(s) => generator.write_string(s),
        Value::Integer(v) => {
            generator.write_raw_value(&v.to_string());
            Ok(())
        }
        Value::Long(v) => {
            generator.write_raw_value(&v.to_string());
            Ok(())
        }
        Value::Float(v) => generator.write_float(*v),
        Value::Double(v) => generator.write_double(*v),
        Value::BigDecimal(v) => {
            generator.write_raw_value(v.as_str());
            Ok(())
        }
        Value::Boolean(v) => {
            generator.write_bool(*v);
            Ok(())
        }
        Value::Instant(dt) => {
            match resolve_timestamp_format(field.timestamp_format, Location::Payload)? {
                TimestampFormat::UnixTimestamp => {
                    generator
                        .write_raw_value(&format_timestamp(dt, TimestampFormat::UnixTimestamp));
                    Ok(())
                }
                format => generator.write_string(&format_timestamp(dt, format)),
            }
        }
        Value::Bytes(b) => generator.write_string(&BASE64.encode(b)),
        other => Err(ProtocolError::ValueMismatch {
            expected: field.kind,
            actual: other.kind(),
        }),
    }
}

fn marshall_nested(
    ctx: &mut JsonMarshallerContext,
    value: &Value,
    name: Option<&str>,
    _field: &FieldDescriptor,
) -> ProtocolResult<()> {
    let Value::Nested(inner) = value else {
        return Err(mismatch(ValueKind::Nested, value));
    };
    ctx.write_name(name)?;
    ctx.generator.write_start_object();
    ctx.marshall_fields(inner.as_ref())?;
    ctx.generator.write_end_object()
}

fn marshall_list(
    ctx: &mut JsonMarshallerContext,
    value: &Value,
    name: Option<&str>,
    field: &FieldDescriptor,
) -> ProtocolResult<()> {
    let member = field.list_trait()?.member;
    let Value::List(items) = value else {
        return Err(mismatch(ValueKind::List, value));
    };
    ctx.write_name(name)?;
    ctx.generator.write_start_array();
    for item in items {
        ctx.marshall(Location::Payload, item, None, member)?;
    }
    ctx.generator.write_end_array()
}

fn marshall_map(
    ctx: &mut JsonMarshallerContext,
    value: &Value,
    name: Option<&str>,
    field: &FieldDescriptor,
) -> ProtocolResult<()> {
    let value_field = field.map_trait()?.value;
    let Value::Map(entries) = value else {
        return Err(mismatch(ValueKind::Map, value));
    };
    ctx.write_name(name)?;
    ctx.generator.write_start_object();
    for (key, entry) in entries.iter().filter(|(_, v)| !v.is_null()) {
        ctx.generator.write_field_name(key)?;
        ctx.marshall(Location::Payload, entry, None, value_field)?;
    }
    ctx.generator.write_end_object()
}

/// Absent members are omitted; absent list members keep their slot as `null`.
fn marshall_null(
    ctx: &mut JsonMarshallerContext,
    _value: &Value,
    name: Option<&str>,
    _field: &FieldDescriptor,
) -> ProtocolResult<()> {
    if name.is_none() {
        ctx.generator.write_null();
    }
    Ok(())
}

fn marshall_header(
    ctx: &mut JsonMarshallerContext,
    value: &Value,
    name: Option<&str>,
    field: &FieldDescriptor,
) -> ProtocolResult<()> {
    binding::marshall_header(&mut ctx.request, value, name.unwrap_or(field.wire_name), field)
}

fn marshall_query_param(
    ctx: &mut JsonMarshallerContext,
    value: &Value,
    name: Option<&str>,
    field: &FieldDescriptor,
) -> ProtocolResult<()> {
    binding::marshall_query_param(&mut ctx.request, value, name.unwrap_or(field.wire_name), field)
}

fn marshall_query_list(
    ctx: &mut JsonMarshallerContext,
    value: &Value,
    name: Option<&str>,
    field: &FieldDescriptor,
) -> ProtocolResult<()> {
    binding::marshall_query_list(&mut ctx.request, value, name.unwrap_or(field.wire_name), field)
}

fn marshall_query_map(
    ctx: &mut JsonMarshallerContext,
    value: &Value,
    name: Option<&str>,
    field: &FieldDescriptor,
) -> ProtocolResult<()> {
    binding::marshall_query_map(&mut ctx.request, value, name.unwrap_or(field.wire_name), field)
}

fn marshall_path_param(
    ctx: &mut JsonMarshallerContext,
    value: &Value,
    name: Option<&str>,
    field: &FieldDescriptor,
) -> ProtocolResult<()> {
    binding::marshall_path_param(&mut ctx.request, value, name.unwrap_or(field.wire_name), field)
}

fn marshall_greedy_path_param(
    ctx: &mut JsonMarshallerContext,
    value: &Value,
    name: Option<&str>,
    field: &FieldDescriptor,
) -> ProtocolResult<()> {
    binding::marshall_greedy_path_param(
        &mut ctx.request,
        value,
        name.unwrap_or(field.wire_name),
        field,
    )
}

fn marshall_null_path_param(
    ctx: &mut JsonMarshallerContext,
    value: &Value,
    name: Option<&str>,
    field: &FieldDescriptor,
) -> ProtocolResult<()> {
    binding::marshall_null_path_param(
        &mut ctx.request,
        value,
        name.unwrap_or(field.wire_name),
        field,
    )
}

fn marshall_http_null(
    ctx: &mut JsonMarshallerContext,
    value: &Value,
    name: Option<&str>,
    field: &FieldDescriptor,
) -> ProtocolResult<()> {
    binding::marshall_null(&mut ctx.request, value, name.unwrap_or(field.wire_name), field)
}

fn mismatch(expected: ValueKind, actual: &Value) -> ProtocolError {
    ProtocolError::ValueMismatch {
        expected,
        actual: actual.kind(),
    }
}
