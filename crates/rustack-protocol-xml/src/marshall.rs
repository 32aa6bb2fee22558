//! XML request marshalling.
//!
//! [`XmlProtocolMarshaller`] walks the input's fields in declaration order and
//! dispatches each through the registry by `(Location, ValueKind)`. Payload
//! fields are written as elements through the [`XmlGenerator`]; header, query
//! and path fields go through the shared HTTP-binding codecs.
//!
//! An explicit binary or string payload member becomes the body verbatim.
//! Otherwise the generated XML, if any, becomes the body when marshalling
//! finishes.

use std::sync::LazyLock;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use md5::{Digest, Md5};
use rustack_protocol_core::binding;
use rustack_protocol_core::convert::value_to_text;
use rustack_protocol_core::descriptor::MAP_ENTRY_ELEMENT;
use rustack_protocol_core::registry::MarshallerRegistry;
use rustack_protocol_core::uri::create_request;
use rustack_protocol_core::{
    FieldDescriptor, Location, OperationBinding, ProtocolConfig, ProtocolError, ProtocolResult,
    SdkHttpRequest, StructuredValue, Value, ValueKind,
};

use crate::generator::XmlGenerator;

/// Encodes one value under wire name `name`.
pub type XmlMarshaller =
    fn(&mut XmlMarshallerContext, &Value, &str, &FieldDescriptor) -> ProtocolResult<()>;

/// Every `(Location, ValueKind)` pair the XML request registry must cover.
#[must_use]
pub fn required_combinations() -> Vec<(Location, ValueKind)> {
    let mut pairs: Vec<_> = ValueKind::ALL
        .into_iter()
        .map(|kind| (Location::Payload, kind))
        .collect();
    for location in [Location::Header, Location::QueryParam] {
        pairs.extend(
            ValueKind::SCALARS
                .into_iter()
                .chain([ValueKind::List, ValueKind::Map, ValueKind::Null])
                .map(|kind| (location, kind)),
        );
    }
    pairs.extend(
        [ValueKind::String, ValueKind::Integer, ValueKind::Long, ValueKind::Null]
            .into_iter()
            .map(|kind| (Location::PathParam, kind)),
    );
    pairs.extend(
        [ValueKind::String, ValueKind::Null]
            .into_iter()
            .map(|kind| (Location::GreedyPathParam, kind)),
    );
    pairs
}

static REGISTRY: LazyLock<MarshallerRegistry<XmlMarshaller>> = LazyLock::new(|| {
    MarshallerRegistry::<XmlMarshaller>::builder()
        .register_all(Location::Payload, &ValueKind::SCALARS, marshall_scalar)
        .payload(ValueKind::Nested, marshall_nested)
        .payload(ValueKind::List, marshall_list)
        .payload(ValueKind::Map, marshall_map)
        .payload(ValueKind::Null, marshall_null)
        .register_all(Location::Header, &ValueKind::SCALARS, |ctx, v, n, f| {
            binding::marshall_header(&mut ctx.request, v, n, f)
        })
        .header(ValueKind::List, |ctx, v, n, f| {
            binding::marshall_header_list(&mut ctx.request, v, n, f)
        })
        .header(ValueKind::Map, |ctx, v, n, f| {
            binding::marshall_header_map(&mut ctx.request, v, n, f)
        })
        .header(ValueKind::Null, marshall_null)
        .register_all(Location::QueryParam, &ValueKind::SCALARS, |ctx, v, n, f| {
            binding::marshall_query_param(&mut ctx.request, v, n, f)
        })
        .query_param(ValueKind::List, |ctx, v, n, f| {
            binding::marshall_query_list(&mut ctx.request, v, n, f)
        })
        .query_param(ValueKind::Map, |ctx, v, n, f| {
            binding::marshall_query_map(&mut ctx.request, v, n, f)
        })
        .query_param(ValueKind::Null, marshall_null)
        .register_all(
            Location::PathParam,
            &[ValueKind::String, ValueKind::Integer, ValueKind::Long],
            |ctx, v, n, f| binding::marshall_path_param(&mut ctx.request, v, n, f),
        )
        .path_param(ValueKind::Null, |ctx, v, n, f| {
            binding::marshall_null_path_param(&mut ctx.request, v, n, f)
        })
        .greedy_path_param(ValueKind::String, |ctx, v, n, f| {
            binding::marshall_greedy_path_param(&mut ctx.request, v, n, f)
        })
        .greedy_path_param(ValueKind::Null, |ctx, v, n, f| {
            binding::marshall_null_path_param(&mut ctx.request, v, n, f)
        })
        .build()
});

/// The process-wide XML request registry.
#[must_use]
pub fn registry() -> &'static MarshallerRegistry<XmlMarshaller> {
    &REGISTRY
}

/// Collect the XML namespace of an input value.
///
/// The operation's namespace and every field's declared namespace must agree;
/// two distinct URIs fail with [`ProtocolError::AmbiguousNamespace`].
pub fn resolve_namespace(
    binding: &OperationBinding,
    input: &dyn StructuredValue,
) -> ProtocolResult<Option<String>> {
    let declared = binding
        .xml_namespace_uri
        .as_deref()
        .into_iter()
        .chain(input.fields().iter().filter_map(|f| f.xml_namespace));
    let mut namespace: Option<&str> = None;
    for uri in declared {
        match namespace {
            None => namespace = Some(uri),
            Some(first) if first == uri => {}
            Some(first) => {
                return Err(ProtocolError::AmbiguousNamespace {
                    first: first.to_owned(),
                    second: uri.to_owned(),
                });
            }
        }
    }
    Ok(namespace.map(str::to_owned))
}

/// Reject a structure holding more than one flattened map.
///
/// Flattened maps all write `<entry>` siblings, so two of them in one parent
/// cannot be told apart when decoding.
pub fn check_flattened_maps(fields: &[FieldDescriptor]) -> ProtocolResult<()> {
    let mut flattened = fields.iter().filter(|f| {
        f.location == Location::Payload
            && f.kind == ValueKind::Map
            && f.map.is_some_and(|map| map.flattened)
    });
    match (flattened.next(), flattened.next()) {
        (Some(first), Some(second)) => Err(ProtocolError::MissingWireMetadata(format!(
            "flattened maps '{}' and '{}' share the entry element",
            first.member_name, second.member_name
        ))),
        _ => Ok(()),
    }
}

/// Per-call marshalling state: the optional generator and the request being built.
#[derive(Debug)]
pub struct XmlMarshallerContext {
    generator: Option<XmlGenerator>,
    request: SdkHttpRequest,
    registry: &'static MarshallerRegistry<XmlMarshaller>,
}

impl XmlMarshallerContext {
    /// A context writing into `request`; `generator` is absent for operations
    /// without payload members.
    #[must_use]
    pub fn new(request: SdkHttpRequest, generator: Option<XmlGenerator>) -> Self {
        Self {
            generator,
            request,
            registry: registry(),
        }
    }

    /// The XML generator.
    pub fn generator(&mut self) -> ProtocolResult<&mut XmlGenerator> {
        self.generator.as_mut().ok_or_else(|| {
            ProtocolError::MissingWireMetadata(
                "payload field marshalled for an operation without payload members".to_owned(),
            )
        })
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
        name: &str,
        field: &FieldDescriptor,
    ) -> ProtocolResult<()> {
        let kind = field.dispatch_kind(value)?;
        let marshaller = self.registry.get(location, kind)?;
        marshaller(self, value, name, field)
    }

    /// Encode the element-bound fields of a nested value inside the open element.
    pub fn marshall_fields(&mut self, value: &dyn StructuredValue) -> ProtocolResult<()> {
        check_flattened_maps(value.fields())?;
        for field in value.fields().iter().filter(|f| !f.xml_attribute) {
            let member = field.resolve_value(value.get(field)).unwrap_or(Value::Null);
            self.marshall(field.location, &member, field.wire_name, field)?;
        }
        Ok(())
    }
}

/// Marshals one operation input into an XML request.
#[derive(Debug)]
pub struct XmlProtocolMarshaller<'a> {
    binding: &'a OperationBinding,
    config: &'a ProtocolConfig,
    context: XmlMarshallerContext,
}

impl<'a> XmlProtocolMarshaller<'a> {
    /// A marshaller for one call of the operation described by `binding`.
    #[must_use]
    pub fn new(binding: &'a OperationBinding, config: &'a ProtocolConfig) -> Self {
        Self {
            binding,
            config,
            context: XmlMarshallerContext::new(create_request(binding), None),
        }
    }

    /// Marshal `input` and finish the request.
    ///
    /// Namespace conflicts are detected before anything is written.
    pub fn marshall(mut self, input: &dyn StructuredValue) -> ProtocolResult<SdkHttpRequest> {
        let namespace = resolve_namespace(self.binding, input)?;
        check_flattened_maps(input.fields())?;
        if self.binding.has_payload_members {
            self.context.generator =
                Some(XmlGenerator::new(namespace, self.config.xml_declaration));
        }

        for field in input.fields() {
            let value = field.resolve_value(input.get(field));
            if field.payload && self.marshall_raw_payload(value.as_ref())? {
                continue;
            }
            self.context.marshall(
                field.location,
                value.as_ref().unwrap_or(&Value::Null),
                field.wire_name,
                field,
            )?;
        }

        self.finish()
    }

    /// Set a binary or string payload as the body. Returns `false` when the
    /// value must be written as XML instead.
    fn marshall_raw_payload(&mut self, value: Option<&Value>) -> ProtocolResult<bool> {
        let request = &mut self.context.request;
        match value {
            None | Some(Value::Null) => Ok(true),
            Some(Value::Bytes(bytes)) => {
                request.set_header_if_absent("Content-Length", &bytes.len().to_string())?;
                request.set_header_if_absent("Content-Type", &self.config.binary_content_type)?;
                request.set_content(bytes.clone());
                Ok(true)
            }
            Some(Value::String(text)) => {
                request.set_header_if_absent("Content-Length", &text.len().to_string())?;
                if self.config.compute_content_md5 {
                    let digest = BASE64.encode(Md5::digest(text.as_bytes()));
                    request.set_header_if_absent("Content-MD5", &digest)?;
                }
                request.set_content(text.clone());
                Ok(true)
            }
            Some(_) => Ok(false),
        }
    }

    fn finish(self) -> ProtocolResult<SdkHttpRequest> {
        let Self {
            binding,
            config,
            context,
        } = self;
        let XmlMarshallerContext {
            generator,
            mut request,
            ..
        } = context;

        if let Some(generator) = generator {
            if !request.has_content() && !generator.is_empty() {
                let content = generator.into_bytes()?;
                request.set_header_if_absent("Content-Length", &content.len().to_string())?;
                if !binding.has_streaming_input {
                    request.set_header_if_absent("Content-Type", &config.xml_content_type)?;
                }
                request.set_content(content);
            }
        }

        tracing::debug!(
            service = %request.service_name(),
            method = %request.method(),
            path = %request.resource_path(),
            body_len = request.content().map_or(0, bytes::Bytes::len),
            "marshalled XML request"
        );
        Ok(request)
    }
}

fn marshall_scalar(
    ctx: &mut XmlMarshallerContext,
    value: &Value,
    name: &str,
    field: &FieldDescriptor,
) -> ProtocolResult<()> {
    let text = value_to_text(value, field.timestamp_format, Location::Payload)?;
    ctx.generator()?.text_element(name, &text)
}

/// Absent values write nothing in any location that has no separate null rule.
fn marshall_null(
    _ctx: &mut XmlMarshallerContext,
    _value: &Value,
    _name: &str,
    _field: &FieldDescriptor,
) -> ProtocolResult<()> {
    Ok(())
}

fn marshall_nested(
    ctx: &mut XmlMarshallerContext,
    value: &Value,
    name: &str,
    _field: &FieldDescriptor,
) -> ProtocolResult<()> {
    let Value::Nested(inner) = value else {
        return Err(mismatch(ValueKind::Nested, value));
    };
    let mut attributes = Vec::new();
    for field in inner.fields().iter().filter(|f| f.xml_attribute) {
        if let Some(attr) = field.resolve_value(inner.get(field)).filter(|v| !v.is_null()) {
            let text = value_to_text(&attr, field.timestamp_format, Location::Payload)?;
            attributes.push((field.wire_name, text));
        }
    }
    ctx.generator()?
        .start_element_with_attributes(name, &attributes)?;
    ctx.marshall_fields(inner.as_ref())?;
    ctx.generator()?.end_element()
}

fn marshall_list(
    ctx: &mut XmlMarshallerContext,
    value: &Value,
    name: &str,
    field: &FieldDescriptor,
) -> ProtocolResult<()> {
    let list = field.list_trait()?;
    let Value::List(items) = value else {
        return Err(mismatch(ValueKind::List, value));
    };
    let member_name = list.member_element_name(name);
    if !list.flattened {
        ctx.generator()?.start_element(name)?;
    }
    for item in items {
        ctx.marshall(Location::Payload, item, member_name, list.member)?;
    }
    if !list.flattened {
        ctx.generator()?.end_element()?;
    }
    Ok(())
}

fn marshall_map(
    ctx: &mut XmlMarshallerContext,
    value: &Value,
    name: &str,
    field: &FieldDescriptor,
) -> ProtocolResult<()> {
    let map = field.map_trait()?;
    let Value::Map(entries) = value else {
        return Err(mismatch(ValueKind::Map, value));
    };
    if !map.flattened {
        ctx.generator()?.start_element(name)?;
    }
    for (key, entry) in entries {
        let generator = ctx.generator()?;
        generator.start_element(MAP_ENTRY_ELEMENT)?;
        generator.text_element(map.key_wire_name, key)?;
        ctx.marshall(Location::Payload, entry, map.value_wire_name, map.value)?;
        ctx.generator()?.end_element()?;
    }
    if !map.flattened {
        ctx.generator()?.end_element()?;
    }
    Ok(())
}

fn mismatch(expected: ValueKind, actual: &Value) -> ProtocolError {
    ProtocolError::ValueMismatch {
        expected,
        actual: actual.kind(),
    }
}
