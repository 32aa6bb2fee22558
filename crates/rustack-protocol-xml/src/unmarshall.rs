//! Streaming XML response unmarshalling.
//!
//! Decoding walks an [`XmlCursor`] forward exactly once. A structure records
//! the depth it starts at and only inspects events one level below it; deeper
//! events belong to the recursive decoder of the child being read, and the
//! structure is complete as soon as the depth drops below where it started.
//! Elements are matched to fields by name, never by position. Elements with no
//! matching field are skipped.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use http::{HeaderMap, StatusCode};
use rustack_protocol_core::binding;
use rustack_protocol_core::convert::text_to_value;
use rustack_protocol_core::descriptor::MAP_ENTRY_ELEMENT;
use rustack_protocol_core::registry::MarshallerRegistry;
use rustack_protocol_core::{
    FieldDescriptor, Location, MapTrait, OperationBinding, ProtocolError, ProtocolResult,
    SdkHttpResponse, StructuredValue, Value, ValueKind,
};

use crate::cursor::{XmlCursor, XmlEvent};

/// Decodes one value. Payload decoders run with the cursor positioned just
/// after the field's start element.
pub type XmlUnmarshaller =
    fn(&mut XmlUnmarshallerContext, &FieldDescriptor) -> ProtocolResult<Value>;

/// Every `(Location, ValueKind)` pair the XML response registry must cover.
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

static REGISTRY: LazyLock<MarshallerRegistry<XmlUnmarshaller>> = LazyLock::new(|| {
    MarshallerRegistry::<XmlUnmarshaller>::builder()
        .register_all(Location::Payload, &ValueKind::SCALARS, unmarshall_scalar)
        .payload(ValueKind::Nested, unmarshall_nested)
        .payload(ValueKind::List, unmarshall_list)
        .payload(ValueKind::Map, unmarshall_map)
        .register_all(Location::Header, &ValueKind::SCALARS, |ctx, f| {
            binding::unmarshall_header(&ctx.headers, f)
        })
        .header(ValueKind::List, |ctx, f| {
            binding::unmarshall_header_list(&ctx.headers, f)
        })
        .header(ValueKind::Map, |ctx, f| {
            binding::unmarshall_header_map(&ctx.headers, f)
        })
        .status_code(ValueKind::Integer, |ctx, _| {
            Ok(binding::unmarshall_status_code(ctx.status))
        })
        .build()
});

/// The process-wide XML response registry.
#[must_use]
pub fn registry() -> &'static MarshallerRegistry<XmlUnmarshaller> {
    &REGISTRY
}

/// Descriptor used to decode map keys.
static MAP_KEY: FieldDescriptor = FieldDescriptor::member("key", ValueKind::String);

/// Per-response decoding state: the cursor, the envelope and the registry.
#[derive(Debug)]
pub struct XmlUnmarshallerContext {
    cursor: XmlCursor,
    status: StatusCode,
    headers: HeaderMap,
    pending_attribute: Option<String>,
    registry: &'static MarshallerRegistry<XmlUnmarshaller>,
}

impl XmlUnmarshallerContext {
    /// A context reading the body of `response`.
    #[must_use]
    pub fn new(response: &SdkHttpResponse) -> Self {
        Self::with_cursor(
            XmlCursor::from_bytes(response.content().clone()),
            response,
        )
    }

    /// A context reading events from `cursor` with the envelope of `response`.
    #[must_use]
    pub fn with_cursor(cursor: XmlCursor, response: &SdkHttpResponse) -> Self {
        Self {
            cursor,
            status: response.status(),
            headers: response.headers().clone(),
            pending_attribute: None,
            registry: registry(),
        }
    }

    /// The underlying cursor.
    pub fn cursor(&mut self) -> &mut XmlCursor {
        &mut self.cursor
    }

    /// Decode `field` bound at `location`.
    pub fn unmarshall(
        &mut self,
        location: Location,
        field: &FieldDescriptor,
    ) -> ProtocolResult<Value> {
        let decoder = self.registry.get(location, field.kind)?;
        decoder(self, field)
    }

    /// Text of the attribute being decoded, or of the element just opened.
    pub fn read_text(&mut self) -> ProtocolResult<String> {
        match self.pending_attribute.take() {
            Some(value) => Ok(value),
            None => self.cursor.read_text(),
        }
    }

    /// Decode the payload fields of `target` from the current element's children
    /// and attributes, consuming through the element's end tag.
    ///
    /// At the start of a document the root element is implicit: fields are
    /// read from the root's children.
    pub fn unmarshall_fields(&mut self, target: &mut dyn StructuredValue) -> ProtocolResult<()> {
        let fields = target.fields();
        let original_depth = self.cursor.depth();
        let mut target_depth = original_depth + 1;
        if self.cursor.is_start_of_document() {
            target_depth += 1;
        }

        loop {
            let event = self.cursor.next_event()?;
            let depth = self.cursor.depth();
            match event {
                XmlEvent::EndDocument => break,
                XmlEvent::StartElement(name) if depth == target_depth => {
                    let field = fields.iter().find(|f| {
                        f.location == Location::Payload
                            && !f.xml_attribute
                            && f.xml_element_name() == name
                    });
                    match field {
                        Some(field) => {
                            let value = self.unmarshall(Location::Payload, field)?;
                            store(target, field, value)?;
                        }
                        None => tracing::trace!(element = %name, "skipping unknown XML element"),
                    }
                }
                XmlEvent::Attribute { name, value } if depth + 1 == target_depth => {
                    let field = fields.iter().find(|f| {
                        f.location == Location::Payload && f.xml_attribute && f.wire_name == name
                    });
                    if let Some(field) = field {
                        if !field.kind.is_scalar() {
                            return Err(ProtocolError::MissingWireMetadata(format!(
                                "attribute field '{}' must be a scalar",
                                field.member_name
                            )));
                        }
                        self.pending_attribute = Some(value);
                        let value = self.unmarshall(Location::Payload, field)?;
                        store(target, field, value)?;
                    }
                }
                XmlEvent::EndElement(_) if depth < original_depth => break,
                _ => {}
            }
        }
        Ok(())
    }

    /// Consume whitespace and report whether the next event opens a sibling named `name`.
    fn next_sibling_is(&mut self, name: &str) -> ProtocolResult<bool> {
        loop {
            match self.cursor.peek()? {
                XmlEvent::Text(text) if text.trim().is_empty() => {
                    self.cursor.next_event()?;
                }
                XmlEvent::StartElement(next) => return Ok(next == name),
                _ => return Ok(false),
            }
        }
    }
}

/// Set `value` on `target`, appending to a flattened collection that already
/// holds members from an earlier run of siblings.
fn store(
    target: &mut dyn StructuredValue,
    field: &FieldDescriptor,
    value: Value,
) -> ProtocolResult<()> {
    if value.is_null() {
        return Ok(());
    }
    if !field.is_flattened() {
        return target.set(field, value);
    }
    let merged = match (target.get(field), value) {
        (Some(Value::List(mut existing)), Value::List(more)) => {
            existing.extend(more);
            Value::List(existing)
        }
        (Some(Value::Map(mut existing)), Value::Map(more)) => {
            existing.extend(more);
            Value::Map(existing)
        }
        (_, value) => value,
    };
    target.set(field, merged)
}

/// Unmarshals XML responses of one operation.
#[derive(Debug)]
pub struct XmlProtocolUnmarshaller<'a> {
    binding: &'a OperationBinding,
}

impl<'a> XmlProtocolUnmarshaller<'a> {
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
    ///
    /// Status-code and header fields are assigned before the body is read.
    pub fn unmarshall_into(
        &self,
        target: &mut dyn StructuredValue,
        response: &SdkHttpResponse,
    ) -> ProtocolResult<()> {
        let mut context = XmlUnmarshallerContext::new(response);
        let fields = target.fields();

        for field in fields
            .iter()
            .filter(|f| matches!(f.location, Location::StatusCode | Location::Header))
        {
            let value = context.unmarshall(field.location, field)?;
            if !value.is_null() {
                target.set(field, value)?;
            }
        }

        let body = response.content();
        if let Some(field) = fields.iter().find(|f| f.payload) {
            return match field.kind {
                ValueKind::Bytes => target.set(field, Value::Bytes(body.clone())),
                ValueKind::String => {
                    let text = std::str::from_utf8(body).map_err(ProtocolError::malformed_xml)?;
                    target.set(field, Value::String(text.to_owned()))
                }
                _ if body.is_empty() => Ok(()),
                _ => {
                    if !open_root(&mut context.cursor)? {
                        return Ok(());
                    }
                    let value = context.unmarshall(Location::Payload, field)?;
                    store(target, field, value)
                }
            };
        }

        let has_payload_fields = fields.iter().any(|f| f.location == Location::Payload);
        if !has_payload_fields || body.is_empty() || self.binding.has_streaming_output {
            return Ok(());
        }
        context.unmarshall_fields(target)
    }
}

/// Advance to the document's root element. Returns `false` for a document
/// without elements.
fn open_root(cursor: &mut XmlCursor) -> ProtocolResult<bool> {
    loop {
        match cursor.next_event()? {
            XmlEvent::StartElement(_) => return Ok(true),
            XmlEvent::EndDocument => return Ok(false),
            _ => {}
        }
    }
}

fn unmarshall_scalar(
    ctx: &mut XmlUnmarshallerContext,
    field: &FieldDescriptor,
) -> ProtocolResult<Value> {
    let text = ctx.read_text()?;
    if text.is_empty() && !matches!(field.kind, ValueKind::String | ValueKind::Bytes) {
        return Ok(Value::Null);
    }
    text_to_value(&text, field.kind, field.timestamp_format, Location::Payload)
}

fn unmarshall_nested(
    ctx: &mut XmlUnmarshallerContext,
    field: &FieldDescriptor,
) -> ProtocolResult<Value> {
    let mut nested = field.construct()?;
    ctx.unmarshall_fields(nested.as_mut())?;
    Ok(Value::Nested(nested))
}

fn unmarshall_list(
    ctx: &mut XmlUnmarshallerContext,
    field: &FieldDescriptor,
) -> ProtocolResult<Value> {
    let list = field.list_trait()?;
    let member_name = list.member_element_name(field.wire_name);
    let mut items = Vec::new();

    if list.flattened {
        items.push(ctx.unmarshall(Location::Payload, list.member)?);
        while ctx.next_sibling_is(member_name)? {
            ctx.cursor.next_event()?;
            items.push(ctx.unmarshall(Location::Payload, list.member)?);
        }
        return Ok(Value::List(items));
    }

    let original_depth = ctx.cursor.depth();
    loop {
        let event = ctx.cursor.next_event()?;
        let depth = ctx.cursor.depth();
        match event {
            XmlEvent::EndDocument => break,
            XmlEvent::StartElement(name) if depth == original_depth + 1 && name == member_name => {
                items.push(ctx.unmarshall(Location::Payload, list.member)?);
            }
            XmlEvent::EndElement(_) if depth < original_depth => break,
            _ => {}
        }
    }
    Ok(Value::List(items))
}

fn unmarshall_map(
    ctx: &mut XmlUnmarshallerContext,
    field: &FieldDescriptor,
) -> ProtocolResult<Value> {
    let map = field.map_trait()?;
    let mut entries = BTreeMap::new();

    if map.flattened {
        unmarshall_entry(ctx, map, &mut entries)?;
        while ctx.next_sibling_is(MAP_ENTRY_ELEMENT)? {
            ctx.cursor.next_event()?;
            unmarshall_entry(ctx, map, &mut entries)?;
        }
        return Ok(Value::Map(entries));
    }

    let original_depth = ctx.cursor.depth();
    loop {
        let event = ctx.cursor.next_event()?;
        let depth = ctx.cursor.depth();
        match event {
            XmlEvent::EndDocument => break,
            XmlEvent::StartElement(name)
                if depth == original_depth + 1
                    && name == MAP_ENTRY_ELEMENT =>
            {
                unmarshall_entry(ctx, map, &mut entries)?;
            }
            XmlEvent::EndElement(_) if depth < original_depth => break,
            _ => {}
        }
    }
    Ok(Value::Map(entries))
}

/// Decode one `<entry>` whose start tag was just consumed. Entries without a
/// value element are dropped.
fn unmarshall_entry(
    ctx: &mut XmlUnmarshallerContext,
    map: &MapTrait,
    entries: &mut BTreeMap<String, Value>,
) -> ProtocolResult<()> {
    let entry_depth = ctx.cursor.depth();
    let mut key = None;
    let mut value = Value::Null;
    loop {
        let event = ctx.cursor.next_event()?;
        let depth = ctx.cursor.depth();
        match event {
            XmlEvent::EndDocument => break,
            XmlEvent::StartElement(name) if depth == entry_depth + 1 => {
                if name == map.key_wire_name {
                    key = Some(ctx.unmarshall(Location::Payload, &MAP_KEY)?);
                } else if name == map.value_wire_name {
                    value = ctx.unmarshall(Location::Payload, map.value)?;
                }
            }
            XmlEvent::EndElement(_) if depth < entry_depth => break,
            _ => {}
        }
    }
    match key {
        Some(Value::String(key)) => {
            if !value.is_null() {
                entries.insert(key, value);
            }
            Ok(())
        }
        _ => Err(ProtocolError::malformed_xml(format!(
            "map entry without <{}> element",
            map.key_wire_name
        ))),
    }
}
