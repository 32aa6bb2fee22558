//! Streaming XML writer.
//!
//! [`XmlGenerator`] wraps a `quick_xml::Writer` over an in-memory buffer. It
//! writes the declaration lazily before the first element and declares the
//! namespace on that first element only. Text and attribute values are
//! escaped by quick-xml (`&`, `<`, `>`, `'`, `"`).

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use rustack_protocol_core::{ProtocolError, ProtocolResult};

/// Writes XML elements into a byte buffer.
pub struct XmlGenerator {
    writer: Writer<Vec<u8>>,
    open: Vec<String>,
    namespace: Option<String>,
    declaration: bool,
    started: bool,
}

impl XmlGenerator {
    /// A generator that declares `namespace` on its first element and, when
    /// `declaration` is set, writes `<?xml version="1.0" encoding="UTF-8"?>` first.
    #[must_use]
    pub fn new(namespace: Option<String>, declaration: bool) -> Self {
        Self {
            writer: Writer::new(Vec::with_capacity(256)),
            open: Vec::new(),
            namespace,
            declaration,
            started: false,
        }
    }

    /// Open element `name`.
    pub fn start_element(&mut self, name: &str) -> ProtocolResult<()> {
        self.start_element_with_attributes(name, &[])
    }

    /// Open element `name` carrying `attributes`.
    pub fn start_element_with_attributes(
        &mut self,
        name: &str,
        attributes: &[(&str, String)],
    ) -> ProtocolResult<()> {
        if !self.started {
            self.started = true;
            if self.declaration {
                self.writer
                    .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
            }
        }
        let mut start = BytesStart::new(name);
        if let Some(namespace) = self.namespace.take() {
            start.push_attribute(("xmlns", namespace.as_str()));
        }
        for (key, value) in attributes {
            start.push_attribute((*key, value.as_str()));
        }
        self.writer.write_event(Event::Start(start))?;
        self.open.push(name.to_owned());
        Ok(())
    }

    /// Close the innermost open element.
    pub fn end_element(&mut self) -> ProtocolResult<()> {
        let name = self
            .open
            .pop()
            .ok_or_else(|| ProtocolError::malformed_xml("no open element to close"))?;
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    /// Write escaped text inside the innermost open element.
    pub fn value(&mut self, text: &str) -> ProtocolResult<()> {
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        Ok(())
    }

    /// `<name>text</name>`
    pub fn text_element(&mut self, name: &str, text: &str) -> ProtocolResult<()> {
        self.start_element(name)?;
        self.value(text)?;
        self.end_element()
    }

    /// Whether no element has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.started
    }

    /// The written document. Fails if an element is still open.
    pub fn into_bytes(self) -> ProtocolResult<Vec<u8>> {
        if let Some(name) = self.open.last() {
            return Err(ProtocolError::malformed_xml(format!(
                "element <{name}> was never closed"
            )));
        }
        Ok(self.writer.into_inner())
    }
}

impl std::fmt::Debug for XmlGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XmlGenerator")
            .field("open", &self.open)
            .field("started", &self.started)
            .finish_non_exhaustive()
    }
}
