//! Pull-based XML event stream with depth tracking.
//!
//! [`QuickXmlSource`] turns a byte buffer into a flat sequence of
//! [`XmlEvent`]s: every element start is followed by one event per attribute,
//! empty elements expand to a start/end pair, and entity references are
//! folded into text. [`XmlCursor`] sits on top and tracks the element stack,
//! so decoders can tell which depth an event belongs to and stop when they
//! leave their own subtree.

use std::collections::VecDeque;
use std::io::Cursor;

use bytes::Bytes;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use rustack_protocol_core::{ProtocolError, ProtocolResult};

/// One step of the XML event stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlEvent {
    /// An element opened; local name.
    StartElement(String),
    /// An attribute of the element that just opened; local name and unescaped value.
    Attribute {
        /// Attribute local name.
        name: String,
        /// Unescaped attribute value.
        value: String,
    },
    /// Unescaped character data.
    Text(String),
    /// An element closed; local name.
    EndElement(String),
    /// The input is exhausted.
    EndDocument,
}

/// A source of [`XmlEvent`]s.
pub trait XmlEventSource: Send {
    /// The next event. Returns [`XmlEvent::EndDocument`] once exhausted.
    fn next_event(&mut self) -> ProtocolResult<XmlEvent>;
}

impl XmlEventSource for VecDeque<XmlEvent> {
    fn next_event(&mut self) -> ProtocolResult<XmlEvent> {
        Ok(self.pop_front().unwrap_or(XmlEvent::EndDocument))
    }
}

/// [`XmlEventSource`] backed by quick-xml.
pub struct QuickXmlSource {
    reader: Reader<Cursor<Bytes>>,
    buf: Vec<u8>,
    pending: VecDeque<XmlEvent>,
}

impl QuickXmlSource {
    /// Read events from `content`.
    #[must_use]
    pub fn new(content: Bytes) -> Self {
        Self {
            reader: Reader::from_reader(Cursor::new(content)),
            buf: Vec::new(),
            pending: VecDeque::new(),
        }
    }

    fn queue_start(&mut self, start: &BytesStart<'_>) -> ProtocolResult<()> {
        self.pending
            .push_back(XmlEvent::StartElement(utf8(start.local_name().as_ref())?.to_owned()));
        for attribute in start.attributes() {
            let attribute = attribute.map_err(ProtocolError::malformed_xml)?;
            let key = attribute.key.as_ref();
            if key == b"xmlns" || key.starts_with(b"xmlns:") {
                continue;
            }
            let raw = utf8(&attribute.value)?;
            let value = quick_xml::escape::unescape(raw).map_err(ProtocolError::malformed_xml)?;
            self.pending.push_back(XmlEvent::Attribute {
                name: utf8(attribute.key.local_name().as_ref())?.to_owned(),
                value: value.into_owned(),
            });
        }
        Ok(())
    }
}

impl XmlEventSource for QuickXmlSource {
    fn next_event(&mut self) -> ProtocolResult<XmlEvent> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Ok(event);
            }
            self.buf.clear();
            let event = self
                .reader
                .read_event_into(&mut self.buf)
                .map_err(ProtocolError::malformed_xml)?
                .into_owned();
            match event {
                Event::Start(start) => self.queue_start(&start)?,
                Event::Empty(start) => {
                    self.queue_start(&start)?;
                    let name = utf8(start.local_name().as_ref())?.to_owned();
                    self.pending.push_back(XmlEvent::EndElement(name));
                }
                Event::End(end) => {
                    let name = utf8(end.local_name().as_ref())?.to_owned();
                    return Ok(XmlEvent::EndElement(name));
                }
                Event::Text(text) => {
                    let decoded = text.decode().map_err(ProtocolError::malformed_xml)?;
                    let unescaped = quick_xml::escape::unescape(&decoded)
                        .map_err(ProtocolError::malformed_xml)?;
                    return Ok(XmlEvent::Text(unescaped.into_owned()));
                }
                Event::CData(data) => {
                    return Ok(XmlEvent::Text(utf8(&data)?.to_owned()));
                }
                Event::GeneralRef(reference) => {
                    if let Some(ch) = reference
                        .resolve_char_ref()
                        .map_err(ProtocolError::malformed_xml)?
                    {
                        return Ok(XmlEvent::Text(ch.to_string()));
                    }
                    let name = reference.decode().map_err(ProtocolError::malformed_xml)?;
                    let resolved = quick_xml::escape::resolve_predefined_entity(&name)
                        .ok_or_else(|| {
                            ProtocolError::malformed_xml(format!("unknown entity &{name};"))
                        })?;
                    return Ok(XmlEvent::Text(resolved.to_owned()));
                }
                Event::Eof => return Ok(XmlEvent::EndDocument),
                _ => {}
            }
        }
    }
}

impl std::fmt::Debug for QuickXmlSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuickXmlSource")
            .field("position", &self.reader.buffer_position())
            .field("pending", &self.pending.len())
            .finish_non_exhaustive()
    }
}

fn utf8(bytes: &[u8]) -> ProtocolResult<&str> {
    std::str::from_utf8(bytes).map_err(ProtocolError::malformed_xml)
}

/// Depth-tracking cursor over an [`XmlEventSource`].
///
/// Depth is the number of open elements: 0 before the root opens, 1 inside
/// the root. A start event increments depth as it is consumed and an end event
/// decrements it.
pub struct XmlCursor {
    source: Box<dyn XmlEventSource>,
    stack: Vec<String>,
    peeked: Option<XmlEvent>,
    consumed_any: bool,
}

impl XmlCursor {
    /// A cursor over `source`.
    #[must_use]
    pub fn new(source: Box<dyn XmlEventSource>) -> Self {
        Self {
            source,
            stack: Vec::new(),
            peeked: None,
            consumed_any: false,
        }
    }

    /// A cursor over an XML document in `content`.
    #[must_use]
    pub fn from_bytes(content: Bytes) -> Self {
        Self::new(Box::new(QuickXmlSource::new(content)))
    }

    /// Number of currently open elements.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Local name of the innermost open element.
    #[must_use]
    pub fn current_element(&self) -> Option<&str> {
        self.stack.last().map(String::as_str)
    }

    /// Whether no event has been consumed yet.
    #[must_use]
    pub fn is_start_of_document(&self) -> bool {
        !self.consumed_any
    }

    /// Look at the next event without consuming it.
    pub fn peek(&mut self) -> ProtocolResult<&XmlEvent> {
        if self.peeked.is_none() {
            self.peeked = Some(self.source.next_event()?);
        }
        self.peeked
            .as_ref()
            .ok_or_else(|| ProtocolError::malformed_xml("event stream lost its lookahead"))
    }

    /// Consume the next event, updating the depth.
    pub fn next_event(&mut self) -> ProtocolResult<XmlEvent> {
        let event = match self.peeked.take() {
            Some(event) => event,
            None => self.source.next_event()?,
        };
        self.consumed_any = true;
        match &event {
            XmlEvent::StartElement(name) => self.stack.push(name.clone()),
            XmlEvent::EndElement(name) => match self.stack.pop() {
                Some(open) if open == *name => {}
                Some(open) => {
                    return Err(ProtocolError::malformed_xml(format!(
                        "expected </{open}>, found </{name}>"
                    )));
                }
                None => {
                    return Err(ProtocolError::malformed_xml(format!(
                        "unexpected </{name}> at document level"
                    )));
                }
            },
            XmlEvent::EndDocument => {
                if let Some(open) = self.stack.last() {
                    return Err(ProtocolError::malformed_xml(format!(
                        "document ended inside <{open}>"
                    )));
                }
            }
            XmlEvent::Attribute { .. } | XmlEvent::Text(_) => {}
        }
        Ok(event)
    }

    /// Read the text of the element just opened and consume its end tag.
    ///
    /// Attributes are skipped; a child element is an error.
    pub fn read_text(&mut self) -> ProtocolResult<String> {
        let depth = self.depth();
        let mut text = String::new();
        loop {
            match self.next_event()? {
                XmlEvent::Text(chunk) => text.push_str(&chunk),
                XmlEvent::Attribute { .. } => {}
                XmlEvent::StartElement(name) => {
                    return Err(ProtocolError::malformed_xml(format!(
                        "unexpected element <{name}> inside text content"
                    )));
                }
                XmlEvent::EndElement(_) if self.depth() < depth => return Ok(text),
                XmlEvent::EndElement(_) => {}
                XmlEvent::EndDocument => {
                    return Err(ProtocolError::malformed_xml(
                        "document ended while reading text content",
                    ));
                }
            }
        }
    }
}

impl std::fmt::Debug for XmlCursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XmlCursor")
            .field("stack", &self.stack)
            .field("peeked", &self.peeked)
            .finish_non_exhaustive()
    }
}
