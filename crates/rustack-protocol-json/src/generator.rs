//! Streaming JSON writer.
//!
//! [`JsonGenerator`] appends tokens to an in-memory buffer and inserts the
//! separators itself, so the marshallers only express structure: start/end
//! object or array, field name, value. String escaping goes through
//! `serde_json`.

use rustack_protocol_core::ProtocolResult;
use rustack_protocol_core::convert::{format_double, format_float};
use rustack_protocol_core::error::ProtocolError;

#[derive(Debug, Clone, Copy)]
struct Scope {
    first: bool,
    after_field_name: bool,
}

/// Writes JSON tokens into a byte buffer.
#[derive(Debug, Default)]
pub struct JsonGenerator {
    buf: Vec<u8>,
    scopes: Vec<Scope>,
}

impl JsonGenerator {
    /// An empty generator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `{`
    pub fn write_start_object(&mut self) {
        self.before_value();
        self.buf.push(b'{');
        self.open_scope();
    }

    /// `}`
    pub fn write_end_object(&mut self) -> ProtocolResult<()> {
        self.close_scope("object")?;
        self.buf.push(b'}');
        Ok(())
    }

    /// `[`
    pub fn write_start_array(&mut self) {
        self.before_value();
        self.buf.push(b'[');
        self.open_scope();
    }

    /// `]`
    pub fn write_end_array(&mut self) -> ProtocolResult<()> {
        self.close_scope("array")?;
        self.buf.push(b']');
        Ok(())
    }

    /// `"name":`
    pub fn write_field_name(&mut self, name: &str) -> ProtocolResult<()> {
        if let Some(scope) = self.scopes.last_mut() {
            if !scope.first {
                self.buf.push(b',');
            }
            scope.first = false;
            scope.after_field_name = true;
        }
        self.write_json_string(name)?;
        self.buf.push(b':');
        Ok(())
    }

    /// A string value.
    pub fn write_string(&mut self, value: &str) -> ProtocolResult<()> {
        self.before_value();
        self.write_json_string(value)
    }

    /// A number or literal, written verbatim.
    pub fn write_raw_value(&mut self, token: &str) {
        self.before_value();
        self.buf.extend_from_slice(token.as_bytes());
    }

    /// A boolean value.
    pub fn write_bool(&mut self, value: bool) {
        self.write_raw_value(if value { "true" } else { "false" });
    }

    /// `null`
    pub fn write_null(&mut self) {
        self.write_raw_value("null");
    }

    /// A double; non-finite values are written as their string spelling.
    pub fn write_double(&mut self, value: f64) -> ProtocolResult<()> {
        if value.is_finite() {
            self.write_raw_value(&format_double(value));
            Ok(())
        } else {
            self.write_string(&format_double(value))
        }
    }

    /// A float; non-finite values are written as their string spelling.
    pub fn write_float(&mut self, value: f32) -> ProtocolResult<()> {
        if value.is_finite() {
            self.write_raw_value(&format_float(value));
            Ok(())
        } else {
            self.write_string(&format_float(value))
        }
    }

    /// Whether nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The written bytes. Fails if an object or array is still open.
    pub fn into_bytes(self) -> ProtocolResult<Vec<u8>> {
        if self.scopes.is_empty() {
            Ok(self.buf)
        } else {
            Err(ProtocolError::malformed_json(format!(
                "{} unclosed JSON scopes",
                self.scopes.len()
            )))
        }
    }

    fn before_value(&mut self) {
        if let Some(scope) = self.scopes.last_mut() {
            if scope.after_field_name {
                scope.after_field_name = false;
            } else {
                if !scope.first {
                    self.buf.push(b',');
                }
                scope.first = false;
            }
        }
    }

    fn open_scope(&mut self) {
        self.scopes.push(Scope {
            first: true,
            after_field_name: false,
        });
    }

    fn close_scope(&mut self, what: &str) -> ProtocolResult<()> {
        self.scopes
            .pop()
            .map(|_| ())
            .ok_or_else(|| ProtocolError::malformed_json(format!("no open {what} to close")))
    }

    fn write_json_string(&mut self, value: &str) -> ProtocolResult<()> {
        serde_json::to_writer(&mut self.buf, value).map_err(std::io::Error::from)?;
        Ok(())
    }
}
