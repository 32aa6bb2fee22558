//! Error types shared by every protocol codec.
//!
//! All marshalling and unmarshalling failures surface as a [`ProtocolError`].
//! Errors are raised synchronously from the call that detects them; no codec
//! retries or recovers.

use std::io;

use crate::descriptor::{Location, ValueKind};

/// Errors raised while marshalling a request or unmarshalling a response.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// No marshaller or unmarshaller is registered for this location and kind.
    #[error("no codec registered for {kind} values bound to {location}")]
    UnsupportedCombination {
        /// Where the field is bound.
        location: Location,
        /// The field's value kind.
        kind: ValueKind,
    },

    /// More than one distinct XML namespace was declared by the members of one value.
    #[error("conflicting XML namespaces: {first} and {second}")]
    AmbiguousNamespace {
        /// The first namespace URI seen.
        first: String,
        /// The namespace URI that conflicted with it.
        second: String,
    },

    /// A field is missing the trait its kind or location requires.
    #[error("missing wire metadata: {0}")]
    MissingWireMetadata(String),

    /// A timestamp is bound to a location that has no default format.
    #[error("timestamps bound to {0} need an explicit format")]
    UnsupportedTimestampLocation(Location),

    /// A timestamp format tag outside `iso8601`, `rfc822`, `unixTimestamp`.
    #[error("unrecognized timestamp format: {0}")]
    UnrecognizedTimestampFormat(String),

    /// The input bytes cannot be tokenized as the expected wire format.
    #[error("malformed {format} stream: {message}")]
    MalformedStream {
        /// Wire format name, `"JSON"` or `"XML"`.
        format: &'static str,
        /// Tokenizer diagnostic.
        message: String,
    },

    /// A value does not have the kind its descriptor declares.
    #[error("value mismatch: expected {expected}, got {actual}")]
    ValueMismatch {
        /// The kind the descriptor declares.
        expected: ValueKind,
        /// The kind that was supplied.
        actual: ValueKind,
    },

    /// A scalar could not be converted from its wire text.
    #[error("failed to parse value: {0}")]
    ParseError(String),

    /// A path parameter was absent or empty.
    #[error("invalid path parameter: {0}")]
    InvalidPathParameter(String),

    /// A header name or value cannot be represented on the wire.
    #[error("invalid header: {0}")]
    InvalidHeader(String),

    /// An I/O error from an output writer.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl ProtocolError {
    /// Build a [`ProtocolError::MalformedStream`] for a JSON tokenizer failure.
    pub fn malformed_json(err: impl std::fmt::Display) -> Self {
        Self::MalformedStream {
            format: "JSON",
            message: err.to_string(),
        }
    }

    /// Build a [`ProtocolError::MalformedStream`] for an XML tokenizer failure.
    pub fn malformed_xml(err: impl std::fmt::Display) -> Self {
        Self::MalformedStream {
            format: "XML",
            message: err.to_string(),
        }
    }
}

/// Convenience result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;
