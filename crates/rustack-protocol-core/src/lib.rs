//! Core types for Rustack protocol marshalling.
//!
//! This crate holds everything the wire codecs share:
//!
//! - [`descriptor`]: static field metadata ([`FieldDescriptor`]) and its traits
//! - [`value`]: the [`Value`] model and the [`StructuredValue`] trait
//! - [`convert`]: scalar to text conversion, including timestamp formats
//! - [`registry`]: the `(Location, ValueKind)` codec table
//! - [`operation`]: per-operation binding metadata
//! - [`request`] / [`response`]: the wire request and response
//! - [`binding`]: header, query, path and status-code codecs
//! - [`uri`]: URI template handling
//! - [`config`]: codec configuration
//! - [`error`]: the shared [`ProtocolError`]

pub mod binding;
pub mod config;
pub mod convert;
pub mod descriptor;
pub mod error;
pub mod operation;
pub mod registry;
pub mod request;
pub mod response;
pub mod uri;
pub mod value;

pub use config::ProtocolConfig;
pub use descriptor::{
    FieldDescriptor, ListTrait, Location, MapTrait, TimestampFormat, ValueKind,
};
pub use error::{ProtocolError, ProtocolResult};
pub use operation::OperationBinding;
pub use registry::MarshallerRegistry;
pub use request::SdkHttpRequest;
pub use response::SdkHttpResponse;
pub use value::{BigDecimal, DynamicStruct, FromValue, StructuredValue, Value};
