//! JSON wire codec for Rustack protocol marshalling.
//!
//! - [`generator`]: streaming JSON writer
//! - [`marshall`]: request marshalling ([`JsonProtocolMarshaller`])
//! - [`unmarshall`]: response unmarshalling ([`JsonProtocolUnmarshaller`])
//! - [`factory`]: [`JsonProtocolFactory`], the entry point for clients

pub mod factory;
pub mod generator;
pub mod marshall;
pub mod unmarshall;

pub use factory::JsonProtocolFactory;
pub use generator::JsonGenerator;
pub use marshall::{JsonMarshallerContext, JsonProtocolMarshaller};
pub use unmarshall::{JsonProtocolUnmarshaller, JsonUnmarshallerContext};
