//! XML wire codec for Rustack protocol marshalling.
//!
//! - [`generator`]: streaming XML writer
//! - [`marshall`]: request marshalling ([`XmlProtocolMarshaller`])
//! - [`cursor`]: pull-based XML events and the depth-tracked [`XmlCursor`]
//! - [`unmarshall`]: response unmarshalling ([`XmlProtocolUnmarshaller`])
//! - [`handler`]: [`XmlResponseHandler`], response logging around the unmarshaller
//! - [`factory`]: [`XmlProtocolFactory`], the entry point for clients
//!
//! Payload fields are written as a sequence of elements without a wrapping
//! root; a structure is decoded from the children of the document's root.

pub mod cursor;
pub mod factory;
pub mod generator;
pub mod handler;
pub mod marshall;
pub mod unmarshall;

pub use cursor::{QuickXmlSource, XmlCursor, XmlEvent, XmlEventSource};
pub use factory::XmlProtocolFactory;
pub use generator::XmlGenerator;
pub use handler::XmlResponseHandler;
pub use marshall::{XmlMarshallerContext, XmlProtocolMarshaller};
pub use unmarshall::{XmlProtocolUnmarshaller, XmlUnmarshallerContext};
