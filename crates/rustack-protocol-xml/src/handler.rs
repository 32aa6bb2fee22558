//! XML response handler.

use std::marker::PhantomData;

use rustack_protocol_core::{OperationBinding, ProtocolResult, SdkHttpResponse, StructuredValue};

use crate::unmarshall::XmlProtocolUnmarshaller;

/// Turns an XML response into a typed output value.
///
/// Streaming outputs and empty bodies are not parsed; their envelope fields
/// are still filled in.
#[derive(Debug)]
pub struct XmlResponseHandler<'a, T> {
    binding: &'a OperationBinding,
    _output: PhantomData<fn() -> T>,
}

impl<'a, T: StructuredValue + Default> XmlResponseHandler<'a, T> {
    /// A handler for responses of the operation described by `binding`.
    #[must_use]
    pub fn new(binding: &'a OperationBinding) -> Self {
        Self {
            binding,
            _output: PhantomData,
        }
    }

    /// Whether the body is left unread for the caller to stream.
    #[must_use]
    pub fn needs_connection_left_open(&self) -> bool {
        self.binding.has_streaming_output
    }

    /// Decode `response`.
    pub fn handle(&self, response: &SdkHttpResponse) -> ProtocolResult<T> {
        tracing::debug!(
            service = %self.binding.service_name,
            status = response.status().as_u16(),
            request_id = response.request_id().unwrap_or("not available"),
            "received XML response"
        );
        tracing::trace!("parsing service response XML");
        let output = XmlProtocolUnmarshaller::new(self.binding).unmarshall::<T>(response)?;
        tracing::trace!("done parsing service response XML");
        Ok(output)
    }
}
