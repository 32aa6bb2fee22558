//! Entry point for JSON protocol clients.

use rustack_protocol_core::{OperationBinding, ProtocolConfig};

use crate::marshall::JsonProtocolMarshaller;
use crate::unmarshall::JsonProtocolUnmarshaller;

/// Creates per-call JSON marshallers and unmarshallers sharing one configuration.
///
/// # Examples
///
/// ```
/// use rustack_protocol_core::{DynamicStruct, FieldDescriptor, OperationBinding, ValueKind};
/// use rustack_protocol_json::JsonProtocolFactory;
///
/// static FIELDS: [FieldDescriptor; 1] = [FieldDescriptor::member("TableName", ValueKind::String)];
///
/// let factory = JsonProtocolFactory::default();
/// let binding = OperationBinding::builder()
///     .request_uri("/")
///     .http_method(http::Method::POST)
///     .service_name("DynamoDB")
///     .operation_identifier("DynamoDB_20120810.DescribeTable")
///     .has_payload_members(true)
///     .build();
/// let input = DynamicStruct::new(&FIELDS).with("TableName", "users");
///
/// let request = factory
///     .create_protocol_marshaller(&binding)
///     .marshall(&input)
///     .unwrap();
/// assert_eq!(request.content().unwrap().as_ref(), br#"{"TableName":"users"}"#);
/// ```
#[derive(Debug, Clone, Default)]
pub struct JsonProtocolFactory {
    config: ProtocolConfig,
}

impl JsonProtocolFactory {
    /// A factory using `config`.
    #[must_use]
    pub fn new(config: ProtocolConfig) -> Self {
        Self { config }
    }

    /// The configuration applied to every call.
    #[must_use]
    pub fn config(&self) -> &ProtocolConfig {
        &self.config
    }

    /// A marshaller for one call of `binding`.
    #[must_use]
    pub fn create_protocol_marshaller<'a>(
        &'a self,
        binding: &'a OperationBinding,
    ) -> JsonProtocolMarshaller<'a> {
        JsonProtocolMarshaller::new(binding, &self.config)
    }

    /// An unmarshaller for responses of `binding`.
    #[must_use]
    pub fn create_response_unmarshaller<'a>(
        &'a self,
        binding: &'a OperationBinding,
    ) -> JsonProtocolUnmarshaller<'a> {
        JsonProtocolUnmarshaller::new(binding)
    }
}
