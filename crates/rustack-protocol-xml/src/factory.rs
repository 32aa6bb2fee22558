//! Entry point for XML protocol clients.

use rustack_protocol_core::{OperationBinding, ProtocolConfig, StructuredValue};

use crate::handler::XmlResponseHandler;
use crate::marshall::XmlProtocolMarshaller;

/// Creates per-call XML marshallers and response handlers sharing one configuration.
///
/// # Examples
///
/// ```
/// use rustack_protocol_core::{
///     DynamicStruct, FieldDescriptor, Location, OperationBinding, ProtocolConfig, ValueKind,
/// };
/// use rustack_protocol_xml::XmlProtocolFactory;
///
/// static FIELDS: [FieldDescriptor; 2] = [
///     FieldDescriptor::new("Bucket", Location::PathParam, ValueKind::String, "Bucket"),
///     FieldDescriptor::member("LocationConstraint", ValueKind::String),
/// ];
///
/// let factory = XmlProtocolFactory::new(ProtocolConfig::builder().xml_declaration(false).build());
/// let binding = OperationBinding::builder()
///     .request_uri("/{Bucket}")
///     .http_method(http::Method::PUT)
///     .service_name("S3")
///     .has_payload_members(true)
///     .build();
/// let input = DynamicStruct::new(&FIELDS)
///     .with("Bucket", "photos")
///     .with("LocationConstraint", "eu-west-1");
///
/// let request = factory.create_protocol_marshaller(&binding).marshall(&input).unwrap();
/// assert_eq!(request.resource_path(), "/photos");
/// assert_eq!(
///     request.content().unwrap().as_ref(),
///     b"<LocationConstraint>eu-west-1</LocationConstraint>"
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct XmlProtocolFactory {
    config: ProtocolConfig,
}

impl XmlProtocolFactory {
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
    ) -> XmlProtocolMarshaller<'a> {
        XmlProtocolMarshaller::new(binding, &self.config)
    }

    /// A handler turning responses of `binding` into `T`.
    #[must_use]
    pub fn create_response_handler<'a, T: StructuredValue + Default>(
        &self,
        binding: &'a OperationBinding,
    ) -> XmlResponseHandler<'a, T> {
        XmlResponseHandler::new(binding)
    }
}
