//! Protocol codec configuration.
//!
//! [`ProtocolConfig`] carries the content types and output switches the codecs
//! apply while finishing a request. It is built programmatically; the codecs
//! read no environment variables.

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Settings shared by the JSON and XML protocol factories.
///
/// # Examples
///
/// ```
/// use rustack_protocol_core::config::ProtocolConfig;
///
/// let config = ProtocolConfig::builder()
///     .json_content_type("application/x-amz-json-1.0")
///     .build();
/// assert_eq!(config.json_content_type, "application/x-amz-json-1.0");
/// assert_eq!(config.xml_content_type, "application/xml");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase", default)]
pub struct ProtocolConfig {
    /// Content type for JSON bodies.
    #[builder(default = String::from("application/x-amz-json-1.1"), setter(into))]
    pub json_content_type: String,

    /// Content type for generated XML bodies.
    #[builder(default = String::from("application/xml"), setter(into))]
    pub xml_content_type: String,

    /// Content type for binary payloads when the caller has set none.
    #[builder(default = String::from("binary/octet-stream"), setter(into))]
    pub binary_content_type: String,

    /// Whether generated XML starts with an `<?xml ...?>` declaration.
    #[builder(default = true)]
    pub xml_declaration: bool,

    /// Whether explicit string payloads get a `Content-MD5` header when absent.
    #[builder(default = true)]
    pub compute_content_md5: bool,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
