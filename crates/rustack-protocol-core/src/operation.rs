//! Per-operation binding metadata.
//!
//! An [`OperationBinding`] describes one service operation the way the code
//! generator sees it: its URI template, HTTP method, and which kinds of
//! members its input carries. Bindings are immutable and typically live in
//! statics next to the generated shapes.

use typed_builder::TypedBuilder;

/// Static metadata of one operation.
///
/// # Examples
///
/// ```
/// use rustack_protocol_core::operation::OperationBinding;
///
/// let binding = OperationBinding::builder()
///     .request_uri("/{Bucket}?tagging")
///     .http_method(http::Method::PUT)
///     .service_name("S3")
///     .has_payload_members(true)
///     .build();
/// assert_eq!(binding.request_uri, "/{Bucket}?tagging");
/// assert!(binding.operation_identifier.is_none());
/// ```
#[derive(Debug, Clone, TypedBuilder)]
pub struct OperationBinding {
    /// URI template, e.g. `/{Bucket}/{Key+}?uploads`.
    #[builder(setter(into))]
    pub request_uri: String,

    /// HTTP method.
    pub http_method: http::Method,

    /// Whether one input member is the whole body.
    #[builder(default)]
    pub has_explicit_payload_member: bool,

    /// Whether any input member is bound to the body.
    #[builder(default)]
    pub has_payload_members: bool,

    /// Whether the input body is a caller-provided stream.
    #[builder(default)]
    pub has_streaming_input: bool,

    /// Whether the output body is a stream handed to the caller unparsed.
    #[builder(default)]
    pub has_streaming_output: bool,

    /// Value of the `X-Amz-Target` header for JSON operations.
    #[builder(default, setter(strip_option, into))]
    pub operation_identifier: Option<String>,

    /// Service name recorded on the request.
    #[builder(setter(into))]
    pub service_name: String,

    /// Namespace URI declared on the root element of XML bodies.
    #[builder(default, setter(strip_option, into))]
    pub xml_namespace_uri: Option<String>,
}

impl OperationBinding {
    /// The request URI split into its path and static query parameters.
    ///
    /// `/{Bucket}?tagging&list-type=2` yields `/{Bucket}` and
    /// `[("tagging", ""), ("list-type", "2")]`.
    #[must_use]
    pub fn split_request_uri(&self) -> (&str, Vec<(String, String)>) {
        let Some((path, query)) = self.request_uri.split_once('?') else {
            return (&self.request_uri, Vec::new());
        };
        let params = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| match pair.split_once('=') {
                Some((name, value)) => (name.to_owned(), value.to_owned()),
                None => (pair.to_owned(), String::new()),
            })
            .collect();
        (path, params)
    }
}
