//! The outgoing wire request.
//!
//! [`SdkHttpRequest`] accumulates what the marshallers produce: method,
//! resource path, headers, ordered query parameters and an optional body.
//! Transport code turns it into an [`http::Request`] with
//! [`SdkHttpRequest::into_http_request`].

use bytes::Bytes;
use http::header::{HeaderMap, HeaderName, HeaderValue};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::error::{ProtocolError, ProtocolResult};

/// Characters left unescaped in path segments and query components.
pub const URI_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Like [`URI_ENCODE_SET`] but keeps `/`, for greedy path segments.
pub const GREEDY_PATH_ENCODE_SET: &AsciiSet = &URI_ENCODE_SET.remove(b'/');

/// Percent-encode a URI component.
#[must_use]
pub fn uri_encode(text: &str) -> String {
    utf8_percent_encode(text, URI_ENCODE_SET).to_string()
}

/// An HTTP request produced by a protocol marshaller.
#[derive(Debug, Clone)]
pub struct SdkHttpRequest {
    method: http::Method,
    resource_path: String,
    headers: HeaderMap,
    parameters: Vec<(String, String)>,
    content: Option<Bytes>,
    service_name: String,
}

impl SdkHttpRequest {
    /// An empty request.
    #[must_use]
    pub fn new(method: http::Method, service_name: impl Into<String>) -> Self {
        Self {
            method,
            resource_path: "/".to_owned(),
            headers: HeaderMap::new(),
            parameters: Vec::new(),
            content: None,
            service_name: service_name.into(),
        }
    }

    /// HTTP method.
    #[must_use]
    pub fn method(&self) -> &http::Method {
        &self.method
    }

    /// Service name.
    #[must_use]
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Resource path, with placeholders substituted as far as marshalling has gone.
    #[must_use]
    pub fn resource_path(&self) -> &str {
        &self.resource_path
    }

    /// Replace the resource path.
    pub fn set_resource_path(&mut self, path: impl Into<String>) {
        self.resource_path = path.into();
    }

    /// Headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// First value of header `name`, if it is valid UTF-8.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Whether header `name` is present.
    #[must_use]
    pub fn has_header(&self, name: &str) -> bool {
        self.headers.contains_key(name)
    }

    /// Append a header value.
    pub fn add_header(&mut self, name: &str, value: &str) -> ProtocolResult<()> {
        let (name, value) = header_pair(name, value)?;
        self.headers.append(name, value);
        Ok(())
    }

    /// Set a header unless it is already present.
    pub fn set_header_if_absent(&mut self, name: &str, value: &str) -> ProtocolResult<()> {
        if !self.has_header(name) {
            let (name, value) = header_pair(name, value)?;
            self.headers.insert(name, value);
        }
        Ok(())
    }

    /// Query parameters in insertion order.
    #[must_use]
    pub fn parameters(&self) -> &[(String, String)] {
        &self.parameters
    }

    /// Every value of query parameter `name`.
    #[must_use]
    pub fn parameter_values(&self, name: &str) -> Vec<&str> {
        self.parameters
            .iter()
            .filter(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Append a query parameter.
    pub fn add_parameter(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.parameters.push((name.into(), value.into()));
    }

    /// Body, if one has been set.
    #[must_use]
    pub fn content(&self) -> Option<&Bytes> {
        self.content.as_ref()
    }

    /// Whether a body has been set.
    #[must_use]
    pub fn has_content(&self) -> bool {
        self.content.is_some()
    }

    /// Set the body.
    pub fn set_content(&mut self, content: impl Into<Bytes>) {
        self.content = Some(content.into());
    }

    /// The encoded query string without the leading `?`.
    ///
    /// Parameters with an empty value render as a bare name.
    #[must_use]
    pub fn query_string(&self) -> String {
        self.parameters
            .iter()
            .map(|(name, value)| {
                if value.is_empty() {
                    uri_encode(name)
                } else {
                    format!("{}={}", uri_encode(name), uri_encode(value))
                }
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Path and query, as sent on the request line.
    #[must_use]
    pub fn path_and_query(&self) -> String {
        if self.parameters.is_empty() {
            self.resource_path.clone()
        } else {
            format!("{}?{}", self.resource_path, self.query_string())
        }
    }

    /// Convert into an [`http::Request`].
    pub fn into_http_request(self) -> ProtocolResult<http::Request<Bytes>> {
        let uri = self.path_and_query();
        let mut request = http::Request::builder()
            .method(self.method)
            .uri(&uri)
            .body(self.content.unwrap_or_default())
            .map_err(|e| ProtocolError::InvalidPathParameter(format!("{uri}: {e}")))?;
        *request.headers_mut() = self.headers;
        Ok(request)
    }
}

fn header_pair(name: &str, value: &str) -> ProtocolResult<(HeaderName, HeaderValue)> {
    let header_name = HeaderName::from_bytes(name.as_bytes())
        .map_err(|_| ProtocolError::InvalidHeader(format!("invalid header name: {name:?}")))?;
    let header_value = HeaderValue::from_str(value)
        .map_err(|_| ProtocolError::InvalidHeader(format!("invalid value for header {name}")))?;
    Ok((header_name, header_value))
}
