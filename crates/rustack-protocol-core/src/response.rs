//! The incoming wire response handed to unmarshallers.

use bytes::Bytes;
use http::{HeaderMap, StatusCode};

/// Header carrying the service request id, JSON services.
pub const AMZN_REQUEST_ID_HEADER: &str = "x-amzn-requestid";

/// Header carrying the service request id, XML services.
pub const AMZ_REQUEST_ID_HEADER: &str = "x-amz-request-id";

/// A received HTTP response: status, headers and the fully buffered body.
#[derive(Debug, Clone)]
pub struct SdkHttpResponse {
    status: StatusCode,
    headers: HeaderMap,
    content: Bytes,
}

impl SdkHttpResponse {
    /// A response with the given parts.
    #[must_use]
    pub fn new(status: StatusCode, headers: HeaderMap, content: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            content: content.into(),
        }
    }

    /// Status code.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
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

    /// Body.
    #[must_use]
    pub fn content(&self) -> &Bytes {
        &self.content
    }

    /// The service request id, when the response carries one.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.header(AMZN_REQUEST_ID_HEADER)
            .or_else(|| self.header(AMZ_REQUEST_ID_HEADER))
    }
}

impl From<http::Response<Bytes>> for SdkHttpResponse {
    fn from(response: http::Response<Bytes>) -> Self {
        let (parts, body) = response.into_parts();
        Self::new(parts.status, parts.headers, body)
    }
}
