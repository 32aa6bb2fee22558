//! URI template handling.
//!
//! Request URIs come from the operation binding as templates such as
//! `/{Bucket}/{Key+}?uploads`. The path part seeds the request's resource
//! path, the query part becomes static query parameters, and path
//! marshallers later substitute each `{Name}` / `{Name+}` placeholder.

use percent_encoding::utf8_percent_encode;

use crate::error::{ProtocolError, ProtocolResult};
use crate::operation::OperationBinding;
use crate::request::{GREEDY_PATH_ENCODE_SET, SdkHttpRequest, uri_encode};

/// Start a request for `binding`: method, service name, templated path, and
/// the static query parameters of the URI template.
#[must_use]
pub fn create_request(binding: &OperationBinding) -> SdkHttpRequest {
    let mut request = SdkHttpRequest::new(binding.http_method.clone(), &binding.service_name);
    let (path, static_params) = binding.split_request_uri();
    request.set_resource_path(if path.is_empty() { "/" } else { path });
    for (name, value) in static_params {
        request.add_parameter(name, value);
    }
    request
}

/// Substitute `{name}` in `path` with the percent-encoded `value`.
///
/// Slashes in the value are encoded. An empty value is rejected.
pub fn replace_path_param(path: &str, name: &str, value: &str) -> ProtocolResult<String> {
    if value.is_empty() {
        return Err(ProtocolError::InvalidPathParameter(format!(
            "path parameter '{name}' must not be empty"
        )));
    }
    Ok(replace_placeholder(path, &format!("{{{name}}}"), &uri_encode(value)))
}

/// Substitute `{name+}` in `path` with the percent-encoded `value`, keeping
/// its slashes.
///
/// A single leading slash is dropped since the template already supplies one.
pub fn replace_greedy_path_param(path: &str, name: &str, value: &str) -> ProtocolResult<String> {
    let value = value.strip_prefix('/').unwrap_or(value);
    if value.is_empty() {
        return Err(ProtocolError::InvalidPathParameter(format!(
            "greedy path parameter '{name}' must not be empty"
        )));
    }
    let encoded = utf8_percent_encode(value, GREEDY_PATH_ENCODE_SET).to_string();
    Ok(replace_placeholder(path, &format!("{{{name}+}}"), &encoded))
}

fn replace_placeholder(path: &str, placeholder: &str, encoded: &str) -> String {
    if !path.contains(placeholder) {
        tracing::debug!(path, placeholder, "path template has no placeholder for parameter");
    }
    path.replace(placeholder, encoded)
}
