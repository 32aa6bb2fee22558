//! HTTP-binding marshallers shared by every wire format.
//!
//! Fields bound to headers, query parameters, path segments and the status
//! code are encoded identically whatever the body format is. The JSON and XML
//! codecs register thin wrappers around these functions in their registries.
//!
//! Null handling: absent header and query values emit nothing, absent path
//! parameters are an error.

use std::collections::BTreeMap;

use http::{HeaderMap, StatusCode};

use crate::convert::{text_to_value, value_to_text};
use crate::descriptor::{FieldDescriptor, Location, ValueKind};
use crate::error::{ProtocolError, ProtocolResult};
use crate::request::SdkHttpRequest;
use crate::uri::{replace_greedy_path_param, replace_path_param};
use crate::value::Value;

/// Write a scalar header.
pub fn marshall_header(
    request: &mut SdkHttpRequest,
    value: &Value,
    name: &str,
    field: &FieldDescriptor,
) -> ProtocolResult<()> {
    let text = value_to_text(value, field.timestamp_format, Location::Header)?;
    request.add_header(name, &text)
}

/// Write a list as one header whose members are joined with `,`.
///
/// An empty list writes no header.
pub fn marshall_header_list(
    request: &mut SdkHttpRequest,
    value: &Value,
    name: &str,
    field: &FieldDescriptor,
) -> ProtocolResult<()> {
    let member = field.list_trait()?.member;
    let Value::List(items) = value else {
        return Err(mismatch(ValueKind::List, value));
    };
    if items.is_empty() {
        return Ok(());
    }
    let texts = items
        .iter()
        .filter(|item| !item.is_null())
        .map(|item| value_to_text(item, member.timestamp_format, Location::Header))
        .collect::<ProtocolResult<Vec<_>>>()?;
    request.add_header(name, &texts.join(","))
}

/// Write a map as one header per entry.
///
/// `name` is the header prefix; a key that already starts with it is used
/// verbatim, otherwise the prefix is prepended.
pub fn marshall_header_map(
    request: &mut SdkHttpRequest,
    value: &Value,
    name: &str,
    field: &FieldDescriptor,
) -> ProtocolResult<()> {
    let value_field = field.map_trait()?.value;
    let Value::Map(entries) = value else {
        return Err(mismatch(ValueKind::Map, value));
    };
    for (key, entry) in entries {
        if entry.is_null() {
            continue;
        }
        let header_name = if key.starts_with(name) {
            key.clone()
        } else {
            format!("{name}{key}")
        };
        let text = value_to_text(entry, value_field.timestamp_format, Location::Header)?;
        request.add_header(&header_name, &text)?;
    }
    Ok(())
}

/// Write a scalar query parameter.
pub fn marshall_query_param(
    request: &mut SdkHttpRequest,
    value: &Value,
    name: &str,
    field: &FieldDescriptor,
) -> ProtocolResult<()> {
    let text = value_to_text(value, field.timestamp_format, Location::QueryParam)?;
    request.add_parameter(name, text);
    Ok(())
}

/// Write a list as a repeated query parameter, one occurrence per member.
pub fn marshall_query_list(
    request: &mut SdkHttpRequest,
    value: &Value,
    name: &str,
    field: &FieldDescriptor,
) -> ProtocolResult<()> {
    let member = field.list_trait()?.member;
    let Value::List(items) = value else {
        return Err(mismatch(ValueKind::List, value));
    };
    for item in items.iter().filter(|item| !item.is_null()) {
        let text = value_to_text(item, member.timestamp_format, Location::QueryParam)?;
        request.add_parameter(name, text);
    }
    Ok(())
}

/// Write a map as one query parameter per entry, named by the entry key.
///
/// List-valued entries repeat their key once per member.
pub fn marshall_query_map(
    request: &mut SdkHttpRequest,
    value: &Value,
    _name: &str,
    field: &FieldDescriptor,
) -> ProtocolResult<()> {
    let value_field = field.map_trait()?.value;
    let Value::Map(entries) = value else {
        return Err(mismatch(ValueKind::Map, value));
    };
    for (key, entry) in entries {
        match entry {
            Value::Null => {}
            Value::List(items) => {
                let member_format = value_field
                    .list
                    .map_or(value_field.timestamp_format, |l| l.member.timestamp_format);
                for item in items.iter().filter(|item| !item.is_null()) {
                    let text = value_to_text(item, member_format, Location::QueryParam)?;
                    request.add_parameter(key.clone(), text);
                }
            }
            scalar => {
                let text =
                    value_to_text(scalar, value_field.timestamp_format, Location::QueryParam)?;
                request.add_parameter(key.clone(), text);
            }
        }
    }
    Ok(())
}

/// Substitute a `{name}` path placeholder.
pub fn marshall_path_param(
    request: &mut SdkHttpRequest,
    value: &Value,
    name: &str,
    field: &FieldDescriptor,
) -> ProtocolResult<()> {
    let text = value_to_text(value, field.timestamp_format, Location::PathParam)?;
    let path = replace_path_param(request.resource_path(), name, &text)?;
    request.set_resource_path(path);
    Ok(())
}

/// Substitute a `{name+}` path placeholder.
pub fn marshall_greedy_path_param(
    request: &mut SdkHttpRequest,
    value: &Value,
    name: &str,
    field: &FieldDescriptor,
) -> ProtocolResult<()> {
    let text = value_to_text(value, field.timestamp_format, Location::GreedyPathParam)?;
    let path = replace_greedy_path_param(request.resource_path(), name, &text)?;
    request.set_resource_path(path);
    Ok(())
}

/// Reject an absent path parameter.
pub fn marshall_null_path_param(
    _request: &mut SdkHttpRequest,
    _value: &Value,
    name: &str,
    _field: &FieldDescriptor,
) -> ProtocolResult<()> {
    Err(ProtocolError::InvalidPathParameter(format!(
        "path parameter '{name}' must not be null"
    )))
}

/// Absent header and query values emit nothing.
pub fn marshall_null(
    _request: &mut SdkHttpRequest,
    _value: &Value,
    _name: &str,
    _field: &FieldDescriptor,
) -> ProtocolResult<()> {
    Ok(())
}

/// Read a scalar header, or [`Value::Null`] when absent.
pub fn unmarshall_header(headers: &HeaderMap, field: &FieldDescriptor) -> ProtocolResult<Value> {
    match header_text(headers, field.wire_name)? {
        Some(text) => text_to_value(text, field.kind, field.timestamp_format, Location::Header),
        None => Ok(Value::Null),
    }
}

/// Read a comma-separated header into a list, or [`Value::Null`] when absent.
///
/// RFC 822 dates contain a comma themselves, so instant lists split on every
/// second comma.
pub fn unmarshall_header_list(
    headers: &HeaderMap,
    field: &FieldDescriptor,
) -> ProtocolResult<Value> {
    let member = field.list_trait()?.member;
    let Some(text) = header_text(headers, field.wire_name)? else {
        return Ok(Value::Null);
    };
    split_header_list(text, member)?
        .into_iter()
        .map(|part| text_to_value(&part, member.kind, member.timestamp_format, Location::Header))
        .collect::<ProtocolResult<Vec<_>>>()
        .map(Value::List)
}

/// Read every header starting with the field's wire name into a map keyed by
/// the rest of the header name, or [`Value::Null`] when none match.
pub fn unmarshall_header_map(
    headers: &HeaderMap,
    field: &FieldDescriptor,
) -> ProtocolResult<Value> {
    let value_field = field.map_trait()?.value;
    let prefix = field.wire_name.to_ascii_lowercase();
    let mut entries = BTreeMap::new();
    for (name, value) in headers {
        let Some(key) = name.as_str().strip_prefix(prefix.as_str()) else {
            continue;
        };
        let text = value.to_str().map_err(|_| {
            ProtocolError::InvalidHeader(format!("header {name} is not valid UTF-8"))
        })?;
        let parsed = text_to_value(
            text,
            value_field.kind,
            value_field.timestamp_format,
            Location::Header,
        )?;
        entries.insert(key.to_owned(), parsed);
    }
    Ok(if entries.is_empty() {
        Value::Null
    } else {
        Value::Map(entries)
    })
}

/// Read the response status code.
pub fn unmarshall_status_code(status: StatusCode) -> Value {
    Value::Integer(i32::from(status.as_u16()))
}

fn header_text<'a>(headers: &'a HeaderMap, name: &str) -> ProtocolResult<Option<&'a str>> {
    headers
        .get(name)
        .map(|v| {
            v.to_str().map_err(|_| {
                ProtocolError::InvalidHeader(format!("header {name} is not valid UTF-8"))
            })
        })
        .transpose()
}

fn split_header_list(text: &str, member: &FieldDescriptor) -> ProtocolResult<Vec<String>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    let parts: Vec<&str> = text.split(',').map(str::trim).collect();
    let rfc822_instants = member.kind == ValueKind::Instant
        && crate::convert::resolve_timestamp_format(member.timestamp_format, Location::Header)?
            == crate::descriptor::TimestampFormat::Rfc822;
    if rfc822_instants {
        Ok(parts.chunks(2).map(|pair| pair.join(", ")).collect())
    } else {
        Ok(parts.into_iter().map(str::to_owned).collect())
    }
}

fn mismatch(expected: ValueKind, actual: &Value) -> ProtocolError {
    ProtocolError::ValueMismatch {
        expected,
        actual: actual.kind(),
    }
}
