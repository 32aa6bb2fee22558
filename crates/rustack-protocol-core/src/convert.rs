//! Scalar value converters.
//!
//! Converts scalar [`Value`]s to and from their wire text. The same rules
//! serve headers, query parameters, path segments and XML element text; the
//! JSON codec reuses them for the kinds JSON carries as strings.
//!
//! Timestamps use the field's explicit format when it has one. Otherwise
//! headers default to RFC 822 and payloads to ISO 8601; any other location
//! without an explicit format is an error.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, NaiveDateTime, Utc};

use crate::descriptor::{Location, TimestampFormat, ValueKind};
use crate::error::{ProtocolError, ProtocolResult};
use crate::value::{BigDecimal, Value};

/// ISO 8601 with millisecond precision, as written on the wire.
pub const ISO_8601_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// RFC 822 / HTTP-date, as written on the wire.
pub const RFC_822_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Pick the timestamp format for a field bound to `location`.
pub fn resolve_timestamp_format(
    explicit: Option<TimestampFormat>,
    location: Location,
) -> ProtocolResult<TimestampFormat> {
    match (explicit, location) {
        (Some(format), _) => Ok(format),
        (None, Location::Header) => Ok(TimestampFormat::Rfc822),
        (None, Location::Payload) => Ok(TimestampFormat::Iso8601),
        (None, other) => Err(ProtocolError::UnsupportedTimestampLocation(other)),
    }
}

/// Render an instant in `format`.
#[must_use]
pub fn format_timestamp(dt: &DateTime<Utc>, format: TimestampFormat) -> String {
    match format {
        TimestampFormat::Iso8601 => dt.format(ISO_8601_FORMAT).to_string(),
        TimestampFormat::Rfc822 => dt.format(RFC_822_FORMAT).to_string(),
        TimestampFormat::UnixTimestamp => format_epoch_seconds(dt),
    }
}

/// Parse an instant written in `format`.
pub fn parse_timestamp(text: &str, format: TimestampFormat) -> ProtocolResult<DateTime<Utc>> {
    let text = text.trim();
    let parsed = match format {
        TimestampFormat::Iso8601 => DateTime::parse_from_rfc3339(text)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
                    .ok()
                    .map(|naive| naive.and_utc())
            }),
        TimestampFormat::Rfc822 => DateTime::parse_from_rfc2822(text)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(text, RFC_822_FORMAT)
                    .ok()
                    .map(|naive| naive.and_utc())
            }),
        TimestampFormat::UnixTimestamp => parse_epoch_seconds(text),
    };
    parsed.ok_or_else(|| ProtocolError::ParseError(format!("invalid {format} timestamp: {text:?}")))
}

/// Seconds since the epoch with a millisecond fraction when one is present.
fn format_epoch_seconds(dt: &DateTime<Utc>) -> String {
    let millis = dt.timestamp_millis();
    let sign = if millis < 0 { "-" } else { "" };
    let abs = millis.unsigned_abs();
    let (secs, frac) = (abs / 1000, abs % 1000);
    if frac == 0 {
        format!("{sign}{secs}")
    } else {
        format!("{sign}{secs}.{frac:03}")
    }
}

fn parse_epoch_seconds(text: &str) -> Option<DateTime<Utc>> {
    if text.contains(['e', 'E']) {
        let secs: f64 = text.parse().ok()?;
        #[allow(clippy::cast_possible_truncation)]
        return DateTime::from_timestamp_millis((secs * 1000.0).round() as i64);
    }
    let (negative, unsigned) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let (whole, frac) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    if whole.is_empty() || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let secs: i64 = whole.parse().ok()?;
    let millis_text: String = frac.chars().chain("000".chars()).take(3).collect();
    let millis: i64 = millis_text.parse().ok()?;
    let total = secs.checked_mul(1000)?.checked_add(millis)?;
    DateTime::from_timestamp_millis(if negative { -total } else { total })
}

/// Render a double, spelling out non-finite values.
#[must_use]
pub fn format_double(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_owned()
    } else if v.is_infinite() {
        let spelled = if v.is_sign_positive() { "Infinity" } else { "-Infinity" };
        spelled.to_owned()
    } else {
        v.to_string()
    }
}

/// Render a float, spelling out non-finite values.
#[must_use]
pub fn format_float(v: f32) -> String {
    if v.is_finite() {
        v.to_string()
    } else {
        format_double(f64::from(v))
    }
}

/// Parse a double, accepting the non-finite spellings.
pub fn parse_double(text: &str) -> ProtocolResult<f64> {
    match text.trim() {
        "NaN" => Ok(f64::NAN),
        "Infinity" => Ok(f64::INFINITY),
        "-Infinity" => Ok(f64::NEG_INFINITY),
        other => other
            .parse()
            .map_err(|_| ProtocolError::ParseError(format!("invalid double: {other:?}"))),
    }
}

/// Parse a float, accepting the non-finite spellings.
pub fn parse_float(text: &str) -> ProtocolResult<f32> {
    match text.trim() {
        "NaN" => Ok(f32::NAN),
        "Infinity" => Ok(f32::INFINITY),
        "-Infinity" => Ok(f32::NEG_INFINITY),
        other => other
            .parse()
            .map_err(|_| ProtocolError::ParseError(format!("invalid float: {other:?}"))),
    }
}

/// Render a scalar value as wire text.
///
/// `timestamp_format` is the field's explicit format; `location` picks the
/// default when there is none.
pub fn value_to_text(
    value: &Value,
    timestamp_format: Option<TimestampFormat>,
    location: Location,
) -> ProtocolResult<String> {
    Ok(match value {
        Value::String(s) => s.clone(),
        Value::Integer(v) => v.to_string(),
        Value::Long(v) => v.to_string(),
        Value::Float(v) => format_float(*v),
        Value::Double(v) => format_double(*v),
        Value::BigDecimal(v) => v.to_string(),
        Value::Boolean(v) => v.to_string(),
        Value::Instant(dt) => {
            format_timestamp(dt, resolve_timestamp_format(timestamp_format, location)?)
        }
        Value::Bytes(b) => BASE64.encode(b),
        other => {
            return Err(ProtocolError::ParseError(format!(
                "{} values have no text form",
                other.kind()
            )));
        }
    })
}

/// Parse wire text into a scalar value of `kind`.
pub fn text_to_value(
    text: &str,
    kind: ValueKind,
    timestamp_format: Option<TimestampFormat>,
    location: Location,
) -> ProtocolResult<Value> {
    let invalid = |what: &str| ProtocolError::ParseError(format!("invalid {what}: {text:?}"));
    Ok(match kind {
        ValueKind::String => Value::String(text.to_owned()),
        ValueKind::Integer => Value::Integer(text.trim().parse().map_err(|_| invalid("integer"))?),
        ValueKind::Long => Value::Long(text.trim().parse().map_err(|_| invalid("long"))?),
        ValueKind::Float => Value::Float(parse_float(text)?),
        ValueKind::Double => Value::Double(parse_double(text)?),
        ValueKind::BigDecimal => Value::BigDecimal(text.trim().parse::<BigDecimal>()?),
        ValueKind::Boolean => match text.trim() {
            "true" => Value::Boolean(true),
            "false" => Value::Boolean(false),
            _ => return Err(invalid("boolean")),
        },
        ValueKind::Instant => Value::Instant(parse_timestamp(
            text,
            resolve_timestamp_format(timestamp_format, location)?,
        )?),
        ValueKind::Bytes => Value::Bytes(
            BASE64
                .decode(text.trim())
                .map_err(|_| invalid("base64"))?
                .into(),
        ),
        other => {
            return Err(ProtocolError::ParseError(format!(
                "{other} values have no text form"
            )));
        }
    })
}
