//! Conversion of raw transport failures into [`ErrorDescriptor`]s.
//!
//! The conversion is total: every [`TransportFailure`] maps to a descriptor.
//!
//! 1. An HTTP failure whose body is a JSON object carrying `code` and/or
//!    `message` keeps those values; a missing half falls back to the status.
//! 2. Any other HTTP failure uses the status as the code and the status line
//!    as the message.
//! 3. Local failures have no code and use their own message, or
//!    [`DEFAULT_ERROR_MESSAGE`] when it is blank.

use serde::Deserialize;
use serde_json::Value;

use super::error::{DescriptorCode, ErrorDescriptor};
use super::ports::TransportFailure;

/// Message used when a failure carries no usable text.
pub const DEFAULT_ERROR_MESSAGE: &str = "Server Error";

/// Error body shape emitted by the service.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<Value>,
    #[serde(default)]
    message: Option<Value>,
}

/// Normalise a transport failure.
///
/// # Examples
/// ```
/// use client::domain::normalize;
/// use client::domain::ports::TransportFailure;
/// use client::domain::DescriptorCode;
///
/// let failure = TransportFailure::http_failure(503_u16, "Service Unavailable", "");
/// let descriptor = normalize(&failure);
/// assert_eq!(descriptor.code(), Some(&DescriptorCode::Numeric(503)));
/// assert_eq!(descriptor.message(), "503 Service Unavailable");
/// ```
#[must_use]
pub fn normalize(failure: &TransportFailure) -> ErrorDescriptor {
    match failure {
        TransportFailure::NetworkFault { message } | TransportFailure::DecodeFault { message } => {
            ErrorDescriptor::new(None, non_blank(message), None)
        }
        TransportFailure::HttpFailure {
            status,
            reason,
            body,
        } => {
            let line = status_line(*status, reason);
            match structured_body(body) {
                Some(parsed) => ErrorDescriptor::new(
                    Some(
                        parsed
                            .code
                            .as_ref()
                            .and_then(code_from_value)
                            .unwrap_or_else(|| DescriptorCode::from(*status)),
                    ),
                    parsed
                        .message
                        .as_ref()
                        .and_then(Value::as_str)
                        .filter(|message| !message.trim().is_empty())
                        .map_or(line, str::to_owned),
                    Some(*status),
                ),
                None => ErrorDescriptor::new(
                    Some(DescriptorCode::from(*status)),
                    line,
                    Some(*status),
                ),
            }
        }
    }
}

impl From<&TransportFailure> for ErrorDescriptor {
    fn from(value: &TransportFailure) -> Self {
        normalize(value)
    }
}

impl From<TransportFailure> for ErrorDescriptor {
    fn from(value: TransportFailure) -> Self {
        normalize(&value)
    }
}

fn non_blank(message: &str) -> String {
    if message.trim().is_empty() {
        DEFAULT_ERROR_MESSAGE.to_owned()
    } else {
        message.to_owned()
    }
}

fn status_line(status: u16, reason: &str) -> String {
    let trimmed = reason.trim();
    if trimmed.is_empty() {
        status.to_string()
    } else {
        format!("{status} {trimmed}")
    }
}

/// Parse `body` as a service error body. Objects without either key, and
/// anything that is not a JSON object, count as unstructured.
fn structured_body(body: &str) -> Option<ErrorBody> {
    let value: Value = serde_json::from_str(body).ok()?;
    if !value.is_object() {
        return None;
    }
    let parsed: ErrorBody = serde_json::from_value(value).ok()?;
    let has_code = parsed.code.as_ref().is_some_and(|code| !code.is_null());
    let has_message = parsed.message.as_ref().is_some_and(Value::is_string);
    (has_code || has_message).then_some(parsed)
}

fn code_from_value(value: &Value) -> Option<DescriptorCode> {
    match value {
        Value::Number(number) => number.as_i64().map(DescriptorCode::Numeric),
        Value::String(text) if !text.trim().is_empty() => Some(DescriptorCode::Text(text.clone())),
        _ => None,
    }
}
