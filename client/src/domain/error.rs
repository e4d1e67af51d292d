//! Uniform error descriptor returned by every sync action.
//!
//! Descriptors are transport agnostic: whatever failed (the network, an HTTP
//! status, a malformed body) the presentation layer receives the same
//! `{ code, message }` shape. Only [`normalize`](crate::domain::normalize)
//! builds them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Code carried by a descriptor: an HTTP status, or whatever the service put
/// in the `code` field of its error body.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DescriptorCode {
    /// Numeric code, including HTTP statuses.
    Numeric(i64),
    /// Textual application code.
    Text(String),
}

impl DescriptorCode {
    /// Numeric value, if this is a numeric code.
    #[must_use]
    pub const fn as_numeric(&self) -> Option<i64> {
        match self {
            Self::Numeric(value) => Some(*value),
            Self::Text(_) => None,
        }
    }

    /// Whether the code equals the given HTTP status.
    #[must_use]
    pub fn is_status(&self, status: u16) -> bool {
        self.as_numeric() == Some(i64::from(status))
    }
}

impl From<u16> for DescriptorCode {
    fn from(value: u16) -> Self {
        Self::Numeric(i64::from(value))
    }
}

impl fmt::Display for DescriptorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

/// Normalised failure surfaced to callers.
///
/// ## Invariants
/// - `code` is absent exactly when no HTTP response was obtained, or a
///   success response could not be decoded.
/// - `message` is never empty.
/// - `status` records the HTTP status the failure arrived with, even when a
///   structured body replaced `code` with an application code.
///
/// # Examples
/// ```
/// use client::domain::normalize;
/// use client::domain::ports::TransportFailure;
///
/// let descriptor = normalize(&TransportFailure::network_fault(""));
/// assert_eq!(descriptor.code(), None);
/// assert_eq!(descriptor.message(), "Server Error");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDescriptor {
    code: Option<DescriptorCode>,
    message: String,
    #[serde(skip)]
    status: Option<u16>,
}

impl ErrorDescriptor {
    pub(crate) const fn new(
        code: Option<DescriptorCode>,
        message: String,
        status: Option<u16>,
    ) -> Self {
        Self {
            code,
            message,
            status,
        }
    }

    /// HTTP status or application code, absent for local failures.
    #[must_use]
    pub const fn code(&self) -> Option<&DescriptorCode> {
        self.code.as_ref()
    }

    /// Human readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// HTTP status of the response that failed, if one arrived.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        self.status
    }

    /// `true` when no HTTP response was involved.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        self.status.is_none()
    }
}

impl fmt::Display for ErrorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(f, "[{code}] {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for ErrorDescriptor {}

#[cfg(test)]
mod tests {
    //! Serialisation and display coverage for descriptors.

    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case::numeric(json!(401), DescriptorCode::Numeric(401))]
    #[case::text(json!("session_invalid"), DescriptorCode::Text("session_invalid".to_owned()))]
    fn codes_decode_from_numbers_or_strings(
        #[case] value: serde_json::Value,
        #[case] expected: DescriptorCode,
    ) {
        let code: DescriptorCode = serde_json::from_value(value).expect("code decodes");
        assert_eq!(code, expected);
    }

    #[test]
    fn serialised_descriptor_omits_status() {
        let descriptor =
            ErrorDescriptor::new(Some(DescriptorCode::Numeric(6)), "missing".to_owned(), Some(404));
        let value = serde_json::to_value(&descriptor).expect("serialises");
        assert_eq!(value, json!({ "code": 6, "message": "missing" }));
    }

    #[test]
    fn local_descriptor_serialises_null_code() {
        let descriptor = ErrorDescriptor::new(None, "Server Error".to_owned(), None);
        let value = serde_json::to_value(&descriptor).expect("serialises");
        assert_eq!(value, json!({ "code": null, "message": "Server Error" }));
        assert!(descriptor.is_local());
    }

    #[test]
    fn display_prefixes_code_when_present() {
        let descriptor =
            ErrorDescriptor::new(Some(DescriptorCode::from(500_u16)), "boom".to_owned(), Some(500));
        assert_eq!(descriptor.to_string(), "[500] boom");
    }
}
