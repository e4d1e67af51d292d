//! Classification of normalised failures into session outcomes.

use super::error::{DescriptorCode, ErrorDescriptor};

/// HTTP status signalling an expired or missing session.
pub const UNAUTHENTICATED_STATUS: u16 = 401;
/// HTTP status the service uses when the session user no longer exists.
pub const NOT_FOUND_STATUS: u16 = 404;
/// HTTP status for unexpected service failures.
pub const SERVER_ERROR_STATUS: u16 = 500;

/// Rules deciding when a failure means "the session is gone" and when a
/// failed user load means "nobody is signed in".
///
/// # Examples
/// ```
/// use client::domain::SessionPolicy;
///
/// let policy = SessionPolicy::default();
/// assert!(policy.soft_fail_statuses().contains(&500));
/// assert!(!SessionPolicy::new(false, None).soft_fail_statuses().contains(&500));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionPolicy {
    soft_fail_statuses: Vec<u16>,
    session_invalid_code: Option<String>,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self::new(true, None)
    }
}

impl SessionPolicy {
    /// Build a policy.
    ///
    /// `soft_fail_on_server_error` keeps HTTP 500 in the set of user-load
    /// failures treated as "signed out". `session_invalid_code` names an
    /// application code that counts as an expired session in addition to
    /// HTTP 401.
    #[must_use]
    pub fn new(soft_fail_on_server_error: bool, session_invalid_code: Option<String>) -> Self {
        let mut soft_fail_statuses = vec![UNAUTHENTICATED_STATUS, NOT_FOUND_STATUS];
        if soft_fail_on_server_error {
            soft_fail_statuses.push(SERVER_ERROR_STATUS);
        }
        Self {
            soft_fail_statuses,
            session_invalid_code: session_invalid_code
                .map(|code| code.trim().to_owned())
                .filter(|code| !code.is_empty()),
        }
    }

    /// Statuses a failed user load converts into a signed-out record.
    #[must_use]
    pub fn soft_fail_statuses(&self) -> &[u16] {
        &self.soft_fail_statuses
    }

    /// Whether `error` reports an expired or unauthenticated session.
    #[must_use]
    pub fn is_session_expired(&self, error: &ErrorDescriptor) -> bool {
        if error.status() == Some(UNAUTHENTICATED_STATUS) {
            return true;
        }
        match error.code() {
            Some(code) if code.is_status(UNAUTHENTICATED_STATUS) => true,
            Some(DescriptorCode::Text(text)) => {
                self.session_invalid_code.as_deref() == Some(text.as_str())
            }
            Some(DescriptorCode::Numeric(value)) => self
                .session_invalid_code
                .as_deref()
                .is_some_and(|expected| expected == value.to_string()),
            None => false,
        }
    }

    /// Whether a failed user load means "no user could be resolved".
    #[must_use]
    pub fn is_user_unresolvable(&self, error: &ErrorDescriptor) -> bool {
        let listed = |status: u16| self.soft_fail_statuses.contains(&status);
        error.status().is_some_and(listed)
            || error
                .code()
                .and_then(DescriptorCode::as_numeric)
                .and_then(|value| u16::try_from(value).ok())
                .is_some_and(listed)
    }
}
