//! Driven port for the remote user and subscription resources.
//!
//! The gateway issues exactly one call per operation and reports raw
//! transport failures. It never classifies them; the sync service runs every
//! failure through [`normalize`](crate::domain::normalize) instead.

use async_trait::async_trait;

use crate::domain::{Member, Subscription, SubscriptionDraft, User};

use super::define_port_error;

define_port_error! {
    /// Raw failure of a single gateway call.
    pub enum TransportFailure {
        /// No HTTP response was obtained (connection, DNS, timeout).
        NetworkFault {
            /// Transport error text; may be empty.
            message: String,
        } => "network failure: {message}",
        /// The service answered with a non-success status.
        HttpFailure {
            /// HTTP status code.
            status: u16,
            /// Canonical reason phrase for `status`; may be empty.
            reason: String,
            /// Raw response body; may be empty.
            body: String,
        } => "service responded {status} {reason}",
        /// A success response whose body did not have the expected shape.
        DecodeFault {
            /// Decoder error text.
            message: String,
        } => "response could not be decoded: {message}",
    }
}

impl TransportFailure {
    /// HTTP status carried by the failure, if a response arrived.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::HttpFailure { status, .. } => Some(*status),
            Self::NetworkFault { .. } | Self::DecodeFault { .. } => None,
        }
    }
}

/// Remote resources mirrored by the cache.
///
/// Implementations perform one network call per method, with no retries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriptionGateway: Send + Sync {
    /// `GET /user`. `None` is the service's "no session" answer.
    async fn fetch_user(&self) -> Result<Option<User>, TransportFailure>;

    /// `GET /subscriptions`, unwrapped from its `{ subscriptions }` envelope.
    async fn fetch_subscriptions(&self) -> Result<Vec<Subscription>, TransportFailure>;

    /// `POST /subscriptions`.
    async fn create_subscription(
        &self,
        draft: &SubscriptionDraft,
    ) -> Result<Subscription, TransportFailure>;

    /// `PUT /subscriptions`.
    async fn update_subscription(
        &self,
        subscription: &Subscription,
    ) -> Result<Subscription, TransportFailure>;

    /// `DELETE /subscriptions/{id}`. The response body is ignored.
    async fn delete_subscription(&self, id: &str) -> Result<(), TransportFailure>;

    /// `DELETE /user`. The response body is ignored.
    async fn delete_account(&self) -> Result<(), TransportFailure>;

    /// `GET /twitter-users?q=`, used to pick subscription members.
    async fn search_members(&self, query: &str) -> Result<Vec<Member>, TransportFailure>;
}

#[cfg(test)]
mod tests {
    //! Regression coverage for transport failure helpers.

    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::network(TransportFailure::network_fault("reset"), None)]
    #[case::decode(TransportFailure::decode_fault("eof"), None)]
    #[case::http(TransportFailure::http_failure(404_u16, "Not Found", ""), Some(404))]
    fn status_is_only_reported_for_http_failures(
        #[case] failure: TransportFailure,
        #[case] expected: Option<u16>,
    ) {
        assert_eq!(failure.status(), expected);
    }

    #[test]
    fn http_failure_display_includes_status_line() {
        let failure = TransportFailure::http_failure(401_u16, "Unauthorized", "{}");
        assert_eq!(failure.to_string(), "service responded 401 Unauthorized");
    }
}
