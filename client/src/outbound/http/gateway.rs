//! Reqwest-backed subscription gateway.
//!
//! This adapter owns transport details only: URL construction, the cookie
//! session, HTTP status mapping and JSON decoding. Failures are reported raw;
//! classification happens in the domain.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;
use url::Url;

use super::dto::{MembersEnvelope, SubscriptionsEnvelope};
use crate::config::{ClientSettings, ConfigError};
use crate::domain::ports::{SubscriptionGateway, TransportFailure};
use crate::domain::{Member, Subscription, SubscriptionDraft, User};

const API_PREFIX: &str = "api";

/// Errors raised while building the HTTP gateway.
#[derive(Debug, Error)]
pub enum GatewayBuildError {
    /// The configured settings were invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The reqwest client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Subscription gateway that talks JSON over HTTP to one service origin.
///
/// The client keeps a cookie jar so the session cookie issued at sign-in is
/// replayed on every call. No timeout and no retries are configured.
#[derive(Debug, Clone)]
pub struct HttpSubscriptionGateway {
    client: Client,
    base: Url,
}

impl HttpSubscriptionGateway {
    /// Build a gateway rooted at `base`.
    /// ```rust,ignore
    /// let gateway = HttpSubscriptionGateway::new(base, "mailme-client/0.1");
    /// assert!(gateway.is_ok() || gateway.is_err());
    /// ```
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base: Url, user_agent: &str) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .cookie_store(true)
            .user_agent(user_agent)
            .default_headers(headers)
            .build()?;
        Ok(Self { client, base })
    }

    /// Build a gateway from loaded settings.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayBuildError::Config`] for an invalid base URL and
    /// [`GatewayBuildError::Client`] when the reqwest client cannot be built.
    pub fn from_settings(settings: &ClientSettings) -> Result<Self, GatewayBuildError> {
        Ok(Self::new(settings.base_url()?, settings.user_agent())?)
    }

    /// Service origin every endpoint is resolved under.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base
    }

    fn request(
        &self,
        method: Method,
        segments: &[&str],
    ) -> Result<RequestBuilder, TransportFailure> {
        let url = endpoint(&self.base, segments)?;
        debug!(%method, %url, "sending request");
        Ok(self.client.request(method, url))
    }
}

#[async_trait]
impl SubscriptionGateway for HttpSubscriptionGateway {
    async fn fetch_user(&self) -> Result<Option<User>, TransportFailure> {
        let response = send(self.request(Method::GET, &["user"])?).await?;
        decode(response).await
    }

    async fn fetch_subscriptions(&self) -> Result<Vec<Subscription>, TransportFailure> {
        let response = send(self.request(Method::GET, &["subscriptions"])?).await?;
        let envelope: SubscriptionsEnvelope = decode(response).await?;
        Ok(envelope.subscriptions)
    }

    async fn create_subscription(
        &self,
        draft: &SubscriptionDraft,
    ) -> Result<Subscription, TransportFailure> {
        let request = self.request(Method::POST, &["subscriptions"])?.json(draft);
        decode(send(request).await?).await
    }

    async fn update_subscription(
        &self,
        subscription: &Subscription,
    ) -> Result<Subscription, TransportFailure> {
        let request = self
            .request(Method::PUT, &["subscriptions"])?
            .json(subscription);
        decode(send(request).await?).await
    }

    async fn delete_subscription(&self, id: &str) -> Result<(), TransportFailure> {
        send(self.request(Method::DELETE, &["subscriptions", id])?).await?;
        Ok(())
    }

    async fn delete_account(&self) -> Result<(), TransportFailure> {
        send(self.request(Method::DELETE, &["user"])?).await?;
        Ok(())
    }

    async fn search_members(&self, query: &str) -> Result<Vec<Member>, TransportFailure> {
        let request = self
            .request(Method::GET, &["twitter-users"])?
            .query(&[("q", query)]);
        let envelope: MembersEnvelope = decode(send(request).await?).await?;
        Ok(envelope.users)
    }
}

fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, TransportFailure> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| {
            TransportFailure::network_fault(format!("base URL `{base}` cannot carry a path"))
        })?
        .pop_if_empty()
        .push(API_PREFIX)
        .extend(segments);
    Ok(url)
}

async fn send(request: RequestBuilder) -> Result<Response, TransportFailure> {
    let response = request.send().await.map_err(map_transport_error)?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    // A body that cannot be read is reported as empty; the status still
    // identifies the failure.
    let body = response.text().await.unwrap_or_default();
    debug!(status = status.as_u16(), "service returned an error status");
    Err(map_status_error(status, body))
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, TransportFailure> {
    let body = response.bytes().await.map_err(map_transport_error)?;
    parse_body(body.as_ref())
}

fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, TransportFailure> {
    serde_json::from_slice(body)
        .map_err(|error| TransportFailure::decode_fault(format!("invalid JSON payload: {error}")))
}

fn map_transport_error(error: reqwest::Error) -> TransportFailure {
    TransportFailure::network_fault(error.to_string())
}

fn map_status_error(status: StatusCode, body: String) -> TransportFailure {
    TransportFailure::http_failure(
        status.as_u16(),
        status.canonical_reason().unwrap_or_default(),
        body,
    )
}
