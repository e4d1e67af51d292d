//! Client-side mirror of the signed-in user and their subscriptions.
//!
//! The crate keeps a local cache in step with the mail-me service: a gateway
//! performs the HTTP calls, the sync service turns their outcomes into store
//! mutations, and failures reach callers as uniform `{ code, message }`
//! descriptors. Any call that reports an expired session signs the user out.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use client::config::ClientSettings;
//! use client::domain::{SessionPolicy, StoreHandle, SyncService};
//! use client::outbound::http::HttpSubscriptionGateway;
//! use ortho_config::OrthoConfig;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = ClientSettings::load_from_iter(std::env::args_os())?;
//! let gateway = HttpSubscriptionGateway::from_settings(&settings)?;
//! let sync = SyncService::new(
//!     Arc::new(gateway),
//!     StoreHandle::default(),
//!     SessionPolicy::from_settings(&settings),
//! );
//! sync.load_user().await?;
//! if sync.store().is_user_signed_in() {
//!     sync.load_subscriptions().await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod domain;
pub mod outbound;
pub mod telemetry;
