//! Tracing subscriber installation.
//!
//! The library only emits `tracing` events. Embedding applications call
//! [`init_tracing`] once at startup, or install their own subscriber.

use thiserror::Error;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::ClientSettings;

/// Errors raised while installing the tracing subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// A global subscriber is already installed.
    #[error("tracing already initialised: {message}")]
    AlreadyInitialised {
        /// Underlying error text.
        message: String,
    },
}

/// Install a `fmt` subscriber filtered by `RUST_LOG`.
///
/// Output is JSON when [`ClientSettings::log_json`] is set.
///
/// # Errors
///
/// Returns [`TelemetryError::AlreadyInitialised`] when a global subscriber
/// has already been set.
pub fn init_tracing(settings: &ClientSettings) -> Result<(), TelemetryError> {
    let builder = fmt().with_env_filter(EnvFilter::from_default_env());
    let installed = if settings.log_json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|error| TelemetryError::AlreadyInitialised {
        message: error.to_string(),
    })
}
