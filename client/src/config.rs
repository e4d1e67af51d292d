//! Client configuration loaded via OrthoConfig.
//!
//! Values come from CLI arguments, `MAILME_*` environment variables and
//! configuration files, in the precedence order OrthoConfig applies.
//! The boolean switches have no CLI flag and are read from the environment
//! and files only.

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::domain::SessionPolicy;

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080/";
const DEFAULT_USER_AGENT: &str = concat!("mailme-client/", env!("CARGO_PKG_VERSION"));

/// Errors raised while interpreting loaded settings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The base URL is malformed or cannot carry a path.
    #[error("invalid base URL `{value}`: {reason}")]
    InvalidBaseUrl {
        /// The configured value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Settings for talking to the subscription service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "MAILME")]
pub struct ClientSettings {
    /// Service origin; API paths are resolved under it.
    pub base_url: Option<String>,
    /// User agent sent with every request.
    pub user_agent: Option<String>,
    /// Treat HTTP 500 on user load as "signed out" rather than an error.
    #[ortho_config(skip_cli, default = true)]
    pub soft_fail_on_server_error: bool,
    /// Application error code that also means "session invalid".
    pub session_invalid_code: Option<String>,
    /// Emit logs as JSON lines.
    #[ortho_config(skip_cli, default = false)]
    pub log_json: bool,
}

impl ClientSettings {
    /// Parse the configured origin, falling back to the local service.
    ///
    /// The returned URL always ends with `/` so relative joins stay under it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] when the value does not parse,
    /// is not `http`/`https`, or cannot carry a path.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let raw = self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL).trim();
        let invalid = |reason: String| ConfigError::InvalidBaseUrl {
            value: raw.to_owned(),
            reason,
        };

        let mut url = Url::parse(raw).map_err(|error| invalid(error.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme `{}`", url.scheme())));
        }
        if url.cannot_be_a_base() {
            return Err(invalid("URL cannot carry a path".to_owned()));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        url.set_query(None);
        url.set_fragment(None);
        Ok(url)
    }

    /// Return the configured user agent, falling back to the crate default.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }
}

impl SessionPolicy {
    /// Derive the classification rules from loaded settings.
    #[must_use]
    pub fn from_settings(settings: &ClientSettings) -> Self {
        Self::new(
            settings.soft_fail_on_server_error,
            settings.session_invalid_code.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for client configuration parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 5] = [
        "MAILME_BASE_URL",
        "MAILME_USER_AGENT",
        "MAILME_SOFT_FAIL_ON_SERVER_ERROR",
        "MAILME_SESSION_INVALID_CODE",
        "MAILME_LOG_JSON",
    ];

    fn load_from_empty_args() -> ClientSettings {
        ClientSettings::load_from_iter([OsString::from("client")]).expect("config should load")
    }

    fn settings_with_base(base_url: &str) -> ClientSettings {
        ClientSettings {
            base_url: Some(base_url.to_owned()),
            user_agent: None,
            soft_fail_on_server_error: true,
            session_invalid_code: None,
            log_json: false,
        }
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.base_url().expect("default parses").as_str(),
            DEFAULT_BASE_URL
        );
        assert_eq!(settings.user_agent(), DEFAULT_USER_AGENT);
        assert!(settings.soft_fail_on_server_error);
        assert!(settings.session_invalid_code.is_none());
        assert!(!settings.log_json);
        assert_eq!(SessionPolicy::from_settings(&settings), SessionPolicy::default());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("MAILME_BASE_URL", Some("https://mail.example.com/app".to_owned())),
            ("MAILME_USER_AGENT", Some("digest-tests/1.0".to_owned())),
            ("MAILME_SOFT_FAIL_ON_SERVER_ERROR", Some("false".to_owned())),
            ("MAILME_SESSION_INVALID_CODE", Some("session_invalid".to_owned())),
            ("MAILME_LOG_JSON", Some("true".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.base_url().expect("override parses").as_str(),
            "https://mail.example.com/app/"
        );
        assert_eq!(settings.user_agent(), "digest-tests/1.0");
        assert!(!settings.soft_fail_on_server_error);
        assert!(settings.log_json);
        assert_eq!(
            SessionPolicy::from_settings(&settings),
            SessionPolicy::new(false, Some("session_invalid".to_owned()))
        );
    }

    #[rstest]
    #[case::json_only(Some("true"), None, true, true)]
    #[case::server_errors_strict(None, Some("false"), false, false)]
    #[case::both_set(Some("false"), Some("true"), false, true)]
    fn boolean_switches_keep_their_defaults_independently(
        #[case] log_json: Option<&str>,
        #[case] soft_fail: Option<&str>,
        #[case] expected_log_json: bool,
        #[case] expected_soft_fail: bool,
    ) {
        let _guard = lock_env([
            ("MAILME_BASE_URL", None::<String>),
            ("MAILME_USER_AGENT", None),
            ("MAILME_SESSION_INVALID_CODE", None),
            ("MAILME_LOG_JSON", log_json.map(str::to_owned)),
            ("MAILME_SOFT_FAIL_ON_SERVER_ERROR", soft_fail.map(str::to_owned)),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.log_json, expected_log_json);
        assert_eq!(settings.soft_fail_on_server_error, expected_soft_fail);
    }

    #[rstest]
    #[case::no_trailing_slash("http://localhost:8080", "http://localhost:8080/")]
    #[case::nested_path("http://localhost/mail", "http://localhost/mail/")]
    #[case::drops_query("http://localhost/?debug=1#top", "http://localhost/")]
    #[case::padded("  http://localhost/  ", "http://localhost/")]
    fn base_url_is_normalised(#[case] raw: &str, #[case] expected: &str) {
        let url = settings_with_base(raw).base_url().expect("valid base");
        assert_eq!(url.as_str(), expected);
    }

    #[rstest]
    #[case::garbage("not a url")]
    #[case::unsupported_scheme("ftp://localhost/")]
    #[case::opaque("mailto:ops@example.com")]
    fn invalid_base_urls_are_rejected(#[case] raw: &str) {
        let error = settings_with_base(raw).base_url().expect_err("invalid base");
        assert!(
            matches!(error, ConfigError::InvalidBaseUrl { .. }),
            "unexpected error: {error:?}"
        );
    }
}
