//! Portal client configuration loaded via OrthoConfig.
//!
//! Values layer as defaults, then configuration file, then `DCE_*`
//! environment variables, then command-line flags.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::domain::DEFAULT_POLL_INTERVAL;

const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";
const DEFAULT_IDENTITY_BASE_URL: &str = "https://identitytoolkit.googleapis.com/v1";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

/// Errors raised while interpreting settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// A URL setting did not parse.
    #[error("{field} is not a valid URL ({value}): {source}")]
    InvalidUrl {
        /// Setting name.
        field: &'static str,
        /// Offending value.
        value: String,
        /// Parser error.
        #[source]
        source: url::ParseError,
    },
    /// An identity operation was requested without an API key.
    #[error("identity_api_key is required for account operations (set DCE_IDENTITY_API_KEY)")]
    MissingIdentityApiKey,
}

/// Settings for talking to `dce-server` and the identity provider.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "DCE")]
pub struct PortalSettings {
    /// Root of the backend REST API.
    pub api_base_url: Option<String>,
    /// Root of the identity provider's REST API.
    pub identity_base_url: Option<String>,
    /// Identity provider API key.
    pub identity_api_key: Option<String>,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: Option<u64>,
    /// Alumni status poll period in seconds.
    pub status_poll_secs: Option<u64>,
    /// Emit JSON logs instead of human-readable lines.
    #[ortho_config(default = false)]
    pub log_json: bool,
}

fn parse_url(field: &'static str, value: &str) -> Result<Url, SettingsError> {
    Url::parse(value).map_err(|source| SettingsError::InvalidUrl {
        field,
        value: value.to_owned(),
        source,
    })
}

fn positive_secs(value: Option<u64>, default: u64) -> Duration {
    Duration::from_secs(value.filter(|secs| *secs > 0).unwrap_or(default))
}

impl PortalSettings {
    /// Backend API root, falling back to the local development server.
    pub fn api_base_url(&self) -> Result<Url, SettingsError> {
        parse_url(
            "api_base_url",
            self.api_base_url.as_deref().unwrap_or(DEFAULT_API_BASE_URL),
        )
    }

    /// Identity provider API root.
    pub fn identity_base_url(&self) -> Result<Url, SettingsError> {
        parse_url(
            "identity_base_url",
            self.identity_base_url
                .as_deref()
                .unwrap_or(DEFAULT_IDENTITY_BASE_URL),
        )
    }

    /// Identity provider API key; required for account operations.
    pub fn identity_api_key(&self) -> Result<&str, SettingsError> {
        self.identity_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(SettingsError::MissingIdentityApiKey)
    }

    /// Per-request timeout. Zero falls back to the default.
    pub fn request_timeout(&self) -> Duration {
        positive_secs(self.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS)
    }

    /// Alumni status poll period. Zero falls back to the default.
    pub fn status_poll_interval(&self) -> Duration {
        positive_secs(self.status_poll_secs, DEFAULT_POLL_INTERVAL.as_secs())
    }
}
