//! Client configuration loaded via OrthoConfig.
//!
//! Values come from `JOBBOARD_*` environment variables or a configuration
//! file. Command-line flags are parsed separately by the CLI, so settings
//! are loaded from an empty argument list.

use std::ffi::OsString;
use std::time::Duration;

use ortho_config::OrthoConfig;
use reqwest::Url;
use serde::Deserialize;

use crate::domain::LoginCredentials;

const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Connection and behaviour settings for the job-board client.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "JOBBOARD")]
pub struct ClientSettings {
    /// API base URL, including any path prefix such as `/api`.
    pub base_url: Option<String>,
    /// Per-request timeout in seconds; zero disables the timeout.
    pub request_timeout_secs: Option<u64>,
    /// Quiet period before a search is sent, in milliseconds.
    pub search_debounce_ms: Option<u64>,
    /// Page size requested from the vacancy list.
    pub page_limit: Option<u32>,
    /// Account email used to sign in before running a command.
    pub email: Option<String>,
    /// Account password used with `email`.
    pub password: Option<String>,
}

type UrlParseError = <Url as std::str::FromStr>::Err;

/// Errors raised while loading or interpreting settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// A configured value failed to parse.
    #[error("failed to load settings: {message}")]
    Load { message: String },
    /// The base URL did not parse.
    #[error("invalid base URL {value:?}: {source}")]
    InvalidBaseUrl {
        value: String,
        #[source]
        source: UrlParseError,
    },
}

impl ClientSettings {
    /// Load settings from the environment and configuration files only.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Load`] when a value fails to parse.
    pub fn from_environment() -> Result<Self, SettingsError> {
        Self::load_from_iter([OsString::from(env!("CARGO_PKG_NAME"))]).map_err(|error| {
            SettingsError::Load {
                message: error.to_string(),
            }
        })
    }

    /// Return the configured base URL, falling back to the local default.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidBaseUrl`] when the value is not a URL.
    pub fn base_url(&self) -> Result<Url, SettingsError> {
        let raw = self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL).trim();
        Url::parse(raw).map_err(|source| SettingsError::InvalidBaseUrl {
            value: raw.to_owned(),
            source,
        })
    }

    /// Request timeout, or `None` when disabled.
    pub fn request_timeout(&self) -> Option<Duration> {
        match self.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS) {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// Debounce window for interactive search.
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms.unwrap_or(DEFAULT_DEBOUNCE_MS))
    }

    /// Credentials for an automatic sign-in, when both parts are configured
    /// and valid.
    pub fn credentials(&self) -> Option<LoginCredentials> {
        let email = self.email.as_deref()?;
        let password = self.password.as_deref()?;
        LoginCredentials::try_from_parts(email, password).ok()
    }
}
