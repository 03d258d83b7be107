//! Provider Configuration
//!
//! Settings the host hands to the provider at configure time, either as the
//! provider block or through `KION_*` environment variables.

use crate::kion::client::KionClient;
use crate::kion::error::ConfigError;
use serde::Deserialize;

pub const ENV_URL: &str = "KION_URL";
pub const ENV_APIKEY: &str = "KION_APIKEY";
pub const ENV_APIPATH: &str = "KION_APIPATH";
pub const ENV_SKIPSSLVALIDATION: &str = "KION_SKIPSSLVALIDATION";

/// Default API path when none is configured
pub const DEFAULT_API_PATH: &str = "/api";

fn default_api_path() -> String {
    DEFAULT_API_PATH.to_string()
}

/// Provider configuration
#[derive(Clone, Deserialize)]
pub struct ProviderConfig {
    /// URL of the Kion installation, e.g. `https://kion.example.com`
    pub url: String,
    /// API key generated from Kion, e.g. `app_1_XXXXXXXXXXXX`
    #[serde(rename = "apikey")]
    pub api_key: String,
    /// Base path of the API
    #[serde(rename = "apipath", default = "default_api_path")]
    pub api_path: String,
    /// Skip TLS certificate verification
    #[serde(rename = "skipsslvalidation", default)]
    pub skip_ssl_validation: bool,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("url", &self.url)
            .field("api_key", &"<redacted>")
            .field("api_path", &self.api_path)
            .field("skip_ssl_validation", &self.skip_ssl_validation)
            .finish()
    }
}

impl ProviderConfig {
    /// Load configuration from the environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let url = get(ENV_URL).ok_or(ConfigError::Missing(ENV_URL))?;
        let api_key = get(ENV_APIKEY).ok_or(ConfigError::Missing(ENV_APIKEY))?;
        let api_path = get(ENV_APIPATH).unwrap_or_else(default_api_path);
        let skip_ssl_validation = match get(ENV_SKIPSSLVALIDATION) {
            Some(raw) => parse_bool(&raw).ok_or(ConfigError::InvalidValue {
                key: ENV_SKIPSSLVALIDATION,
                value: raw,
            })?,
            None => false,
        };

        let config = Self {
            url,
            api_key,
            api_path,
            skip_ssl_validation,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that cannot produce a working client
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.url.trim().is_empty() {
            return Err(ConfigError::Missing("url"));
        }
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::Missing("apikey"));
        }
        Ok(())
    }

    /// Build the API client
    pub fn into_client(self) -> Result<KionClient, ConfigError> {
        self.validate()?;
        tracing::info!(
            "Configuring Kion client for {} (api path {}, skip ssl validation: {})",
            self.url,
            self.api_path,
            self.skip_ssl_validation
        );
        KionClient::try_new(
            &self.url,
            &self.api_key,
            &self.api_path,
            self.skip_ssl_validation,
        )
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}
