//! Configuration types.

use std::path::PathBuf;
use std::time::Duration;

use crate::countries::{self, Country};
use crate::error::ConfigError;

const DEFAULT_API_URL: &str = "http://localhost:3001";
const DEFAULT_STORE_PATH: &str = "./data/registration.json";

/// Client configuration for the registration flow.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the registration backend (no trailing slash).
    pub api_url: String,
    /// Where the file-backed store keeps persisted flow state.
    pub store_path: PathBuf,
    /// Country preselected in the phone input.
    pub default_country: &'static Country,
    /// Per-request timeout. `None` means requests may wait indefinitely.
    pub request_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            default_country: countries::default_country(),
            request_timeout: None,
        }
    }
}

impl ClientConfig {
    /// Build config from environment variables, falling back to defaults for
    /// anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("GUEST_REG_API_URL").filter(|s| !s.trim().is_empty()) {
            let url = url.trim().trim_end_matches('/').to_string();
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::InvalidValue {
                    key: "GUEST_REG_API_URL".into(),
                    message: format!("expected an http(s) URL, got '{url}'"),
                });
            }
            config.api_url = url;
        }

        if let Some(path) = lookup("GUEST_REG_STORE_PATH").filter(|s| !s.trim().is_empty()) {
            config.store_path = PathBuf::from(path.trim());
        }

        if let Some(code) = lookup("GUEST_REG_DEFAULT_COUNTRY").filter(|s| !s.trim().is_empty()) {
            config.default_country =
                countries::find_by_code(code.trim()).ok_or_else(|| ConfigError::InvalidValue {
                    key: "GUEST_REG_DEFAULT_COUNTRY".into(),
                    message: format!("unknown country code '{}'", code.trim()),
                })?;
        }

        let timeout = lookup("GUEST_REG_REQUEST_TIMEOUT_SECS").filter(|s| !s.trim().is_empty());
        if let Some(secs) = timeout {
            let secs: u64 = secs.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "GUEST_REG_REQUEST_TIMEOUT_SECS".into(),
                message: format!("expected a whole number of seconds, got '{secs}'"),
            })?;
            config.request_timeout = Some(Duration::from_secs(secs));
        }

        Ok(config)
    }
}
