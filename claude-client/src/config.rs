//! Client configuration — credential, endpoint, and API version.

use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};

/// Environment variable holding the API credential.
pub const API_KEY_VAR: &str = "ANTHROPIC_API_KEY";

/// Placeholder value from the setup docs; treated the same as a missing key.
pub const PLACEHOLDER_KEY: &str = "your-api-key-here";

/// Configuration for a [`crate::Client`].
///
/// Built explicitly and passed to the client — there is no process-wide
/// singleton. The `base_url` is overridable so tests can point the client at
/// a local mock transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Bearer credential sent as the `x-api-key` header.
    pub api_key: String,
    /// API origin, without a trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Value of the `anthropic-version` header.
    #[serde(default = "default_api_version")]
    pub api_version: String,
}

impl ClientConfig {
    /// Create a config with the given credential and default endpoint.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: default_base_url(),
            api_version: default_api_version(),
        }
    }

    /// Read the credential from `ANTHROPIC_API_KEY`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] when the variable is unset, empty, or
    /// still holds the documentation placeholder. This check runs before any
    /// network I/O.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(API_KEY_VAR).unwrap_or_default();
        let config = Self::new(api_key);
        config.validate()?;
        Ok(config)
    }

    /// Override the API origin (used by the mock-transport tests).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Check that the credential is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] for an empty or placeholder credential.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(ApiError::Config(format!(
                "{API_KEY_VAR} is not set (export {API_KEY_VAR}='sk-ant-...')"
            )));
        }
        if self.api_key == PLACEHOLDER_KEY {
            return Err(ApiError::Config(format!(
                "{API_KEY_VAR} still holds the placeholder value — set a real key"
            )));
        }
        Ok(())
    }

    /// Render the credential as `sk-ant-abc...wxyz` for log output.
    ///
    /// Short or non-ASCII keys render as `***`.
    #[must_use]
    pub fn redacted_key(&self) -> String {
        let key = &self.api_key;
        if key.len() > 14 && key.is_char_boundary(10) && key.is_char_boundary(key.len() - 4) {
            format!("{}...{}", &key[..10], &key[key.len() - 4..])
        } else {
            "***".to_string()
        }
    }
}

fn default_base_url() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_api_version() -> String {
    "2023-06-01".to_string()
}
