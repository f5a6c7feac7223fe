//! Demo configuration — model names, token limits, and the log location.
//!
//! The binaries take no flags: behavior comes from these defaults, a TOML
//! file when one is loaded explicitly, and environment overrides.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Shared configuration for the demo binaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoConfig {
    /// Model used by the demos.
    #[serde(default = "default_model")]
    pub model: String,
    /// Cheaper model used for the credential check.
    #[serde(default = "default_haiku_model")]
    pub haiku_model: String,
    /// Output token limit for single-shot calls.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Interaction log location; `~` is expanded once at startup.
    #[serde(default = "default_db_path")]
    pub db_path: String,
    /// How many related past interactions feed the history context.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            haiku_model: default_haiku_model(),
            max_tokens: default_max_tokens(),
            db_path: default_db_path(),
            history_limit: default_history_limit(),
        }
    }
}

impl DemoConfig {
    /// Defaults with environment overrides applied (`CLAUDE_MODEL`,
    /// `CLAUDE_DB_PATH`).
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(model) = std::env::var("CLAUDE_MODEL") {
            if !model.is_empty() {
                config.model = model;
            }
        }
        if let Ok(path) = std::env::var("CLAUDE_DB_PATH") {
            if !path.is_empty() {
                config.db_path = path;
            }
        }
        config
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns an error if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// The log database path with `~` expanded against `HOME`.
    ///
    /// Resolution happens once, at startup; the store itself never sees a
    /// tilde.
    #[must_use]
    pub fn resolved_db_path(&self) -> PathBuf {
        expand_tilde(&self.db_path, std::env::var("HOME").ok().as_deref())
    }
}

fn expand_tilde(path: &str, home: Option<&str>) -> PathBuf {
    if let (Some(rest), Some(home)) = (path.strip_prefix("~/"), home) {
        return PathBuf::from(home).join(rest);
    }
    PathBuf::from(path)
}

fn default_model() -> String {
    "claude-3-5-sonnet-20241022".to_string()
}
fn default_haiku_model() -> String {
    "claude-3-haiku-20240307".to_string()
}
fn default_max_tokens() -> u32 {
    1024
}
fn default_db_path() -> String {
    "~/.config/claude/databases/assistant.db".to_string()
}
fn default_history_limit() -> usize {
    5
}
