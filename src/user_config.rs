//! User-level configuration loaded from `~/.story-ranks/config.toml`.
//!
//! The file is optional; if it does not exist every field falls back to its
//! `Default`. Command-line flags and environment variables take precedence
//! over anything set here.

use crate::ordering::DEFAULT_WRITE_TIMEOUT;
use crate::utils::{data_home, default_store_dir};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Name of the user config file inside the data home.
pub const CONFIG_FILENAME: &str = "config.toml";

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum UserConfigError {
    #[error("Failed to read user config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse user config TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// Where stories live (`[store]` table).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Markdown store directory. Defaults to `~/.story-ranks/stories`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
    /// Base URL of the studio REST API. When set, listing and moving go
    /// through the API instead of the Markdown store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
}

/// Reordering behaviour (`[ordering]` table).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct OrderingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub write_timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub ordering: OrderingConfig,
}

impl UserConfig {
    #[must_use]
    pub fn store_dir(&self) -> PathBuf {
        self.store.dir.clone().unwrap_or_else(default_store_dir)
    }

    #[must_use]
    pub fn write_timeout(&self) -> Duration {
        self.ordering
            .write_timeout_ms
            .map_or(DEFAULT_WRITE_TIMEOUT, Duration::from_millis)
    }
}

// ---------------------------------------------------------------------------
// Loader
// ---------------------------------------------------------------------------

#[must_use]
pub fn user_config_path() -> PathBuf {
    data_home().join(CONFIG_FILENAME)
}

/// Load the user configuration from its default location.
///
/// Returns `Ok(UserConfig::default())` when the file does not exist.
pub fn load_user_config() -> Result<UserConfig, UserConfigError> {
    load_user_config_from(&user_config_path())
}

/// Load the user configuration from `path`.
pub fn load_user_config_from(path: &Path) -> Result<UserConfig, UserConfigError> {
    if !path.exists() {
        debug!("User config not found at {}; using defaults", path.display());
        return Ok(UserConfig::default());
    }

    let content = std::fs::read_to_string(path)?;
    let config: UserConfig = toml::from_str(&content)?;
    debug!("Loaded user config from {}", path.display());
    Ok(config)
}

#[cfg(test)]
#[path = "user_config_tests.rs"]
mod tests;
