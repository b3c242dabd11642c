//! Sync configuration.
//!
//! Every field has a default, so an empty TOML file (or no file at all) is a
//! valid configuration.
//!
//! ```toml
//! manifest_url = "https://sync.runescape.wiki/runelite/manifest"
//! submit_url = "https://sync.runescape.wiki/runelite/submit"
//! tick_interval_ms = 1000
//! manifest_refresh_every = 2
//! request_timeout_ms = 3000
//! sync_varbits = true
//! sync_varps = true
//! sync_levels = true
//! ```

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_MANIFEST_URL: &str = "https://sync.runescape.wiki/runelite/manifest";
pub const DEFAULT_SUBMIT_URL: &str = "https://sync.runescape.wiki/runelite/submit";
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1_000;
pub const DEFAULT_MANIFEST_REFRESH_EVERY: u64 = 2;
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 3_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyncConfig {
    pub manifest_url: String,
    pub submit_url: String,
    /// Wall-clock period between scheduler ticks
    pub tick_interval_ms: u64,
    /// Refresh the manifest on every Nth cycle
    pub manifest_refresh_every: u64,
    /// Timeout applied to each manifest fetch and submission
    pub request_timeout_ms: u64,
    pub sync_varbits: bool,
    pub sync_varps: bool,
    pub sync_levels: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            manifest_url: DEFAULT_MANIFEST_URL.to_string(),
            submit_url: DEFAULT_SUBMIT_URL.to_string(),
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            manifest_refresh_every: DEFAULT_MANIFEST_REFRESH_EVERY,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            sync_varbits: true,
            sync_varps: true,
            sync_levels: true,
        }
    }
}

impl SyncConfig {
    /// Parse and validate a TOML document.
    ///
    /// # Errors
    ///
    /// `ConfigError::Parse` for malformed TOML or unknown keys,
    /// `ConfigError::Invalid` when validation fails.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: SyncConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    ///
    /// # Errors
    ///
    /// `ConfigError::Read` when the file cannot be read, otherwise as
    /// [`SyncConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// # Errors
    ///
    /// `ConfigError::Invalid` naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.manifest_url.trim().is_empty() {
            return Err(invalid("manifest_url", "must not be empty"));
        }
        if self.submit_url.trim().is_empty() {
            return Err(invalid("submit_url", "must not be empty"));
        }
        if self.tick_interval_ms == 0 {
            return Err(invalid("tick_interval_ms", "must be greater than zero"));
        }
        if self.manifest_refresh_every == 0 {
            return Err(invalid("manifest_refresh_every", "must be at least 1"));
        }
        if self.request_timeout_ms == 0 {
            return Err(invalid("request_timeout_ms", "must be greater than zero"));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}
