pub mod bits;
pub mod diff;
pub mod file_host;
pub mod manifest;
pub mod run;

use std::path::Path;
use wikisync_core::SyncConfig;

/// Load `path` if given, otherwise the built-in defaults.
pub fn load_config(path: Option<&Path>) -> Result<SyncConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(SyncConfig::load(path)?),
        None => Ok(SyncConfig::default()),
    }
}
