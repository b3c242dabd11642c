//! WikiSync Core - domain model and pure logic of the sync engine
//!
//! This crate provides everything the sync engine needs that does not touch
//! the network or the host's threads:
//! - Manifest, Snapshot, Delta and ProfileKey models
//! - The host read surface trait and varbit bit extraction
//! - Pure delta computation
//! - Error facility, structured logging facility and configuration
//!
//! The runtime components (manifest cache, collector, state store,
//! submission client, scheduler) live in `wikisync-engine`.

pub mod config;
pub mod diff;
pub mod errors;
pub mod host;
pub mod logging_facility;
pub mod model;

/// Re-exported so the logging macros can name schema constants from any crate.
pub use wikisync_core_types as core_types;

// Re-export commonly used types
pub use config::SyncConfig;
pub use diff::compute_delta;
pub use errors::{Result, SyncError, SyncErrorKind};
pub use host::{extract_bits, GameState, HostState, VarbitComposition};
pub use model::{Delta, Manifest, ProfileKey, ProfileType, Skill, Snapshot};
