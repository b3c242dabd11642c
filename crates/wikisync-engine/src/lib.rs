//! WikiSync Engine - runtime layer of the sync engine
//!
//! Wires the pure logic from `wikisync-core` to the network and to the
//! host's main context:
//! - [`manifest_cache`]: fetches and caches the field manifest
//! - [`collector`]: reads a snapshot through the main-context handoff
//! - [`state_store`]: last acknowledged snapshot per profile
//! - [`submission`]: POSTs deltas to the collector
//! - [`scheduler`]: the periodic cycle tying it all together

pub mod collector;
pub mod main_context;
pub mod manifest_cache;
pub mod scheduler;
pub mod state_store;
pub mod submission;
pub mod transport;

pub use collector::{CategoryToggles, ProfileReading, SnapshotCollector};
pub use main_context::{main_context, MainContext, MainContextRunner};
pub use manifest_cache::ManifestCache;
pub use scheduler::{CycleOutcome, CyclePhase, SkipReason, SyncScheduler};
pub use state_store::{Baseline, ProfileStateStore};
pub use submission::SubmissionClient;
pub use transport::{HttpResponse, HttpTransport, SyncTransport, TransportError};
