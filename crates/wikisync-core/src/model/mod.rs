//! Domain model for the sync engine
//!
//! - [`Manifest`]: remotely supplied list of fields to observe
//! - [`Snapshot`] / [`Delta`]: observed values and their incremental change
//! - [`ProfileKey`]: identity keying independent baselines
//! - [`Skill`]: the host's skills, observed for the `level` category

pub mod manifest;
pub mod profile;
pub mod skill;
pub mod snapshot;

pub use manifest::{parse_manifest_bytes, Manifest};
pub use profile::{ProfileKey, ProfileType};
pub use skill::Skill;
pub use snapshot::{Category, Delta, Snapshot, UNREADABLE};
