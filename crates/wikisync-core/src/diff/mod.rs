//! Delta computation.
//!
//! Compares a freshly collected snapshot against the last acknowledged one
//! and keeps only what the collector has not seen yet.
//!
//! ## Entry point
//!
//! ```
//! use wikisync_core::diff::compute_delta;
//! use wikisync_core::model::Snapshot;
//!
//! let new = Snapshot::empty().with_varbit(10, 3);
//! let delta = compute_delta(&new, &Snapshot::empty());
//! assert_eq!(delta.varb.get(&10), Some(&3));
//! ```
//!
//! ## Guarantees
//!
//! - **Left-only**: keys present only in the old snapshot are dropped; the
//!   collector's model is append/overwrite, deletions are not represented.
//! - **Idempotence**: a snapshot diffed against itself yields an empty delta.
//! - **Completeness**: diffing against the empty snapshot yields every entry.
//! - **Purity**: no side effects, deterministic for identical inputs.

pub mod engine;
pub mod human_summary;

pub use engine::compute_delta;
pub use human_summary::render_human_summary;
