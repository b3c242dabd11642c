//! Last-acknowledged snapshot per profile.
//!
//! The store exclusively owns the committed baselines. An entry is created
//! by the first successful submission for a profile, replaced whole by every
//! later one, and lives until the process exits. Nothing is persisted.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use wikisync_core::model::{ProfileKey, Snapshot};

/// A committed baseline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Baseline {
    pub snapshot: Snapshot,
    /// Fingerprint of the manifest the snapshot was collected under
    pub manifest_fingerprint: String,
    pub committed_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct ProfileStateStore {
    entries: RwLock<HashMap<ProfileKey, Arc<Baseline>>>,
}

impl ProfileStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Committed snapshot for `key`, or the empty snapshot if never synced.
    pub fn get(&self, key: &ProfileKey) -> Snapshot {
        self.entry(key)
            .map(|baseline| baseline.snapshot.clone())
            .unwrap_or_default()
    }

    /// Baseline to diff against for a snapshot collected under `fingerprint`.
    ///
    /// A baseline from a different manifest is ignored (empty snapshot), so
    /// the next successful submission resends every field.
    pub fn baseline_for(&self, key: &ProfileKey, fingerprint: &str) -> Snapshot {
        match self.entry(key) {
            Some(baseline) if baseline.manifest_fingerprint == fingerprint => {
                baseline.snapshot.clone()
            }
            Some(baseline) => {
                tracing::info!(
                    component = module_path!(),
                    profile = %key,
                    baseline_manifest = %baseline.manifest_fingerprint,
                    manifest = %fingerprint,
                    "manifest changed since last commit; resending full snapshot"
                );
                Snapshot::empty()
            }
            None => Snapshot::empty(),
        }
    }

    /// Full committed entry, if any.
    pub fn entry(&self, key: &ProfileKey) -> Option<Arc<Baseline>> {
        let entries = match self.entries.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.get(key).cloned()
    }

    /// Replace the entry for `key` with `snapshot`.
    ///
    /// Callers pass the full snapshot that was acknowledged, never a delta.
    pub fn commit(
        &self,
        key: ProfileKey,
        snapshot: Snapshot,
        manifest_fingerprint: impl Into<String>,
    ) {
        let baseline = Arc::new(Baseline {
            snapshot,
            manifest_fingerprint: manifest_fingerprint.into(),
            committed_at: Utc::now(),
        });
        let mut entries = match self.entries.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.insert(key, baseline);
    }

    /// Profiles with a committed baseline, sorted.
    pub fn profiles(&self) -> Vec<ProfileKey> {
        let entries = match self.entries.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let mut keys: Vec<ProfileKey> = entries.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        match self.entries.read() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
