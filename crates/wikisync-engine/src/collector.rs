//! Manifest-driven snapshot collection.

use crate::main_context::MainContext;
use std::sync::Arc;
use std::time::Instant;
use wikisync_core::config::SyncConfig;
use wikisync_core::errors::Result;
use wikisync_core::host::HostState;
use wikisync_core::model::{Manifest, ProfileKey, Skill, Snapshot, UNREADABLE};
use wikisync_core::{log_op_end, log_op_error};

const OP_COLLECT: &str = "collect_snapshot";

/// Which categories are observed at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryToggles {
    pub varbits: bool,
    pub varps: bool,
    pub levels: bool,
}

impl Default for CategoryToggles {
    fn default() -> Self {
        Self {
            varbits: true,
            varps: true,
            levels: true,
        }
    }
}

impl From<&SyncConfig> for CategoryToggles {
    fn from(config: &SyncConfig) -> Self {
        Self {
            varbits: config.sync_varbits,
            varps: config.sync_varps,
            levels: config.sync_levels,
        }
    }
}

/// Read every manifest field from the host.
///
/// Must run on the host's main context. A varbit without a composition and
/// an unknown skill name are recorded as [`UNREADABLE`], never omitted.
pub fn read_snapshot(
    host: &dyn HostState,
    manifest: &Manifest,
    toggles: CategoryToggles,
) -> Snapshot {
    let mut snapshot = Snapshot::empty();

    if toggles.varbits {
        for &varbit_id in manifest.varbits() {
            let value = match host.varbit_composition(varbit_id) {
                Some(composition) => composition.extract(host.varp_value(composition.index)),
                None => UNREADABLE,
            };
            snapshot.varb.insert(varbit_id, value);
        }
    }

    if toggles.varps {
        for &varp_id in manifest.varps() {
            snapshot.varp.insert(varp_id, host.varp_value(varp_id));
        }
    }

    if toggles.levels {
        for name in manifest.skills() {
            let value = Skill::from_name(name)
                .map(|skill| host.real_skill_level(skill))
                .unwrap_or(UNREADABLE);
            snapshot.level.insert(name.clone(), value);
        }
    }

    snapshot
}

/// A snapshot together with the profile it was read for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileReading {
    pub key: ProfileKey,
    pub snapshot: Snapshot,
}

/// The profile the host is currently logged in as, if it can be synced.
pub fn read_profile(host: &dyn HostState) -> Option<ProfileKey> {
    if !host.game_state().is_syncable() {
        return None;
    }
    let name = host.local_player_name()?;
    Some(ProfileKey::new(name, host.profile_type()))
}

/// Identity and snapshot in one pass over the host.
///
/// `None` when the host is not ready; nothing else is read then.
pub fn read_profile_snapshot(
    host: &dyn HostState,
    manifest: &Manifest,
    toggles: CategoryToggles,
) -> Option<ProfileReading> {
    let key = read_profile(host)?;
    Some(ProfileReading {
        key,
        snapshot: read_snapshot(host, manifest, toggles),
    })
}

/// Produces snapshots by marshalling reads onto the main context.
#[derive(Debug, Clone)]
pub struct SnapshotCollector {
    main: MainContext,
    toggles: CategoryToggles,
}

impl SnapshotCollector {
    pub fn new(main: MainContext, toggles: CategoryToggles) -> Self {
        Self { main, toggles }
    }

    pub fn toggles(&self) -> CategoryToggles {
        self.toggles
    }

    /// Read the profile and its snapshot for `manifest` in one main-context job.
    ///
    /// The key and the snapshot always describe the same login. `Ok(None)`
    /// means the host was not ready when the job ran.
    ///
    /// # Errors
    ///
    /// `HostUnavailable` if the main context is gone.
    pub async fn collect(&self, manifest: Arc<Manifest>) -> Result<Option<ProfileReading>> {
        let start = Instant::now();
        let toggles = self.toggles;

        match self
            .main
            .invoke(move |host| read_profile_snapshot(host, &manifest, toggles))
            .await
        {
            Ok(reading) => {
                log_op_end!(
                    OP_COLLECT,
                    duration_ms = start.elapsed().as_millis() as u64,
                    ready = reading.is_some(),
                    snapshot_len = reading.as_ref().map_or(0, |r| r.snapshot.len())
                );
                Ok(reading)
            }
            Err(err) => {
                log_op_error!(
                    OP_COLLECT,
                    err.clone(),
                    duration_ms = start.elapsed().as_millis() as u64
                );
                Err(err)
            }
        }
    }

    /// Cheap readiness check that reads nothing but the login state.
    ///
    /// # Errors
    ///
    /// `HostUnavailable` if the main context is gone.
    pub async fn host_ready(&self) -> Result<bool> {
        self.main.invoke(|host| read_profile(host).is_some()).await
    }
}
