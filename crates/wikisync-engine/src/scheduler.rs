//! Periodic sync driver.
//!
//! One cycle walks `Idle → CheckingReadiness → (ManifestRefresh) → Diffing →
//! Submitting → Idle`. Cycles never overlap: [`SyncScheduler::run`] awaits
//! each one before waiting for the next tick, which also serialises
//! submissions per profile.

use crate::collector::{CategoryToggles, ProfileReading, SnapshotCollector};
use crate::main_context::MainContext;
use crate::manifest_cache::ManifestCache;
use crate::state_store::ProfileStateStore;
use crate::submission::SubmissionClient;
use crate::transport::SyncTransport;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::Instrument;
use wikisync_core::core_types::{CycleId, SessionId};
use wikisync_core::diff::compute_delta;
use wikisync_core::errors::{SyncError, SyncErrorKind};
use wikisync_core::{log_op_end, log_op_error, log_op_skipped, log_op_start, SyncConfig};

const OP_CYCLE: &str = "sync_cycle";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePhase {
    Idle,
    CheckingReadiness,
    ManifestRefresh,
    Diffing,
    Submitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Not logged in, or no local player yet
    NotReady,
    /// No manifest has ever been fetched successfully
    NoManifest,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::NotReady => "not_ready",
            SkipReason::NoManifest => "no_manifest",
        }
    }

    /// Error kind a skip is reported under.
    pub fn kind(&self) -> SyncErrorKind {
        match self {
            SkipReason::NotReady => SyncErrorKind::NotReady,
            SkipReason::NoManifest => SyncErrorKind::ManifestFetch,
        }
    }
}

/// What a single cycle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    Skipped(SkipReason),
    /// Snapshot matched the baseline; nothing was sent
    Unchanged,
    /// Delta acknowledged and the new baseline committed
    Submitted { delta_len: usize },
    /// The cycle stopped on an error; the baseline is untouched
    Failed(SyncErrorKind),
}

pub struct SyncScheduler {
    manifests: ManifestCache,
    collector: SnapshotCollector,
    store: Arc<ProfileStateStore>,
    submitter: SubmissionClient,
    period: Duration,
    tick: u64,
    session: SessionId,
    phase: CyclePhase,
}

impl SyncScheduler {
    /// Wire every component from `config` over a shared transport.
    pub fn new(config: &SyncConfig, main: MainContext, transport: Arc<dyn SyncTransport>) -> Self {
        let timeout = config.request_timeout();
        let manifests = ManifestCache::new(
            transport.clone(),
            config.manifest_url.clone(),
            timeout,
            config.manifest_refresh_every,
        );
        let collector = SnapshotCollector::new(main, CategoryToggles::from(config));
        let submitter = SubmissionClient::new(transport, config.submit_url.clone(), timeout);
        Self::from_parts(
            manifests,
            collector,
            Arc::new(ProfileStateStore::new()),
            submitter,
            config.tick_interval(),
        )
    }

    pub fn from_parts(
        manifests: ManifestCache,
        collector: SnapshotCollector,
        store: Arc<ProfileStateStore>,
        submitter: SubmissionClient,
        period: Duration,
    ) -> Self {
        Self {
            manifests,
            collector,
            store,
            submitter,
            period,
            tick: 0,
            session: SessionId::new(),
            phase: CyclePhase::Idle,
        }
    }

    pub fn store(&self) -> &Arc<ProfileStateStore> {
        &self.store
    }

    pub fn manifests(&self) -> &ManifestCache {
        &self.manifests
    }

    /// Cycles that got past both the readiness and manifest gates so far.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn phase(&self) -> CyclePhase {
        self.phase
    }

    pub fn session(&self) -> &SessionId {
        &self.session
    }

    /// Run one full cycle.
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        let cycle_id = CycleId::new();
        let span = tracing::info_span!(
            "sync_cycle",
            cycle_id = %cycle_id,
            session_id = %self.session,
            tick = self.tick
        );
        let outcome = self.cycle().instrument(span).await;
        self.phase = CyclePhase::Idle;
        outcome
    }

    async fn cycle(&mut self) -> CycleOutcome {
        let start = Instant::now();
        log_op_start!(OP_CYCLE);

        // Gate only; the profile key comes from the collect job below.
        self.phase = CyclePhase::CheckingReadiness;
        match self.collector.host_ready().await {
            Ok(true) => {}
            Ok(false) => return skipped(SkipReason::NotReady),
            Err(err) => return failed(err, start),
        }

        if self.manifests.refresh_due(self.tick) {
            self.phase = CyclePhase::ManifestRefresh;
            // Failure is already logged by the cache; carry on with the stale manifest.
            let _ = self.manifests.refresh().await;
        }
        let Some(manifest) = self.manifests.current() else {
            return skipped(SkipReason::NoManifest);
        };

        self.phase = CyclePhase::Diffing;
        let ProfileReading { key, snapshot } = match self.collector.collect(manifest.clone()).await
        {
            Ok(Some(reading)) => reading,
            // Logged out since the gate.
            Ok(None) => return skipped(SkipReason::NotReady),
            Err(err) => return failed(err, start),
        };
        self.tick += 1;

        let fingerprint = manifest.fingerprint();
        let baseline = self.store.baseline_for(&key, &fingerprint);
        let delta = compute_delta(&snapshot, &baseline);
        if delta.is_empty() {
            log_op_end!(
                OP_CYCLE,
                duration_ms = start.elapsed().as_millis() as u64,
                profile = %key,
                delta_len = 0usize
            );
            return CycleOutcome::Unchanged;
        }

        self.phase = CyclePhase::Submitting;
        if let Err(err) = self.submitter.submit(&key, &delta).await {
            return failed(err.with_profile(key.to_string()), start);
        }
        self.store.commit(key.clone(), snapshot, fingerprint);

        log_op_end!(
            OP_CYCLE,
            duration_ms = start.elapsed().as_millis() as u64,
            profile = %key,
            delta_len = delta.len()
        );
        CycleOutcome::Submitted {
            delta_len: delta.len(),
        }
    }

    /// Run `cycles` cycles back to back, without waiting between them.
    pub async fn run_ticks(&mut self, cycles: usize) -> Vec<CycleOutcome> {
        let mut outcomes = Vec::with_capacity(cycles);
        for _ in 0..cycles {
            outcomes.push(self.run_cycle().await);
        }
        outcomes
    }

    /// Drive cycles every period until `shutdown` turns true.
    ///
    /// The first cycle runs immediately. A cycle that overruns the period
    /// delays the next tick rather than bursting to catch up.
    pub async fn run(&mut self, shutdown: watch::Receiver<bool>) {
        self.run_bounded(shutdown, None).await;
    }

    /// Like [`run`](Self::run), but also stops after `max_cycles` cycles.
    ///
    /// Returns how many cycles ran, skipped ones included.
    pub async fn run_bounded(
        &mut self,
        mut shutdown: watch::Receiver<bool>,
        max_cycles: Option<usize>,
    ) -> usize {
        let mut interval = tokio::time::interval(self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tracing::info!(
            component = module_path!(),
            session_id = %self.session,
            period_ms = self.period.as_millis() as u64,
            max_cycles = ?max_cycles,
            "sync scheduler started"
        );
        let mut cycles = 0;
        loop {
            if *shutdown.borrow() || max_cycles.is_some_and(|max| cycles >= max) {
                break;
            }
            tokio::select! {
                _ = interval.tick() => {
                    self.run_cycle().await;
                    cycles += 1;
                }
                changed = shutdown.changed() => {
                    // A dropped sender also means stop.
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        tracing::info!(
            component = module_path!(),
            session_id = %self.session,
            tick = self.tick,
            cycles,
            "sync scheduler stopped"
        );
        cycles
    }
}

fn skipped(reason: SkipReason) -> CycleOutcome {
    log_op_skipped!(
        OP_CYCLE,
        reason = reason.as_str(),
        err_code = reason.kind().code()
    );
    CycleOutcome::Skipped(reason)
}

fn failed(err: SyncError, start: Instant) -> CycleOutcome {
    let kind = err.kind();
    log_op_error!(OP_CYCLE, err, duration_ms = start.elapsed().as_millis() as u64);
    CycleOutcome::Failed(kind)
}
