//! Cached manifest with periodic refresh.
//!
//! The cache exclusively owns the current manifest. A refresh replaces it
//! wholesale, and only when the new one parsed; any failure leaves the
//! previous manifest (possibly none) in place.

use crate::transport::SyncTransport;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use wikisync_core::errors::{Result, SyncError, SyncErrorKind};
use wikisync_core::model::{parse_manifest_bytes, Manifest};
use wikisync_core::{log_op_end, log_op_error, log_op_start};

const OP_REFRESH: &str = "refresh_manifest";

pub struct ManifestCache {
    transport: Arc<dyn SyncTransport>,
    url: String,
    timeout: Duration,
    refresh_every: u64,
    current: RwLock<Option<Arc<Manifest>>>,
}

impl ManifestCache {
    /// `refresh_every` below 1 is treated as 1 (refresh on every cycle).
    pub fn new(
        transport: Arc<dyn SyncTransport>,
        url: impl Into<String>,
        timeout: Duration,
        refresh_every: u64,
    ) -> Self {
        Self {
            transport,
            url: url.into(),
            timeout,
            refresh_every: refresh_every.max(1),
            current: RwLock::new(None),
        }
    }

    /// Whether the cycle numbered `tick` should refresh. Tick 0 always does.
    pub fn refresh_due(&self, tick: u64) -> bool {
        tick % self.refresh_every == 0
    }

    /// The manifest currently in use, if one was ever fetched.
    pub fn current(&self) -> Option<Arc<Manifest>> {
        match self.current.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Fetch, parse and install a new manifest.
    ///
    /// # Errors
    ///
    /// - `ManifestFetch`: transport failure, timeout or non-2xx status
    /// - `InvalidManifest` / `MissingField`: the body did not parse
    ///
    /// On error the cached manifest is left untouched.
    pub async fn refresh(&self) -> Result<Arc<Manifest>> {
        let start = Instant::now();
        log_op_start!(OP_REFRESH, url = %self.url);

        match self.fetch().await {
            Ok(manifest) => {
                let manifest = Arc::new(manifest);
                self.install(manifest.clone());
                log_op_end!(
                    OP_REFRESH,
                    duration_ms = start.elapsed().as_millis() as u64,
                    manifest = %manifest.fingerprint(),
                    fields = manifest.len()
                );
                Ok(manifest)
            }
            Err(err) => {
                log_op_error!(
                    OP_REFRESH,
                    err.clone(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    retained = self.current().is_some()
                );
                Err(err)
            }
        }
    }

    async fn fetch(&self) -> Result<Manifest> {
        let response = tokio::time::timeout(self.timeout, self.transport.get(&self.url))
            .await
            .map_err(|_| {
                fetch_error(format!("manifest request timed out after {:?}", self.timeout))
            })?
            .map_err(|e| fetch_error(e.to_string()))?;

        if !response.is_success() {
            return Err(fetch_error("manifest endpoint answered with an error status")
                .with_status(response.status));
        }

        parse_manifest_bytes(&response.body).map_err(|e| e.with_op(OP_REFRESH))
    }

    fn install(&self, manifest: Arc<Manifest>) {
        match self.current.write() {
            Ok(mut guard) => *guard = Some(manifest),
            Err(poisoned) => *poisoned.into_inner() = Some(manifest),
        }
    }
}

fn fetch_error(message: impl Into<String>) -> SyncError {
    SyncError::new(SyncErrorKind::ManifestFetch)
        .with_op(OP_REFRESH)
        .with_message(message)
}
