//! Delta submission to the remote collector.
//!
//! A submission is one POST of `{username, profileType, delta}`. It has no
//! side effects on local state: the scheduler commits the new baseline only
//! when [`SubmissionClient::submit`] returns `Ok`.

use crate::transport::SyncTransport;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use wikisync_core::errors::{Result, SyncError, SyncErrorKind};
use wikisync_core::model::{Delta, ProfileKey, ProfileType};
use wikisync_core::{log_op_end, log_op_error, log_op_start};

const OP_SUBMIT: &str = "submit_delta";

/// JSON body of a submission.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission<'a> {
    pub username: &'a str,
    pub profile_type: ProfileType,
    pub delta: &'a Delta,
}

impl<'a> Submission<'a> {
    pub fn new(key: &'a ProfileKey, delta: &'a Delta) -> Self {
        Self {
            username: key.username(),
            profile_type: key.profile_type(),
            delta,
        }
    }

    /// # Errors
    ///
    /// `Serialization` if the payload cannot be encoded.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| {
            SyncError::new(SyncErrorKind::Serialization)
                .with_op(OP_SUBMIT)
                .with_message(e.to_string())
        })
    }
}

pub struct SubmissionClient {
    transport: Arc<dyn SyncTransport>,
    url: String,
    timeout: Duration,
}

impl SubmissionClient {
    pub fn new(transport: Arc<dyn SyncTransport>, url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            transport,
            url: url.into(),
            timeout,
        }
    }

    /// Send `delta` for `key`; `Ok` only on a 2xx acknowledgement.
    ///
    /// # Errors
    ///
    /// - `Timeout`: no answer within the configured timeout
    /// - `Transport`: the collector could not be reached
    /// - `ServerRejected`: the collector answered non-2xx
    /// - `Serialization`: the payload could not be encoded
    pub async fn submit(&self, key: &ProfileKey, delta: &Delta) -> Result<()> {
        let start = Instant::now();
        log_op_start!(OP_SUBMIT, profile = %key, delta_len = delta.len());

        let result = self.send(key, delta).await;
        let duration_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(()) => {
                log_op_end!(
                    OP_SUBMIT,
                    duration_ms = duration_ms,
                    profile = %key,
                    delta_len = delta.len()
                );
            }
            Err(err) => {
                log_op_error!(OP_SUBMIT, err.clone(), duration_ms = duration_ms, profile = %key);
            }
        }
        result
    }

    async fn send(&self, key: &ProfileKey, delta: &Delta) -> Result<()> {
        let body = Submission::new(key, delta).to_json()?;

        let sent = tokio::time::timeout(self.timeout, self.transport.post_json(&self.url, body))
            .await
            .map_err(|_| {
                SyncError::new(SyncErrorKind::Timeout)
                    .with_message(format!("submission timed out after {:?}", self.timeout))
            })
            .and_then(|reply| reply.map_err(SyncError::from));
        let response = sent.map_err(|e| e.with_op(OP_SUBMIT).with_profile(key.to_string()))?;

        if !response.is_success() {
            return Err(SyncError::new(SyncErrorKind::ServerRejected)
                .with_op(OP_SUBMIT)
                .with_profile(key.to_string())
                .with_status(response.status)
                .with_message("collector did not acknowledge the delta"));
        }
        Ok(())
    }
}
