//! Canonical logging macros
//!
//! These macros give every engine operation the same structured shape:
//! `component`, `op`, `event` plus whatever fields the call site adds.

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use wikisync_core::log_op_start;
/// log_op_start!("refresh_manifest");
/// log_op_start!("submit_delta", username = "Zezima");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        tracing::debug!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::debug!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use wikisync_core::log_op_end;
/// log_op_end!("refresh_manifest", duration_ms = 42);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation error
///
/// The error expression is converted into a `SyncError` so that every error
/// event carries `err_kind` and `err_code`.
///
/// # Example
///
/// ```
/// # use wikisync_core::log_op_error;
/// # use wikisync_core::errors::{SyncError, SyncErrorKind};
/// let err = SyncError::new(SyncErrorKind::Timeout);
/// log_op_error!("submit_delta", err, duration_ms = 3000);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        let sync_err: $crate::errors::SyncError = ::std::convert::Into::into($err);
        tracing::warn!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?sync_err.kind(),
            err_code = sync_err.code(),
            err_message = sync_err.message(),
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        let sync_err: $crate::errors::SyncError = ::std::convert::Into::into($err);
        tracing::warn!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?sync_err.kind(),
            err_code = sync_err.code(),
            err_message = sync_err.message(),
            $($field)*
        );
    }};
}

/// Log that an operation did not run because a guard short-circuited it
///
/// # Example
///
/// ```
/// # use wikisync_core::log_op_skipped;
/// log_op_skipped!("sync_cycle", reason = "not_logged_in");
/// ```
#[macro_export]
macro_rules! log_op_skipped {
    ($op:expr, reason = $reason:expr) => {
        tracing::debug!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_SKIPPED,
            reason = $reason,
        );
    };
    ($op:expr, reason = $reason:expr, $($field:tt)*) => {
        tracing::debug!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_SKIPPED,
            reason = $reason,
            $($field)*
        );
    };
}
