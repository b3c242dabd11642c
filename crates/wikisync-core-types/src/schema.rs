//! Canonical schema constants for structured logging and events
//!
//! These constants keep field names consistent across the engine's log output.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_CYCLE_ID: &str = "cycle_id";
pub const FIELD_SESSION_ID: &str = "session_id";

// Sync identifiers
pub const FIELD_USERNAME: &str = "username";
pub const FIELD_PROFILE_TYPE: &str = "profile_type";
pub const FIELD_MANIFEST: &str = "manifest";
pub const FIELD_TICK: &str = "tick";

// Collection sizes
pub const FIELD_DELTA_LEN: &str = "delta_len";
pub const FIELD_SNAPSHOT_LEN: &str = "snapshot_len";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
pub const EVENT_SKIPPED: &str = "skipped";
