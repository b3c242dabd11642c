#![allow(clippy::unwrap_used, clippy::expect_used)]

use wikisync_core::core_types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_SKIPPED, EVENT_START};
use wikisync_core::errors::{SyncError, SyncErrorKind};
use wikisync_core::logging_facility::test_capture::init_test_capture;
use wikisync_core::{log_op_end, log_op_error, log_op_skipped, log_op_start};

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name);

    let start_events = capture.count_events(|e| {
        e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_START)
    });
    assert_eq!(start_events, 1, "Should have captured one start event");
}

#[test]
fn test_log_op_end_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42);

    let events = capture.events();
    let end_events: Vec<_> = events
        .iter()
        .filter(|e| e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_END))
        .collect();

    assert_eq!(end_events.len(), 1, "Should have exactly one end event");
    assert_eq!(end_events[0].field("duration_ms"), Some("42"));
}

#[test]
fn test_log_op_error_includes_kind_and_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = SyncError::new(SyncErrorKind::ServerRejected)
        .with_status(500)
        .with_message("collector unavailable");
    log_op_error!(op_name, err, duration_ms = 10);

    let events = capture.events();
    let error_event = events
        .iter()
        .find(|e| e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_END_ERROR))
        .expect("Should have error event");

    assert_eq!(error_event.field("err_code"), Some("ERR_SERVER_REJECTED"));
    assert_eq!(error_event.field("err_kind"), Some("ServerRejected"));
    assert_eq!(error_event.field("err_message"), Some("collector unavailable"));
}

#[test]
fn test_log_op_skipped_records_reason() {
    let capture = init_test_capture();
    let op_name = "test_log_op_skipped_unique_4";

    log_op_skipped!(op_name, reason = "not_logged_in");

    let events = capture.events();
    let skipped = events
        .iter()
        .find(|e| e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_SKIPPED))
        .expect("Should have skipped event");
    assert_eq!(skipped.field("reason"), Some("not_logged_in"));
}

#[test]
fn test_log_macros_with_extra_fields() {
    let capture = init_test_capture();
    let op_name = "test_log_macros_fields_unique_5";

    log_op_start!(op_name, username = "Zezima", delta_len = 3usize);

    let events = capture.events();
    let start_event = events
        .iter()
        .find(|e| e.op.as_deref() == Some(op_name))
        .expect("Should have start event");

    assert_eq!(start_event.field("username"), Some("Zezima"));
    assert_eq!(start_event.field("delta_len"), Some("3"));
}

#[test]
fn test_config_error_logged_through_conversion() {
    let capture = init_test_capture();
    let op_name = "test_config_error_unique_6";

    let err = wikisync_core::errors::ConfigError::Invalid {
        field: "submit_url",
        reason: "must not be empty".to_string(),
    };
    log_op_error!(op_name, err, duration_ms = 0);

    capture.assert_event_exists(op_name, EVENT_END_ERROR);
    let code = capture
        .events()
        .into_iter()
        .find(|e| e.op.as_deref() == Some(op_name))
        .and_then(|e| e.field("err_code").map(str::to_string));
    assert_eq!(code.as_deref(), Some("ERR_INVALID_CONFIG"));
}

#[test]
#[should_panic(expected = "Expected event")]
fn test_capture_assert_event_exists_fails() {
    let capture = init_test_capture();
    capture.assert_event_exists("nonexistent_op_truly_unique_999", EVENT_START);
}
