//! In-memory event capture for logging assertions in tests
//!
//! Events are recorded together with the spans they were emitted in, so a
//! test can check both what was logged and under which `sync_cycle`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

/// One recorded event
#[derive(Clone, Debug)]
pub struct CapturedEvent {
    pub level: Level,
    pub component: Option<String>,
    pub op: Option<String>,
    pub event: Option<String>,
    pub fields: HashMap<String, String>,
    /// Names of the enclosing spans, outermost first
    pub spans: Vec<String>,
    /// Fields of every enclosing span; inner spans win on conflicts
    pub span_fields: HashMap<String, String>,
}

impl CapturedEvent {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn span_field(&self, name: &str) -> Option<&str> {
        self.span_fields.get(name).map(String::as_str)
    }

    pub fn in_span(&self, name: &str) -> bool {
        self.spans.iter().any(|span| span == name)
    }
}

#[derive(Default)]
struct FieldVisitor(HashMap<String, String>);

impl FieldVisitor {
    fn put(&mut self, field: &Field, value: String) {
        self.0.insert(field.name().to_string(), value);
    }
}

impl Visit for FieldVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.put(field, format!("{:?}", value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.put(field, value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.put(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.put(field, value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.put(field, value.to_string());
    }
}

/// Span extension holding the span's own fields.
struct SpanFields(HashMap<String, String>);

type EventLog = Arc<Mutex<Vec<CapturedEvent>>>;

pub struct TestCaptureLayer {
    events: EventLog,
}

impl TestCaptureLayer {
    pub fn new() -> (Self, TestCapture) {
        let events: EventLog = Arc::default();
        (
            Self {
                events: events.clone(),
            },
            TestCapture { events },
        )
    }
}

impl<S> Layer<S> for TestCaptureLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor::default();
        attrs.record(&mut visitor);
        if let Some(span) = ctx.span(id) {
            span.extensions_mut().insert(SpanFields(visitor.0));
        }
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        let fields = visitor.0;

        let mut spans = Vec::new();
        let mut span_fields = HashMap::new();
        if let Some(scope) = ctx.event_scope(event) {
            for span in scope.from_root() {
                spans.push(span.name().to_string());
                if let Some(own) = span.extensions().get::<SpanFields>() {
                    span_fields.extend(own.0.iter().map(|(k, v)| (k.clone(), v.clone())));
                }
            }
        }

        let captured = CapturedEvent {
            level: *event.metadata().level(),
            component: fields.get("component").cloned(),
            op: fields.get("op").cloned(),
            event: fields.get("event").cloned(),
            fields,
            spans,
            span_fields,
        };
        if let Ok(mut events) = self.events.lock() {
            events.push(captured);
        }
    }
}

/// Shared handle onto everything the capture layer recorded
#[derive(Clone)]
pub struct TestCapture {
    events: EventLog,
}

impl TestCapture {
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// # Panics
    ///
    /// Panics if no event has this `op` and `event`.
    pub fn assert_event_exists(&self, op: &str, event: &str) {
        let events = self.events();
        assert!(
            events
                .iter()
                .any(|e| e.op.as_deref() == Some(op) && e.event.as_deref() == Some(event)),
            "no captured event with op={} event={} (of {})",
            op,
            event,
            events.len()
        );
    }

    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }

    pub fn count_events<F>(&self, predicate: F) -> usize
    where
        F: Fn(&CapturedEvent) -> bool,
    {
        self.events().iter().filter(|e| predicate(e)).count()
    }

    /// Events matching `predicate`, in emission order.
    pub fn find<F>(&self, predicate: F) -> Vec<CapturedEvent>
    where
        F: Fn(&CapturedEvent) -> bool,
    {
        self.events().into_iter().filter(|e| predicate(e)).collect()
    }
}

static GLOBAL_CAPTURE: OnceLock<TestCapture> = OnceLock::new();

/// Install the capture layer as the global subscriber.
///
/// Only the first call installs anything; every call returns the same shared
/// handle. Tests in one binary share it, so assertions should filter on a
/// field unique to the test.
///
/// # Example
///
/// ```
/// use wikisync_core::logging_facility::test_capture::init_test_capture;
/// use wikisync_core::log_op_start;
///
/// let capture = init_test_capture();
/// log_op_start!("my_operation");
/// capture.assert_event_exists("my_operation", "start");
/// ```
pub fn init_test_capture() -> TestCapture {
    GLOBAL_CAPTURE
        .get_or_init(|| {
            let (layer, capture) = TestCaptureLayer::new();
            tracing_subscriber::registry().with(layer).init();
            capture
        })
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_captured_event_field_lookup() {
        let mut fields = HashMap::new();
        fields.insert("reason".to_string(), "not_ready".to_string());
        let mut span_fields = HashMap::new();
        span_fields.insert("cycle_id".to_string(), "0190".to_string());
        let event = CapturedEvent {
            level: Level::DEBUG,
            component: Some("test".to_string()),
            op: Some("sync_cycle".to_string()),
            event: Some("skipped".to_string()),
            fields,
            spans: vec!["sync_cycle".to_string()],
            span_fields,
        };

        assert_eq!(event.field("reason"), Some("not_ready"));
        assert_eq!(event.field("missing"), None);
        assert_eq!(event.span_field("cycle_id"), Some("0190"));
        assert!(event.in_span("sync_cycle"));
        assert!(!event.in_span("other"));
    }

    #[test]
    fn test_events_inside_spans_carry_span_fields() {
        let capture = init_test_capture();
        let span = tracing::info_span!("capture_outer_span", request_id = "p-1");
        span.in_scope(|| {
            tracing::info!(op = "capture_inner_op", event = "end");
        });

        let found = capture.find(|e| e.op.as_deref() == Some("capture_inner_op"));
        assert_eq!(found.len(), 1);
        assert!(found[0].in_span("capture_outer_span"));
        assert_eq!(found[0].span_field("request_id"), Some("p-1"));
    }
}
