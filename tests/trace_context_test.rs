//! Tests for point-in-time trace context capture.
//!
//! A real OpenTelemetry tracer backs these tests so the captured ids are
//! genuine W3C trace/span identifiers, not fixtures.

use opentelemetry::trace::TracerProvider as _;
use tracing_subscriber::layer::SubscriberExt;

use lantern::logging::{current_trace_context, encoder, LogEvent, LogLevel};
use lantern::resource::ResourceDescriptor;

/// Build a subscriber whose spans carry OpenTelemetry contexts.
fn otel_subscriber() -> impl tracing::Subscriber + Send + Sync {
    let provider = opentelemetry_sdk::trace::TracerProvider::builder().build();
    let tracer = provider.tracer("lantern-test");
    tracing_subscriber::registry().with(tracing_opentelemetry::layer().with_tracer(tracer))
}

#[test]
fn test_active_span_yields_hex_identifiers() {
    let subscriber = otel_subscriber();
    tracing::subscriber::with_default(subscriber, || {
        let span = tracing::info_span!("handle_request");
        let _entered = span.enter();

        let ctx = current_trace_context();
        assert_eq!(ctx.trace_id.len(), 32, "trace id: {}", ctx.trace_id);
        assert_eq!(ctx.span_id.len(), 16, "span id: {}", ctx.span_id);
        assert!(ctx.trace_id.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(ctx.span_id.chars().all(|c| c.is_ascii_hexdigit()));
        // Valid contexts are never all zeros
        assert_ne!(ctx.trace_id, "0".repeat(32));
    });
}

#[test]
fn test_context_is_empty_outside_spans() {
    let subscriber = otel_subscriber();
    tracing::subscriber::with_default(subscriber, || {
        let ctx = current_trace_context();
        assert!(ctx.is_empty());
    });
}

#[test]
fn test_capture_is_point_in_time() {
    let subscriber = otel_subscriber();
    tracing::subscriber::with_default(subscriber, || {
        let captured = {
            let span = tracing::info_span!("short_lived");
            let _entered = span.enter();
            current_trace_context()
        };
        // The span is gone but the snapshot still holds its ids.
        assert!(!captured.is_empty());
        assert!(current_trace_context().is_empty());
    });
}

#[test]
fn test_encoded_record_carries_ambient_context() {
    let subscriber = otel_subscriber();
    tracing::subscriber::with_default(subscriber, || {
        let span = tracing::info_span!("traced_emit");
        let _entered = span.enter();

        let ctx = current_trace_context();
        let event = LogEvent::new(LogLevel::Info, "inside span");
        let payload = encoder::encode(&event, &ctx, &ResourceDescriptor::default());

        let record = &payload.resource_logs[0].scope_logs[0].log_records[0];
        assert_eq!(record.trace_id, ctx.trace_id);
        assert_eq!(record.span_id, ctx.span_id);
        assert_eq!(record.attributes[1].key, "trace_id");
        assert_eq!(record.attributes[2].key, "span_id");
    });
}

#[test]
fn test_sibling_spans_share_trace_but_not_span() {
    let subscriber = otel_subscriber();
    tracing::subscriber::with_default(subscriber, || {
        let parent = tracing::info_span!("parent");
        let _parent_entered = parent.enter();
        let parent_ctx = current_trace_context();

        let child_ctx = {
            let child = tracing::info_span!("child");
            let _child_entered = child.enter();
            current_trace_context()
        };

        assert_eq!(parent_ctx.trace_id, child_ctx.trace_id);
        assert_ne!(parent_ctx.span_id, child_ctx.span_id);
    });
}
