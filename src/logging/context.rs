//! Point-in-time trace context capture.
//!
//! Log records are attributed to the trace/span active at the moment of
//! emission, not when the export worker runs. The reader therefore takes
//! a snapshot synchronously and the encoder receives it as an explicit
//! argument, keeping the encoder pure.

use opentelemetry::trace::TraceContextExt;
use tracing_opentelemetry::OpenTelemetrySpanExt;

/// Snapshot of the active trace/span identifiers.
///
/// Both fields are empty strings when no span is active. The snapshot is
/// read-only; it is never updated after capture.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraceContext {
    /// Active trace id as lowercase hex, or empty
    pub trace_id: String,
    /// Active span id as lowercase hex, or empty
    pub span_id: String,
}

impl TraceContext {
    /// Context with no active span.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Construct a context from explicit identifiers.
    pub fn new(trace_id: impl Into<String>, span_id: impl Into<String>) -> Self {
        Self {
            trace_id: trace_id.into(),
            span_id: span_id.into(),
        }
    }

    /// True when no span was active at capture time.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trace_id.is_empty() && self.span_id.is_empty()
    }
}

/// Read the trace/span identifiers active in the ambient execution
/// context right now.
///
/// Returns an empty context (not an error) when no span is active or the
/// active span context is invalid.
#[must_use]
pub fn current_trace_context() -> TraceContext {
    let otel_context = tracing::Span::current().context();
    let span = otel_context.span();
    let span_context = span.span_context();

    if span_context.is_valid() {
        TraceContext {
            trace_id: span_context.trace_id().to_string(),
            span_id: span_context.span_id().to_string(),
        }
    } else {
        TraceContext::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_active_span_yields_empty_context() {
        let ctx = current_trace_context();
        assert!(ctx.is_empty());
        assert_eq!(ctx.trace_id, "");
        assert_eq!(ctx.span_id, "");
    }

    #[test]
    fn test_explicit_context_is_not_empty() {
        let ctx = TraceContext::new("abc", "def");
        assert!(!ctx.is_empty());
    }
}
