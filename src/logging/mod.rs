//! Application logging pipeline.
//!
//! Flow: a call site emits an event → the active trace context is read
//! synchronously → every configured transport receives the
//! (event, context) pair. The OTLP transport queues the record for
//! asynchronous export; the console transport forwards it to the
//! diagnostic subscriber.

pub mod context;
pub mod encoder;
pub mod event;
pub mod exporter;
pub mod severity;

use std::sync::Arc;

use serde_json::Value;

use crate::config::TelemetryConfig;

pub use context::{current_trace_context, TraceContext};
pub use event::LogEvent;
pub use exporter::OtlpLogExporter;
pub use severity::{severity_number, LogLevel};

/// Something that accepts a log event and produces a side effect.
///
/// Transports must not block the caller and must not fail the emission:
/// any delivery problem is theirs to report and swallow.
pub trait LogTransport: Send + Sync {
    fn transport(&self, event: &LogEvent, ctx: &TraceContext);
}

/// Transport that forwards events to the `tracing` subscriber, carrying
/// trace/span ids as fields.
#[derive(Debug, Default)]
pub struct ConsoleTransport;

impl LogTransport for ConsoleTransport {
    fn transport(&self, event: &LogEvent, ctx: &TraceContext) {
        let metadata = if event.metadata.is_empty() {
            None
        } else {
            serde_json::to_string(&serde_json::Map::from_iter(
                event.metadata.iter().map(|(k, v)| (k.clone(), v.clone())),
            ))
            .ok()
        };
        let metadata = metadata.as_deref().unwrap_or("");

        match event.level {
            LogLevel::Error => tracing::error!(
                target: "lantern::app",
                trace_id = %ctx.trace_id,
                span_id = %ctx.span_id,
                metadata,
                stack = event.stack.as_deref().unwrap_or(""),
                "{}",
                event.message
            ),
            LogLevel::Warn => tracing::warn!(
                target: "lantern::app",
                trace_id = %ctx.trace_id,
                span_id = %ctx.span_id,
                metadata,
                "{}",
                event.message
            ),
            LogLevel::Info => tracing::info!(
                target: "lantern::app",
                trace_id = %ctx.trace_id,
                span_id = %ctx.span_id,
                metadata,
                "{}",
                event.message
            ),
            LogLevel::Debug => tracing::debug!(
                target: "lantern::app",
                trace_id = %ctx.trace_id,
                span_id = %ctx.span_id,
                metadata,
                "{}",
                event.message
            ),
        }
    }
}

/// Application logger: min-level filter plus a set of transports.
///
/// Explicitly constructed and passed around rather than a module global,
/// so multiple instances can coexist in tests.
pub struct Logger {
    min_level: LogLevel,
    transports: Vec<Arc<dyn LogTransport>>,
}

impl Logger {
    /// Create a logger with no transports.
    #[must_use]
    pub fn new(min_level: LogLevel) -> Self {
        Self {
            min_level,
            transports: Vec::new(),
        }
    }

    /// Add a transport.
    #[must_use]
    pub fn with_transport(mut self, transport: Arc<dyn LogTransport>) -> Self {
        self.transports.push(transport);
        self
    }

    /// Build the standard logger for a service: console plus OTLP export,
    /// filtered at the configured level.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime (the export worker is
    /// spawned here).
    #[must_use]
    pub fn from_config(config: &TelemetryConfig) -> Self {
        let exporter = OtlpLogExporter::spawn(
            config.logs_endpoint.clone(),
            config.resource(),
            config.export_queue_size,
        );
        Self::new(LogLevel::parse_or_info(&config.log_level))
            .with_transport(Arc::new(ConsoleTransport))
            .with_transport(Arc::new(exporter))
    }

    /// Emit an event at the given level.
    ///
    /// Reads the ambient trace context once, synchronously, so the record
    /// is attributed to the span active at this moment regardless of when
    /// the transports finish their work.
    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        self.emit(LogEvent::new(level, message));
    }

    /// Emit an event with ordered structured metadata.
    pub fn log_with(
        &self,
        level: LogLevel,
        message: impl Into<String>,
        metadata: Vec<(String, Value)>,
    ) {
        self.emit(LogEvent::new(level, message).with_metadata(metadata));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    /// Emit an error event carrying stack text.
    pub fn error_with_stack(&self, message: impl Into<String>, stack: impl Into<String>) {
        self.emit(LogEvent::new(LogLevel::Error, message).with_stack(stack));
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.log(LogLevel::Warn, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    pub fn debug(&self, message: impl Into<String>) {
        self.log(LogLevel::Debug, message);
    }

    fn emit(&self, event: LogEvent) {
        if event.level.rank() < self.min_level.rank() {
            return;
        }
        let ctx = current_trace_context();
        for transport in &self.transports {
            transport.transport(&event, &ctx);
        }
    }
}
