//! Application log events.

use std::time::SystemTime;

use serde_json::Value;

use super::severity::LogLevel;

/// A single application log event.
///
/// Immutable once created: the timestamp is captured at construction
/// (emission time), so asynchronous delivery cannot skew it. Metadata
/// preserves insertion order, which the encoder carries through to the
/// OTLP attribute list.
#[derive(Debug, Clone)]
pub struct LogEvent {
    /// Wall-clock time of emission
    pub timestamp: SystemTime,
    /// Log level
    pub level: LogLevel,
    /// Log message body
    pub message: String,
    /// Structured metadata in insertion order
    pub metadata: Vec<(String, Value)>,
    /// Optional stack text (error events)
    pub stack: Option<String>,
}

impl LogEvent {
    /// Create an event stamped with the current wall-clock time.
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp: SystemTime::now(),
            level,
            message: message.into(),
            metadata: Vec::new(),
            stack: None,
        }
    }

    /// Attach ordered structured metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Vec<(String, Value)>) -> Self {
        self.metadata = metadata;
        self
    }

    /// Attach stack text.
    #[must_use]
    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_preserves_metadata_order() {
        let event = LogEvent::new(LogLevel::Info, "hello").with_metadata(vec![
            ("zebra".into(), json!("z")),
            ("alpha".into(), json!(1)),
        ]);
        assert_eq!(event.metadata[0].0, "zebra");
        assert_eq!(event.metadata[1].0, "alpha");
    }

    #[test]
    fn test_event_timestamp_is_emission_time() {
        let before = SystemTime::now();
        let event = LogEvent::new(LogLevel::Debug, "t");
        let after = SystemTime::now();
        assert!(event.timestamp >= before && event.timestamp <= after);
    }
}
