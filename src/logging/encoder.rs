//! OTLP log record encoding.
//!
//! Builds one `resourceLogs[].scopeLogs[].logRecords[]` envelope per log
//! event. The payload is self-contained and schema-stable whether or not
//! trace context is present: the top-level `traceId`/`spanId` fields are
//! always serialized (empty string when absent) while the `trace_id` and
//! `span_id` attributes appear only when non-empty.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::otlp::{AnyValue, KeyValue, Resource, Scope};
use crate::resource::ResourceDescriptor;
use crate::unix_nanos;

use super::context::TraceContext;
use super::event::LogEvent;

/// Instrumentation scope name stamped on every envelope.
pub const SCOPE_NAME: &str = "lantern-logger";

/// Top-level OTLP/JSON logs export payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportLogsPayload {
    #[serde(rename = "resourceLogs")]
    pub resource_logs: Vec<ResourceLogs>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLogs {
    pub resource: Resource,
    #[serde(rename = "scopeLogs")]
    pub scope_logs: Vec<ScopeLogs>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeLogs {
    pub scope: Scope,
    #[serde(rename = "logRecords")]
    pub log_records: Vec<LogRecord>,
}

/// A single OTLP log record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    #[serde(rename = "timeUnixNano")]
    pub time_unix_nano: String,
    #[serde(rename = "severityNumber")]
    pub severity_number: u32,
    #[serde(rename = "severityText")]
    pub severity_text: String,
    pub body: AnyValue,
    #[serde(rename = "traceId")]
    pub trace_id: String,
    #[serde(rename = "spanId")]
    pub span_id: String,
    pub attributes: Vec<KeyValue>,
}

/// Canonicalize a metadata value to attribute text.
///
/// Strings pass through unquoted; everything else becomes its JSON form.
fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Encode one log event into an OTLP logs payload.
///
/// Pure with respect to its inputs: the trace context is an explicit
/// snapshot taken at emission time, and the timestamp comes from the
/// event itself. Encoding never fails; malformed metadata is coerced to
/// text.
///
/// Attribute order: `log.level`, then `trace_id`/`span_id` when present,
/// then metadata entries in their original order, then
/// `exception.stacktrace` when the event carries stack text.
#[must_use]
pub fn encode(
    event: &LogEvent,
    ctx: &TraceContext,
    resource: &ResourceDescriptor,
) -> ExportLogsPayload {
    let mut attributes =
        Vec::with_capacity(3 + event.metadata.len() + usize::from(event.stack.is_some()));
    attributes.push(KeyValue::string("log.level", event.level.as_str()));
    if !ctx.trace_id.is_empty() {
        attributes.push(KeyValue::string("trace_id", &ctx.trace_id));
    }
    if !ctx.span_id.is_empty() {
        attributes.push(KeyValue::string("span_id", &ctx.span_id));
    }
    for (key, value) in &event.metadata {
        attributes.push(KeyValue::string(key, value_to_text(value)));
    }
    if let Some(stack) = &event.stack {
        attributes.push(KeyValue::string("exception.stacktrace", stack));
    }

    let record = LogRecord {
        time_unix_nano: unix_nanos(event.timestamp),
        severity_number: event.level.severity_number(),
        severity_text: event.level.severity_text().to_string(),
        body: AnyValue::string(&event.message),
        trace_id: ctx.trace_id.clone(),
        span_id: ctx.span_id.clone(),
        attributes,
    };

    ExportLogsPayload {
        resource_logs: vec![ResourceLogs {
            resource: Resource {
                attributes: resource.attributes(),
            },
            scope_logs: vec![ScopeLogs {
                scope: Scope {
                    name: SCOPE_NAME.to_string(),
                },
                log_records: vec![record],
            }],
        }],
    }
}
