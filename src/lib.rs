//! Lantern: OTLP telemetry emission core for HTTP services.
//!
//! Lantern converts application log events into OTLP `LogRecord` payloads
//! enriched with the active trace/span context and ships them over HTTP
//! without blocking the caller. It also maintains a metrics registry
//! (counters, a latency histogram, and observable gauges for derived
//! system metrics) that is collected and exported on a fixed interval.
//!
//! # Architecture
//!
//! - **Fire-and-forget log export**: a bounded queue feeds one background
//!   worker; log call sites never wait on network I/O
//! - **Point-in-time trace attribution**: trace/span ids are read at the
//!   moment of emission, not when the export runs
//! - **Pull-based gauges**: observable gauges are computed on demand at
//!   collection time, never on a private timer
//! - **Failure isolation**: export and sampling failures are reported to
//!   the diagnostic channel and swallowed; the instrumented service is
//!   never affected
//!
//! # Modules
//!
//! - [`config`]: environment-style configuration
//! - [`diagnostics`]: diagnostic channel (tracing subscriber) setup
//! - [`logging`]: log events, severity mapping, OTLP encoding, export
//! - [`metrics`]: instruments, registry, system sampler, periodic export
//! - [`otlp`]: shared OTLP JSON attribute types
//! - [`resource`]: process-wide resource attributes

// Lint configuration
#![warn(clippy::all)]
#![allow(
    clippy::module_name_repetitions, // metrics::registry::MetricsRegistry is fine
    clippy::must_use_candidate,      // Not all functions need #[must_use]
    clippy::missing_errors_doc,      // Error docs can be verbose
    clippy::cast_precision_loss      // u64 -> f64 sample values are fine
)]

pub mod config;
pub mod diagnostics;
pub mod logging;
pub mod metrics;
pub mod otlp;
pub mod resource;

/// Get the current Unix timestamp in nanoseconds, as the decimal string
/// form OTLP/JSON uses for `timeUnixNano`.
#[must_use]
pub fn now_unix_nanos() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos()
        .to_string()
}

/// Convert a wall-clock timestamp to nanoseconds since the Unix epoch,
/// as a decimal string. Timestamps before the epoch render as "0".
#[must_use]
pub fn unix_nanos(ts: std::time::SystemTime) -> String {
    ts.duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos()
        .to_string()
}
