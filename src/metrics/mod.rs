//! Metrics collection and export.
//!
//! Instruments live in an explicitly constructed [`registry::MetricsRegistry`];
//! request middleware records outcomes into it, gauge callbacks pull
//! system samples from [`system::SystemSampler`] at collection time, and
//! [`exporter::MetricsExporter`] drives the periodic collection passes.

pub mod encoder;
pub mod exporter;
pub mod instrument;
pub mod registry;
pub mod system;

pub use exporter::MetricsExporter;
pub use instrument::{Collect, Counter, Histogram, MetricData, MetricSnapshot, ObservableGauge};
pub use registry::{ConnectionGuard, MetricsRegistry, DURATION_BOUNDARIES};
pub use system::SystemSampler;
