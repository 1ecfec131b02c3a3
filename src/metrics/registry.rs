//! Metric instruments registry.
//!
//! Key metrics:
//! - `lantern_http_requests_total`: counter for HTTP requests
//! - `lantern_http_errors_total`: counter for 4xx/5xx responses
//! - `lantern_http_request_duration_seconds`: request latency histogram
//! - `lantern_cpu_usage_percent`: CPU usage gauge
//! - `lantern_memory_usage_bytes` / `lantern_memory_usage_percent`: memory gauges
//! - `lantern_active_connections`: in-flight connection gauge
//! - `lantern_uptime_seconds`: process uptime gauge
//!
//! The registry is an explicitly constructed object passed to whatever
//! records requests, not a module-level global, so multiple instances
//! can coexist in tests.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use uuid::Uuid;

use super::instrument::{Collect, Counter, Histogram, MetricSnapshot, ObservableGauge};
use super::system::SystemSampler;

/// Request duration bucket boundaries in seconds, fixed at creation.
pub const DURATION_BOUNDARIES: [f64; 14] = [
    0.005, 0.01, 0.025, 0.05, 0.075, 0.1, 0.25, 0.5, 0.75, 1.0, 2.5, 5.0, 7.5, 10.0,
];

/// Registry owning every instrument for one service instance.
pub struct MetricsRegistry {
    /// Total number of HTTP requests
    pub http_requests_total: Counter,
    /// Total number of HTTP error responses
    pub http_errors_total: Counter,
    /// Duration of HTTP requests in seconds
    pub http_request_duration: Histogram,
    gauges: Vec<ObservableGauge>,
    connections: Arc<Mutex<HashSet<String>>>,
    sampler: Arc<SystemSampler>,
}

impl MetricsRegistry {
    /// Create the registry and declare every instrument exactly once.
    #[must_use]
    pub fn new() -> Self {
        let sampler = Arc::new(SystemSampler::new());
        let connections: Arc<Mutex<HashSet<String>>> = Arc::new(Mutex::new(HashSet::new()));

        let cpu_sampler = sampler.clone();
        let memory_sampler = sampler.clone();
        let percent_sampler = sampler.clone();
        let uptime_sampler = sampler.clone();
        let gauge_connections = connections.clone();

        let gauges = vec![
            ObservableGauge::new(
                "lantern_cpu_usage_percent",
                "CPU usage percentage",
                move |observer| {
                    if let Some(percent) = cpu_sampler.cpu_percent() {
                        observer.observe(percent, &[("type", "user_system")]);
                    }
                },
            ),
            ObservableGauge::new(
                "lantern_memory_usage_bytes",
                "Memory usage in bytes",
                move |observer| {
                    for (kind, bytes) in memory_sampler.memory_observations() {
                        observer.observe(bytes, &[("type", kind)]);
                    }
                },
            ),
            ObservableGauge::new(
                "lantern_memory_usage_percent",
                "Resident set size as a percentage of total physical memory",
                move |observer| {
                    if let Some(percent) = percent_sampler.memory_percent() {
                        observer.observe(percent, &[("type", "system")]);
                    }
                },
            ),
            ObservableGauge::new(
                "lantern_active_connections",
                "Number of active HTTP connections",
                move |observer| {
                    let count = gauge_connections.lock().expect("connections lock").len();
                    observer.observe(count as f64, &[]);
                },
            ),
            ObservableGauge::new(
                "lantern_uptime_seconds",
                "Application uptime in seconds",
                move |observer| {
                    observer.observe(uptime_sampler.uptime_seconds(), &[]);
                },
            ),
        ];

        Self {
            http_requests_total: Counter::new(
                "lantern_http_requests_total",
                "Total number of HTTP requests",
            ),
            http_errors_total: Counter::new(
                "lantern_http_errors_total",
                "Total number of HTTP error responses",
            ),
            http_request_duration: Histogram::new(
                "lantern_http_request_duration_seconds",
                "Duration of HTTP requests in seconds",
                DURATION_BOUNDARIES.to_vec(),
            ),
            gauges,
            connections,
            sampler,
        }
    }

    /// Record one completed request.
    ///
    /// Increments the request counter, increments the error counter with
    /// an `error_type` of `4xx`/`5xx` when the status is an error, and
    /// records the duration (converted from milliseconds to seconds)
    /// into the latency histogram. Safe to call from any number of
    /// in-flight requests concurrently.
    pub fn record_http_request(
        &self,
        method: &str,
        endpoint: &str,
        status_code: u16,
        duration_millis: f64,
    ) {
        let status = status_code.to_string();
        let labels: [(&str, &str); 3] = [
            ("method", method),
            ("endpoint", endpoint),
            ("status_code", &status),
        ];

        self.http_requests_total.add(1, &labels);

        if status_code >= 400 {
            let error_type = if status_code >= 500 { "5xx" } else { "4xx" };
            let error_labels: [(&str, &str); 4] = [
                ("method", method),
                ("endpoint", endpoint),
                ("status_code", &status),
                ("error_type", error_type),
            ];
            self.http_errors_total.add(1, &error_labels);
        }

        self.http_request_duration
            .record(duration_millis / 1000.0, &labels);
    }

    /// Track a new connection.
    ///
    /// Adding an id that is already tracked is a caller error: it is
    /// logged and ignored, so the set still holds the id exactly once.
    pub fn add_connection(&self, id: &str) {
        let mut connections = self.connections.lock().expect("connections lock");
        if !connections.insert(id.to_string()) {
            tracing::warn!(connection_id = id, "Connection id added twice");
        }
    }

    /// Stop tracking a connection. Removing an id that was never added
    /// (or was already removed) is a no-op.
    pub fn remove_connection(&self, id: &str) {
        let mut connections = self.connections.lock().expect("connections lock");
        if !connections.remove(id) {
            tracing::debug!(connection_id = id, "Removed connection was not tracked");
        }
    }

    /// Current number of tracked connections.
    #[must_use]
    pub fn active_connections(&self) -> usize {
        self.connections.lock().expect("connections lock").len()
    }

    /// Seconds since this registry's sampler was constructed.
    #[must_use]
    pub fn uptime_seconds(&self) -> f64 {
        self.sampler.uptime_seconds()
    }

    /// Snapshot every instrument for export.
    ///
    /// Gauge callbacks run just-in-time within this pass. Collection is
    /// expected to be driven by one external periodic exporter at a
    /// time; instruments themselves are safe against concurrent updates
    /// throughout.
    #[must_use]
    pub fn collect(&self) -> Vec<MetricSnapshot> {
        let mut snapshots = Vec::with_capacity(3 + self.gauges.len());
        snapshots.push(self.http_requests_total.collect());
        snapshots.push(self.http_errors_total.collect());
        snapshots.push(self.http_request_duration.collect());
        for gauge in &self.gauges {
            snapshots.push(gauge.collect());
        }
        snapshots
    }
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII guard pairing one connection add with exactly one remove.
///
/// Created at request start; dropping it (request end, including early
/// returns and panics) removes the connection.
pub struct ConnectionGuard {
    registry: Arc<MetricsRegistry>,
    id: String,
}

impl ConnectionGuard {
    /// Register a new connection with a generated time-sortable id.
    #[must_use]
    pub fn new(registry: Arc<MetricsRegistry>) -> Self {
        let id = Uuid::now_v7().to_string();
        registry.add_connection(&id);
        Self { registry, id }
    }

    /// The generated connection id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.registry.remove_connection(&self.id);
    }
}
