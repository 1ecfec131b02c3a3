//! Metric instruments.
//!
//! Instruments are created once at startup and referenced by stable
//! identity (their name) thereafter. Counters and histograms accumulate
//! across the process lifetime; observable gauges compute their value on
//! demand when a collection pass asks for it.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Mutex;

/// Ordered label pairs identifying one series of an instrument.
pub type Labels = Vec<(String, String)>;

/// Convert borrowed label pairs to an owned label set.
#[must_use]
pub fn labels(pairs: &[(&str, &str)]) -> Labels {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

/// Accumulated state of one histogram series.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramData {
    /// Per-bucket counts; one more entry than boundaries (overflow bucket)
    pub bucket_counts: Vec<u64>,
    /// Sum of recorded values
    pub sum: f64,
    /// Number of recorded values
    pub count: u64,
}

/// Point-in-time values collected from one instrument.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricData {
    /// Monotonic sums per label set
    Counter(Vec<(Labels, u64)>),
    /// On-demand samples per label set
    Gauge(Vec<(Labels, f64)>),
    /// Distributions per label set
    Histogram {
        boundaries: Vec<f64>,
        series: Vec<(Labels, HistogramData)>,
    },
}

/// Snapshot of one instrument for export.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSnapshot {
    pub name: String,
    pub description: String,
    pub data: MetricData,
}

/// Pull-on-collection interface implemented by every instrument.
pub trait Collect: Send + Sync {
    /// Snapshot current values. For observable gauges this invokes the
    /// registered callback; for counters and histograms it copies the
    /// accumulated state.
    fn collect(&self) -> MetricSnapshot;
}

/// Monotonic counter.
///
/// Negative increments are a caller error: they are rejected and logged,
/// never applied, so the stored sum is exactly the sum of accepted
/// deltas.
pub struct Counter {
    name: String,
    description: String,
    series: Mutex<HashMap<Labels, u64>>,
}

impl Counter {
    /// Create a counter. Identity is the name; create it once.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            series: Mutex::new(HashMap::new()),
        }
    }

    /// Add `delta` to the series identified by `label_pairs`.
    pub fn add(&self, delta: i64, label_pairs: &[(&str, &str)]) {
        if delta < 0 {
            tracing::warn!(
                counter = %self.name,
                delta,
                "Rejected negative counter increment"
            );
            return;
        }
        let mut series = self.series.lock().expect("counter lock");
        *series.entry(labels(label_pairs)).or_insert(0) += delta as u64;
    }

    /// Current value of one series (0 when never incremented).
    #[must_use]
    pub fn value(&self, label_pairs: &[(&str, &str)]) -> u64 {
        self.series
            .lock()
            .expect("counter lock")
            .get(&labels(label_pairs))
            .copied()
            .unwrap_or(0)
    }
}

impl Collect for Counter {
    fn collect(&self) -> MetricSnapshot {
        let series = self.series.lock().expect("counter lock");
        let mut data: Vec<(Labels, u64)> =
            series.iter().map(|(k, v)| (k.clone(), *v)).collect();
        data.sort();
        MetricSnapshot {
            name: self.name.clone(),
            description: self.description.clone(),
            data: MetricData::Counter(data),
        }
    }
}

/// Histogram with bucket boundaries fixed at creation.
pub struct Histogram {
    name: String,
    description: String,
    boundaries: Vec<f64>,
    series: Mutex<HashMap<Labels, HistogramData>>,
}

impl Histogram {
    /// Create a histogram. `boundaries` must be sorted ascending.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        boundaries: Vec<f64>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            boundaries,
            series: Mutex::new(HashMap::new()),
        }
    }

    /// Record one observation into the series identified by
    /// `label_pairs`.
    ///
    /// NaN observations are a caller error: they are rejected and
    /// logged, never applied, so the accumulated sum stays a number.
    pub fn record(&self, value: f64, label_pairs: &[(&str, &str)]) {
        if value.is_nan() {
            tracing::warn!(
                histogram = %self.name,
                "Rejected NaN histogram observation"
            );
            return;
        }
        let bucket = self
            .boundaries
            .iter()
            .position(|b| value <= *b)
            .unwrap_or(self.boundaries.len());

        let mut series = self.series.lock().expect("histogram lock");
        let data = series.entry(labels(label_pairs)).or_insert_with(|| HistogramData {
            bucket_counts: vec![0; self.boundaries.len() + 1],
            sum: 0.0,
            count: 0,
        });
        data.bucket_counts[bucket] += 1;
        data.sum += value;
        data.count += 1;
    }

    /// Accumulated state of one series, if it has any observations.
    #[must_use]
    pub fn series_data(&self, label_pairs: &[(&str, &str)]) -> Option<HistogramData> {
        self.series
            .lock()
            .expect("histogram lock")
            .get(&labels(label_pairs))
            .cloned()
    }

    /// The bucket boundaries fixed at creation.
    #[must_use]
    pub fn boundaries(&self) -> &[f64] {
        &self.boundaries
    }
}

impl Collect for Histogram {
    fn collect(&self) -> MetricSnapshot {
        let series = self.series.lock().expect("histogram lock");
        let mut data: Vec<(Labels, HistogramData)> =
            series.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        data.sort_by(|a, b| a.0.cmp(&b.0));
        MetricSnapshot {
            name: self.name.clone(),
            description: self.description.clone(),
            data: MetricData::Histogram {
                boundaries: self.boundaries.clone(),
                series: data,
            },
        }
    }
}

/// Sink passed to gauge callbacks at collection time.
#[derive(Debug, Default)]
pub struct GaugeObserver {
    samples: Vec<(Labels, f64)>,
}

impl GaugeObserver {
    /// Report one observation.
    pub fn observe(&mut self, value: f64, label_pairs: &[(&str, &str)]) {
        self.samples.push((labels(label_pairs), value));
    }
}

/// Gauge whose value is computed on demand at collection time.
///
/// The callback runs only when a collection pass invokes it; the gauge
/// owns no timer. A panicking callback is caught and logged so one
/// failing gauge cannot suppress the others in the same pass.
pub struct ObservableGauge {
    name: String,
    description: String,
    callback: Box<dyn Fn(&mut GaugeObserver) + Send + Sync>,
}

impl ObservableGauge {
    /// Create a gauge with its collection callback.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        callback: impl Fn(&mut GaugeObserver) + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            callback: Box::new(callback),
        }
    }
}

impl Collect for ObservableGauge {
    fn collect(&self) -> MetricSnapshot {
        let mut observer = GaugeObserver::default();
        let result = catch_unwind(AssertUnwindSafe(|| (self.callback)(&mut observer)));
        if result.is_err() {
            tracing::warn!(gauge = %self.name, "Gauge callback panicked during collection");
            observer.samples.clear();
        }
        MetricSnapshot {
            name: self.name.clone(),
            description: self.description.clone(),
            data: MetricData::Gauge(observer.samples),
        }
    }
}
