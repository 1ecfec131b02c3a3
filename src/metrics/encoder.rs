//! OTLP metrics encoding.
//!
//! Builds the `resourceMetrics[].scopeMetrics[].metrics[]` envelope for
//! one collection pass. Counters become cumulative monotonic sums,
//! observable gauges become gauge data points, and the duration
//! histogram becomes cumulative histogram data points. Per the OTLP JSON
//! mapping, 64-bit integer values are carried as decimal strings.

use serde::{Deserialize, Serialize};

use crate::otlp::{KeyValue, Resource, Scope};
use crate::resource::ResourceDescriptor;

use super::instrument::{Labels, MetricData, MetricSnapshot};

/// Instrumentation scope name stamped on every envelope.
pub const SCOPE_NAME: &str = "lantern-metrics";

/// Cumulative aggregation temporality per the OTLP enum.
const AGGREGATION_TEMPORALITY_CUMULATIVE: u32 = 2;

/// Top-level OTLP/JSON metrics export payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportMetricsPayload {
    #[serde(rename = "resourceMetrics")]
    pub resource_metrics: Vec<ResourceMetrics>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceMetrics {
    pub resource: Resource,
    #[serde(rename = "scopeMetrics")]
    pub scope_metrics: Vec<ScopeMetrics>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScopeMetrics {
    pub scope: Scope,
    pub metrics: Vec<Metric>,
}

/// One exported metric: exactly one of `sum`, `gauge`, `histogram` set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sum: Option<Sum>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gauge: Option<Gauge>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub histogram: Option<HistogramMetric>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sum {
    #[serde(rename = "dataPoints")]
    pub data_points: Vec<NumberDataPoint>,
    #[serde(rename = "aggregationTemporality")]
    pub aggregation_temporality: u32,
    #[serde(rename = "isMonotonic")]
    pub is_monotonic: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gauge {
    #[serde(rename = "dataPoints")]
    pub data_points: Vec<NumberDataPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramMetric {
    #[serde(rename = "dataPoints")]
    pub data_points: Vec<HistogramDataPoint>,
    #[serde(rename = "aggregationTemporality")]
    pub aggregation_temporality: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberDataPoint {
    pub attributes: Vec<KeyValue>,
    #[serde(rename = "timeUnixNano")]
    pub time_unix_nano: String,
    #[serde(rename = "asInt", default, skip_serializing_if = "Option::is_none")]
    pub as_int: Option<String>,
    #[serde(rename = "asDouble", default, skip_serializing_if = "Option::is_none")]
    pub as_double: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramDataPoint {
    pub attributes: Vec<KeyValue>,
    #[serde(rename = "timeUnixNano")]
    pub time_unix_nano: String,
    pub count: String,
    pub sum: f64,
    #[serde(rename = "bucketCounts")]
    pub bucket_counts: Vec<String>,
    #[serde(rename = "explicitBounds")]
    pub explicit_bounds: Vec<f64>,
}

fn attributes_for(labels: &Labels) -> Vec<KeyValue> {
    labels
        .iter()
        .map(|(k, v)| KeyValue::string(k, v))
        .collect()
}

/// Encode one collection pass into an OTLP metrics payload.
///
/// `time_unix_nano` is the collection timestamp, stamped on every data
/// point so the whole pass shares one instant.
#[must_use]
pub fn encode_metrics(
    snapshots: &[MetricSnapshot],
    resource: &ResourceDescriptor,
    time_unix_nano: &str,
) -> ExportMetricsPayload {
    let metrics = snapshots
        .iter()
        .map(|snapshot| {
            let mut metric = Metric {
                name: snapshot.name.clone(),
                description: snapshot.description.clone(),
                sum: None,
                gauge: None,
                histogram: None,
            };
            match &snapshot.data {
                MetricData::Counter(series) => {
                    metric.sum = Some(Sum {
                        data_points: series
                            .iter()
                            .map(|(labels, value)| NumberDataPoint {
                                attributes: attributes_for(labels),
                                time_unix_nano: time_unix_nano.to_string(),
                                as_int: Some(value.to_string()),
                                as_double: None,
                            })
                            .collect(),
                        aggregation_temporality: AGGREGATION_TEMPORALITY_CUMULATIVE,
                        is_monotonic: true,
                    });
                }
                MetricData::Gauge(samples) => {
                    metric.gauge = Some(Gauge {
                        data_points: samples
                            .iter()
                            .map(|(labels, value)| NumberDataPoint {
                                attributes: attributes_for(labels),
                                time_unix_nano: time_unix_nano.to_string(),
                                as_int: None,
                                as_double: Some(*value),
                            })
                            .collect(),
                    });
                }
                MetricData::Histogram { boundaries, series } => {
                    metric.histogram = Some(HistogramMetric {
                        data_points: series
                            .iter()
                            .map(|(labels, data)| HistogramDataPoint {
                                attributes: attributes_for(labels),
                                time_unix_nano: time_unix_nano.to_string(),
                                count: data.count.to_string(),
                                sum: data.sum,
                                bucket_counts: data
                                    .bucket_counts
                                    .iter()
                                    .map(ToString::to_string)
                                    .collect(),
                                explicit_bounds: boundaries.clone(),
                            })
                            .collect(),
                        aggregation_temporality: AGGREGATION_TEMPORALITY_CUMULATIVE,
                    });
                }
            }
            metric
        })
        .collect();

    ExportMetricsPayload {
        resource_metrics: vec![ResourceMetrics {
            resource: Resource {
                attributes: resource.attributes(),
            },
            scope_metrics: vec![ScopeMetrics {
                scope: Scope {
                    name: SCOPE_NAME.to_string(),
                },
                metrics,
            }],
        }],
    }
}
