//! End-to-end tests for periodic metrics collection and export.

mod common;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use lantern::metrics::{MetricsExporter, MetricsRegistry};
use lantern::resource::ResourceDescriptor;

#[tokio::test]
async fn test_exporter_posts_all_instruments() {
    let collector = common::MockCollector::start().await;

    let registry = Arc::new(MetricsRegistry::new());
    registry.record_http_request("GET", "/api/users", 200, 15.0);
    registry.record_http_request("GET", "/api/error", 500, 8.0);
    registry.add_connection("c1");

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let exporter = MetricsExporter::spawn(
        registry.clone(),
        ResourceDescriptor::new("lantern-test", "0.0.0"),
        collector.metrics_url(),
        Duration::from_millis(100),
        shutdown_rx,
    );

    assert!(
        common::wait_for(Duration::from_secs(5), || collector.metric_count() >= 1).await,
        "collector never received a metrics payload"
    );
    shutdown_tx.send(true).expect("signal shutdown");
    exporter.join().await;

    let payload = &collector.metrics()[0];
    let metrics = payload["resourceMetrics"][0]["scopeMetrics"][0]["metrics"]
        .as_array()
        .expect("metrics array");
    let names: Vec<&str> = metrics
        .iter()
        .map(|m| m["name"].as_str().expect("metric name"))
        .collect();

    for expected in [
        "lantern_http_requests_total",
        "lantern_http_errors_total",
        "lantern_http_request_duration_seconds",
        "lantern_cpu_usage_percent",
        "lantern_memory_usage_bytes",
        "lantern_memory_usage_percent",
        "lantern_active_connections",
        "lantern_uptime_seconds",
    ] {
        assert!(names.contains(&expected), "missing {expected} in {names:?}");
    }

    // Counters export as cumulative monotonic sums with string ints.
    let requests = metrics
        .iter()
        .find(|m| m["name"] == "lantern_http_requests_total")
        .expect("requests metric");
    assert_eq!(requests["sum"]["isMonotonic"], true);
    assert_eq!(requests["sum"]["aggregationTemporality"], 2);
    let points = requests["sum"]["dataPoints"].as_array().expect("points");
    assert_eq!(points.len(), 2);
    assert_eq!(points[0]["asInt"], "1");

    // The histogram carries the fourteen configured boundaries.
    let duration = metrics
        .iter()
        .find(|m| m["name"] == "lantern_http_request_duration_seconds")
        .expect("duration metric");
    let bounds = duration["histogram"]["dataPoints"][0]["explicitBounds"]
        .as_array()
        .expect("bounds");
    assert_eq!(bounds.len(), 14);
    assert_eq!(bounds[0], 0.005);
    assert_eq!(bounds[13], 10.0);

    // The connection added before the pass is visible in the gauge.
    let connections = metrics
        .iter()
        .find(|m| m["name"] == "lantern_active_connections")
        .expect("connections metric");
    assert_eq!(connections["gauge"]["dataPoints"][0]["asDouble"], 1.0);

    // Resource attributes ride along on the metrics envelope too.
    let resource_attrs = &payload["resourceMetrics"][0]["resource"]["attributes"];
    assert_eq!(resource_attrs[0]["key"], "service.name");
    assert_eq!(resource_attrs[0]["value"]["stringValue"], "lantern-test");
}

#[tokio::test]
async fn test_unreachable_collector_keeps_collecting() {
    let registry = Arc::new(MetricsRegistry::new());
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let exporter = MetricsExporter::spawn(
        registry.clone(),
        ResourceDescriptor::default(),
        "http://127.0.0.1:1/v1/metrics".to_string(),
        Duration::from_millis(50),
        shutdown_rx,
    );

    // Several failed passes later the registry still records normally.
    tokio::time::sleep(Duration::from_millis(250)).await;
    registry.record_http_request("GET", "/still/alive", 200, 1.0);
    assert_eq!(
        registry.http_requests_total.value(&[
            ("method", "GET"),
            ("endpoint", "/still/alive"),
            ("status_code", "200"),
        ]),
        1
    );

    shutdown_tx.send(true).expect("signal shutdown");
    exporter.join().await;
}

#[tokio::test]
async fn test_gauge_values_refresh_between_passes() {
    let collector = common::MockCollector::start().await;
    let registry = Arc::new(MetricsRegistry::new());
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let exporter = MetricsExporter::spawn(
        registry.clone(),
        ResourceDescriptor::default(),
        collector.metrics_url(),
        Duration::from_millis(100),
        shutdown_rx,
    );

    registry.add_connection("c1");
    assert!(common::wait_for(Duration::from_secs(5), || collector.metric_count() >= 1).await);

    registry.remove_connection("c1");
    // Two more passes guarantee at least one collection started after
    // the removal (one may already have been in flight).
    let seen = collector.metric_count();
    assert!(
        common::wait_for(Duration::from_secs(5), || collector.metric_count() >= seen + 2).await,
        "no post-removal collection pass arrived"
    );
    shutdown_tx.send(true).expect("signal shutdown");
    exporter.join().await;

    let last = collector.metrics().last().cloned().expect("payload");
    let metrics = last["resourceMetrics"][0]["scopeMetrics"][0]["metrics"]
        .as_array()
        .expect("metrics array")
        .clone();
    let connections = metrics
        .iter()
        .find(|m| m["name"] == "lantern_active_connections")
        .expect("connections metric");
    assert_eq!(connections["gauge"]["dataPoints"][0]["asDouble"], 0.0);
}
