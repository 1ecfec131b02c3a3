//! Periodic OTLP metrics export.
//!
//! One background task owns the collection cadence: on each tick it runs
//! a collection pass over the registry (which invokes the gauge
//! callbacks just-in-time) and POSTs the encoded snapshot to the
//! collector. Transport failures are logged and discarded; the next tick
//! starts fresh.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::now_unix_nanos;
use crate::resource::ResourceDescriptor;

use super::encoder::encode_metrics;
use super::registry::MetricsRegistry;

/// Timeout applied to each export request.
const EXPORT_TIMEOUT: Duration = Duration::from_secs(10);

/// Handle to the periodic metrics export task.
pub struct MetricsExporter {
    task: JoinHandle<()>,
}

impl MetricsExporter {
    /// Spawn the export loop.
    ///
    /// # Arguments
    ///
    /// * `registry` - Registry to collect from on each tick
    /// * `resource` - Resource attributes stamped on every envelope
    /// * `endpoint` - Collector metrics URL (e.g. `http://host:4318/v1/metrics`)
    /// * `interval` - Collection cadence
    /// * `shutdown_rx` - Stops the loop; in-flight exports are not awaited
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    #[must_use]
    pub fn spawn(
        registry: Arc<MetricsRegistry>,
        resource: ResourceDescriptor,
        endpoint: String,
        interval: Duration,
        mut shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        let task = tokio::spawn(async move {
            let client = reqwest::Client::builder()
                .timeout(EXPORT_TIMEOUT)
                .build()
                .unwrap_or_default();
            let mut ticker = tokio::time::interval(interval);
            // The first tick fires immediately; skip it so the first
            // exported interval matches the configured cadence.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        export_pass(&client, &registry, &resource, &endpoint).await;
                    }
                    _ = shutdown_rx.changed() => {
                        tracing::debug!("Metrics exporter shutting down");
                        break;
                    }
                }
            }
        });

        Self { task }
    }

    /// Wait for the export loop to finish after shutdown was signalled.
    pub async fn join(self) {
        let _ = self.task.await;
    }
}

/// One collection-and-export pass.
async fn export_pass(
    client: &reqwest::Client,
    registry: &MetricsRegistry,
    resource: &ResourceDescriptor,
    endpoint: &str,
) {
    let snapshots = registry.collect();
    let payload = encode_metrics(&snapshots, resource, &now_unix_nanos());

    match client.post(endpoint).json(&payload).send().await {
        Ok(response) if response.status().is_success() => {}
        Ok(response) => {
            tracing::warn!(
                status = %response.status(),
                endpoint = %endpoint,
                "Collector rejected metrics export"
            );
        }
        Err(e) => {
            tracing::warn!(error = %e, endpoint = %endpoint, "Failed to send metrics to OTLP collector");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_shutdown_stops_the_loop() {
        let registry = Arc::new(MetricsRegistry::new());
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let exporter = MetricsExporter::spawn(
            registry,
            ResourceDescriptor::default(),
            "http://127.0.0.1:1/v1/metrics".to_string(),
            Duration::from_secs(3600),
            shutdown_rx,
        );

        shutdown_tx.send(true).expect("signal shutdown");
        // join completes promptly once the shutdown signal lands
        tokio::time::timeout(Duration::from_secs(1), exporter.join())
            .await
            .expect("exporter stopped");
    }
}
