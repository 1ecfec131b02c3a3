//! Fire-and-forget OTLP log export.
//!
//! A bounded queue feeds one background worker that encodes and POSTs
//! each record to the collector. The logging call site never waits on
//! network I/O: `submit` hands the record to the queue and returns.
//! Delivery is at-most-once and best-effort; transport failures are
//! reported to the diagnostic channel and discarded (no retry, no
//! buffering).

use std::time::Duration;

use tokio::sync::mpsc::{self, error::TrySendError};

use crate::resource::ResourceDescriptor;

use super::context::TraceContext;
use super::encoder::encode;
use super::event::LogEvent;
use super::LogTransport;

/// Timeout applied to each export request so a hung collector cannot pin
/// the worker.
const EXPORT_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors at the export transport boundary.
///
/// These never propagate to log call sites; the worker logs and drops
/// them.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("http transport: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("collector returned status {0}")]
    Status(reqwest::StatusCode),
}

/// One queued export: the event plus the trace context captured at
/// emission time.
#[derive(Debug)]
struct ExportItem {
    event: LogEvent,
    ctx: TraceContext,
}

/// Non-blocking OTLP/HTTP log exporter.
///
/// Dropping the exporter (and any clones of it) closes the queue; the
/// worker drains what it already holds and exits. Shutdown stops new
/// exports from being scheduled but does not await in-flight ones.
#[derive(Clone)]
pub struct OtlpLogExporter {
    tx: mpsc::Sender<ExportItem>,
}

impl OtlpLogExporter {
    /// Spawn the export worker and return a handle for submitting
    /// records.
    ///
    /// # Arguments
    ///
    /// * `endpoint` - Collector logs URL (e.g. `http://host:4318/v1/logs`)
    /// * `resource` - Resource attributes stamped on every envelope
    /// * `queue_size` - Queue capacity; records beyond it are dropped.
    ///   A capacity of 0 is clamped to 1 so a misconfigured queue size
    ///   cannot crash the instrumented service.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    #[must_use]
    pub fn spawn(endpoint: String, resource: ResourceDescriptor, queue_size: usize) -> Self {
        let (tx, mut rx) = mpsc::channel::<ExportItem>(queue_size.max(1));

        tokio::spawn(async move {
            let client = reqwest::Client::builder()
                .timeout(EXPORT_TIMEOUT)
                .build()
                .unwrap_or_default();

            while let Some(item) = rx.recv().await {
                if let Err(e) = export_one(&client, &endpoint, &resource, &item).await {
                    tracing::warn!(error = %e, endpoint = %endpoint, "Failed to send log to OTLP collector");
                }
            }
            tracing::debug!("Log export worker stopped");
        });

        Self { tx }
    }

    /// Queue one record for export. Never blocks.
    ///
    /// When the queue is full the record is dropped (drop-newest) and a
    /// warning is emitted; when the worker has stopped the record is
    /// silently discarded.
    pub fn submit(&self, event: LogEvent, ctx: TraceContext) {
        match self.tx.try_send(ExportItem { event, ctx }) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                tracing::warn!("Log export queue full, dropping record");
            }
            Err(TrySendError::Closed(_)) => {
                tracing::debug!("Log export worker gone, dropping record");
            }
        }
    }
}

impl LogTransport for OtlpLogExporter {
    fn transport(&self, event: &LogEvent, ctx: &TraceContext) {
        self.submit(event.clone(), ctx.clone());
    }
}

/// Encode and POST a single record.
async fn export_one(
    client: &reqwest::Client,
    endpoint: &str,
    resource: &ResourceDescriptor,
    item: &ExportItem,
) -> Result<(), ExportError> {
    let payload = encode(&item.event, &item.ctx, resource);
    let response = client.post(endpoint).json(&payload).send().await?;
    if !response.status().is_success() {
        return Err(ExportError::Status(response.status()));
    }
    Ok(())
}
