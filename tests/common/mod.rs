//! Test harness for the telemetry core.
//!
//! Provides:
//! - An in-process mock OTLP collector capturing JSON payloads
//! - A wait-for-condition helper for asynchronous delivery

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{extract::State, routing::post, Json, Router};
use serde_json::Value;

/// Payloads captured by the mock collector, per signal.
#[derive(Clone, Default)]
pub struct Received {
    pub logs: Arc<Mutex<Vec<Value>>>,
    pub metrics: Arc<Mutex<Vec<Value>>>,
}

/// In-process OTLP collector accepting `/v1/logs` and `/v1/metrics`.
pub struct MockCollector {
    pub addr: SocketAddr,
    pub received: Received,
}

impl MockCollector {
    /// Bind to an ephemeral port and start serving.
    pub async fn start() -> Self {
        let received = Received::default();
        let app = Router::new()
            .route("/v1/logs", post(logs_handler))
            .route("/v1/metrics", post(metrics_handler))
            .with_state(received.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock collector");
        let addr = listener.local_addr().expect("local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve mock collector");
        });

        Self { addr, received }
    }

    pub fn logs_url(&self) -> String {
        format!("http://{}/v1/logs", self.addr)
    }

    pub fn metrics_url(&self) -> String {
        format!("http://{}/v1/metrics", self.addr)
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Number of log payloads received so far.
    pub fn log_count(&self) -> usize {
        self.received.logs.lock().expect("logs lock").len()
    }

    /// Number of metrics payloads received so far.
    pub fn metric_count(&self) -> usize {
        self.received.metrics.lock().expect("metrics lock").len()
    }

    /// Copy of the captured log payloads.
    pub fn logs(&self) -> Vec<Value> {
        self.received.logs.lock().expect("logs lock").clone()
    }

    /// Copy of the captured metrics payloads.
    pub fn metrics(&self) -> Vec<Value> {
        self.received.metrics.lock().expect("metrics lock").clone()
    }
}

async fn logs_handler(State(state): State<Received>, Json(body): Json<Value>) -> &'static str {
    state.logs.lock().expect("logs lock").push(body);
    "ok"
}

async fn metrics_handler(State(state): State<Received>, Json(body): Json<Value>) -> &'static str {
    state.metrics.lock().expect("metrics lock").push(body);
    "ok"
}

/// Wait for a condition to become true with timeout.
///
/// # Arguments
///
/// * `timeout` - Maximum time to wait
/// * `condition` - Closure that returns true when condition is met
///
/// # Returns
///
/// `true` if condition was met, `false` if timeout expired
pub async fn wait_for<F>(timeout: Duration, mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    let start = std::time::Instant::now();
    while start.elapsed() < timeout {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}
