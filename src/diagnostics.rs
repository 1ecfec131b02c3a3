//! Diagnostic channel setup.
//!
//! The telemetry core reports its own failures (unreachable collector,
//! dropped records, caller contract violations) through `tracing`. This
//! module configures that channel:
//! - Console logging with structured format
//! - Environment-based filter (via RUST_LOG, falling back to the
//!   configured level)

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the diagnostic subscriber at the given default level.
///
/// `RUST_LOG` takes precedence over `default_level` when set.
///
/// # Panics
///
/// Panics if a global subscriber has already been installed.
pub fn init_diagnostics(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("info,lantern={default_level}")));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();

    tracing::info!(level = default_level, "Diagnostics initialized");
}

/// Initialize diagnostics for tests (only logs errors).
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("error")
        .with_test_writer()
        .try_init();
}
