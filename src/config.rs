//! Configuration for the telemetry core.
//!
//! Supports:
//! - Environment variable inputs with sensible defaults
//! - CLI argument overrides via clap for embedding binaries
//! - Well-known OTLP collector ports/paths out of the box

use clap::Parser;

use crate::resource::ResourceDescriptor;

/// Lantern: telemetry emission configuration.
#[derive(Parser, Debug, Clone)]
#[command(name = "lantern")]
#[command(author, version, about, long_about = None)]
pub struct TelemetryConfig {
    /// Minimum log level to emit (error, warn, info, debug)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// OTLP collector endpoint for log records
    #[arg(
        long,
        env = "OTEL_EXPORTER_OTLP_LOGS_ENDPOINT",
        default_value = "http://localhost:4318/v1/logs"
    )]
    pub logs_endpoint: String,

    /// OTLP collector endpoint for traces (consumed by the trace SDK)
    #[arg(
        long,
        env = "OTEL_EXPORTER_OTLP_TRACES_ENDPOINT",
        default_value = "http://localhost:4318/v1/traces"
    )]
    pub traces_endpoint: String,

    /// OTLP collector endpoint for metrics
    #[arg(
        long,
        env = "OTEL_EXPORTER_OTLP_METRICS_ENDPOINT",
        default_value = "http://localhost:4318/v1/metrics"
    )]
    pub metrics_endpoint: String,

    /// Service name attached to every emitted record
    #[arg(long, env = "SERVICE_NAME", default_value = "lantern-app")]
    pub service_name: String,

    /// Service version attached to every emitted record
    #[arg(long, env = "SERVICE_VERSION", default_value = "1.0.0")]
    pub service_version: String,

    /// Capacity of the log export queue (records beyond this are dropped)
    #[arg(long, env = "LANTERN_EXPORT_QUEUE_SIZE", default_value_t = 1024)]
    pub export_queue_size: usize,

    /// Interval between metric collection passes, in seconds
    #[arg(long, env = "LANTERN_METRICS_INTERVAL_SECS", default_value_t = 30)]
    pub metrics_interval_secs: u64,
}

impl TelemetryConfig {
    /// Parse configuration from the environment only, ignoring CLI
    /// arguments. This is the entry point for services that embed the
    /// telemetry core without exposing its flags.
    pub fn from_env() -> Self {
        Self::parse_from(["lantern"])
    }

    /// Parse configuration from CLI arguments and environment.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// The process-wide resource attributes derived from this config.
    #[must_use]
    pub fn resource(&self) -> ResourceDescriptor {
        ResourceDescriptor::new(&self.service_name, &self.service_version)
    }

    /// Create a configuration for tests pointed at the given collector.
    #[cfg(test)]
    pub fn test_config(collector_base: &str) -> Self {
        Self {
            log_level: "debug".into(),
            logs_endpoint: format!("{collector_base}/v1/logs"),
            traces_endpoint: format!("{collector_base}/v1/traces"),
            metrics_endpoint: format!("{collector_base}/v1/metrics"),
            service_name: "lantern-test".into(),
            service_version: "0.0.0".into(),
            export_queue_size: 64,
            metrics_interval_secs: 1,
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
            logs_endpoint: "http://localhost:4318/v1/logs".into(),
            traces_endpoint: "http://localhost:4318/v1/traces".into(),
            metrics_endpoint: "http://localhost:4318/v1/metrics".into(),
            service_name: "lantern-app".into(),
            service_version: "1.0.0".into(),
            export_queue_size: 1024,
            metrics_interval_secs: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TelemetryConfig::default();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.logs_endpoint, "http://localhost:4318/v1/logs");
        assert_eq!(config.metrics_endpoint, "http://localhost:4318/v1/metrics");
        assert_eq!(config.service_name, "lantern-app");
        assert_eq!(config.service_version, "1.0.0");
        assert_eq!(config.metrics_interval_secs, 30);
    }

    #[test]
    fn test_test_config_points_at_collector() {
        let config = TelemetryConfig::test_config("http://127.0.0.1:9999");
        assert_eq!(config.logs_endpoint, "http://127.0.0.1:9999/v1/logs");
        assert_eq!(config.metrics_endpoint, "http://127.0.0.1:9999/v1/metrics");
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_resource_from_config() {
        let config = TelemetryConfig::default();
        let resource = config.resource();
        assert_eq!(resource.service_name, "lantern-app");
        assert_eq!(resource.service_version, "1.0.0");
    }
}
