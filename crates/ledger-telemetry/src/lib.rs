//! # Ledger Telemetry
//!
//! Observability for the ledger client.
//!
//! ## Components
//!
//! - **Logs**: `tracing-subscriber` with an `EnvFilter` and a fmt or JSON layer
//! - **Metrics**: Prometheus counters and histograms in a process-wide registry
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ledger_telemetry::{TelemetryConfig, init_telemetry};
//!
//! fn main() {
//!     init_telemetry(&TelemetryConfig::from_env()).expect("Failed to init telemetry");
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `OTEL_SERVICE_NAME` | `ledger-client` | Service name in logs |
//! | `LEDGER_LOG_LEVEL` | `info` | Log level filter (falls back to `RUST_LOG`) |
//! | `LEDGER_CONSOLE_OUTPUT` | `true` | Write logs to stdout |
//! | `LEDGER_JSON_LOGS` | `false` | JSON log lines (default `true` in containers) |

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::{env_filter, init_logging};
pub use metrics::{
    encode_metrics, register_metrics, HistogramTimer, EXECUTION_DURATION, EXECUTION_TIMEOUTS,
    PRECHECK_FAILURES, PRECHECK_RETRIES, RECEIPT_POLLS, SUBMISSIONS, TOPIC_INTEGRITY_FAILURES,
    TOPIC_MESSAGES, TOPIC_RECONNECTS,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Register metrics and install the global log subscriber.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    // Metrics first; they do not depend on the subscriber
    register_metrics()?;
    init_logging(config)
}

/// Convenience macro for recording a metric increment.
#[macro_export]
macro_rules! metric_inc {
    ($metric:expr) => {
        $metric.inc()
    };
    ($metric:expr, $labels:expr) => {
        $metric.with_label_values($labels).inc()
    };
}
