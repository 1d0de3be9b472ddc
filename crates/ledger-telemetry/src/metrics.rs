//! Prometheus metrics for the ledger client.
//!
//! All metrics follow the naming convention: `ledger_<component>_<metric>_<unit>`
//!
//! ## Metric Types
//!
//! - **Counter**: Monotonically increasing value (e.g., submissions_total)
//! - **Histogram**: Distribution of values (e.g., execution_duration_seconds)

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, Histogram, Opts, Registry, TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // EXECUTION METRICS
    // =========================================================================

    /// Requests sent to a node, per attempt
    pub static ref SUBMISSIONS: CounterVec = CounterVec::new(
        Opts::new("ledger_execution_submissions_total", "Requests sent to nodes"),
        &["kind"]  // kind: transaction/receipt/record
    ).expect("metric creation failed");

    /// Transient precheck answers that led to a retry
    pub static ref PRECHECK_RETRIES: CounterVec = CounterVec::new(
        Opts::new("ledger_execution_precheck_retries_total", "Retries caused by transient precheck codes"),
        &["status"]
    ).expect("metric creation failed");

    /// Non-retryable precheck rejections
    pub static ref PRECHECK_FAILURES: CounterVec = CounterVec::new(
        Opts::new("ledger_execution_precheck_failures_total", "Requests rejected at precheck"),
        &["status"]
    ).expect("metric creation failed");

    /// Executions that ran out of attempts or time
    pub static ref EXECUTION_TIMEOUTS: Counter = Counter::new(
        "ledger_execution_timeouts_total",
        "Executions abandoned after exhausting the retry budget"
    ).expect("metric creation failed");

    /// End-to-end execution duration
    pub static ref EXECUTION_DURATION: Histogram = Histogram::with_opts(
        prometheus::HistogramOpts::new(
            "ledger_execution_duration_seconds",
            "Time from first attempt to final outcome"
        ).buckets(exponential_buckets(0.005, 2.0, 16).expect("valid bucket layout"))
    ).expect("metric creation failed");

    // =========================================================================
    // RECEIPT METRICS
    // =========================================================================

    /// Receipt or record queries that found the transaction still pending
    pub static ref RECEIPT_POLLS: Counter = Counter::new(
        "ledger_receipt_pending_polls_total",
        "Receipt queries answered with a pending status"
    ).expect("metric creation failed");

    // =========================================================================
    // TOPIC METRICS
    // =========================================================================

    /// Topic messages delivered to subscribers
    pub static ref TOPIC_MESSAGES: Counter = Counter::new(
        "ledger_topic_messages_delivered_total",
        "Validated topic messages delivered to subscribers"
    ).expect("metric creation failed");

    /// Running-hash or sequence mismatches
    pub static ref TOPIC_INTEGRITY_FAILURES: Counter = Counter::new(
        "ledger_topic_integrity_failures_total",
        "Mirror responses rejected by running-hash validation"
    ).expect("metric creation failed");

    /// Mirror stream reconnects
    pub static ref TOPIC_RECONNECTS: Counter = Counter::new(
        "ledger_topic_reconnects_total",
        "Mirror subscription reconnect attempts"
    ).expect("metric creation failed");
}

/// Register all metrics with the global registry.
///
/// Safe to call more than once.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Execution
        Box::new(SUBMISSIONS.clone()),
        Box::new(PRECHECK_RETRIES.clone()),
        Box::new(PRECHECK_FAILURES.clone()),
        Box::new(EXECUTION_TIMEOUTS.clone()),
        Box::new(EXECUTION_DURATION.clone()),
        // Receipts
        Box::new(RECEIPT_POLLS.clone()),
        // Topics
        Box::new(TOPIC_MESSAGES.clone()),
        Box::new(TOPIC_INTEGRITY_FAILURES.clone()),
        Box::new(TOPIC_RECONNECTS.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(())
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        self.histogram.observe(duration);
    }
}
