//! Prometheus Metrics Module
//!
//! Gateway-side metrics for the command channel.
//!
//! # Metrics Collected
//! - Command counts by target service, command tag and outcome
//! - Command round-trip latency histograms

use once_cell::sync::Lazy;
use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};

/// Global metrics registry
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// Command counter - tracks forwarded commands by service, command and outcome
pub static RPC_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("rpc_requests_total", "Total number of forwarded commands")
            .namespace("accounts_ledger"),
        &["service", "command", "outcome"],
    )
    .expect("Failed to create RPC_REQUESTS_TOTAL metric")
});

/// Command latency histogram - round trip in seconds, timeouts included
pub static RPC_REQUEST_DURATION_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    let buckets = vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];
    HistogramVec::new(
        HistogramOpts::new(
            "rpc_request_duration_seconds",
            "Command round-trip latency in seconds",
        )
        .namespace("accounts_ledger")
        .buckets(buckets),
        &["service", "command"],
    )
    .expect("Failed to create RPC_REQUEST_DURATION_SECONDS metric")
});

fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(RPC_REQUESTS_TOTAL.clone()))
        .expect("Failed to register RPC_REQUESTS_TOTAL");
    registry
        .register(Box::new(RPC_REQUEST_DURATION_SECONDS.clone()))
        .expect("Failed to register RPC_REQUEST_DURATION_SECONDS");
}

/// Collect and encode all metrics as Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return String::new();
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

/// Record one forwarded command.
///
/// `outcome` is `"ok"`, `"error"` (envelope with `success: false`),
/// `"rejected"` (framework error frame) or `"transport"`.
pub fn record_rpc_request(service: &str, command: &str, outcome: &str, duration_secs: f64) {
    RPC_REQUESTS_TOTAL
        .with_label_values(&[service, command, outcome])
        .inc();
    RPC_REQUEST_DURATION_SECONDS
        .with_label_values(&[service, command])
        .observe(duration_secs);
}
