//! Metrics collection and exposition.
//!
//! # Metrics
//! - `bfhl_requests_total` (counter): requests by operation and status
//! - `bfhl_request_duration_seconds` (histogram): latency by operation
//! - `bfhl_rate_limited_total` (counter): requests rejected with 429
//! - `bfhl_rate_limit_entries` (gauge): tracked client identities after a sweep

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(operation: &str, status: u16, start: Instant) {
    metrics::counter!(
        "bfhl_requests_total",
        "operation" => operation.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("bfhl_request_duration_seconds", "operation" => operation.to_string())
        .record(start.elapsed().as_secs_f64());
}

pub fn record_rate_limited() {
    metrics::counter!("bfhl_rate_limited_total").increment(1);
}

pub fn record_rate_limit_entries(count: usize) {
    metrics::gauge!("bfhl_rate_limit_entries").set(count as f64);
}
