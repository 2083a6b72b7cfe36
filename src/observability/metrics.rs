//! Metrics collection and exposition.
//!
//! # Metrics
//! - `talent_fetch_attempts_total` (counter): HTTP attempts by method, outcome
//! - `talent_probe_candidates_total` (counter): probed candidates by outcome
//! - `talent_uploads_total` (counter): finished uploads by status
//! - `talent_backend_requests_total` (counter): dev backend requests by route, status
//!
//! Without an installed recorder these are no-ops. The dev backend installs a
//! Prometheus exporter when `backend.metrics_address` is set; an embedding
//! application may install its own.

use std::net::SocketAddr;

use metrics::counter;
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// One HTTP attempt made by the resilient fetch.
pub fn record_fetch_attempt(method: &str, outcome: &'static str) {
    counter!(
        "talent_fetch_attempts_total",
        "method" => method.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

/// One endpoint candidate tried by the profile probe.
pub fn record_probe_candidate(operation: &'static str, outcome: &'static str) {
    counter!(
        "talent_probe_candidates_total",
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
}

/// One upload reaching a terminal status.
pub fn record_upload(status: &'static str) {
    counter!("talent_uploads_total", "status" => status).increment(1);
}

/// One request served by the dev backend.
pub fn record_backend_request(route: &str, status: u16) {
    counter!(
        "talent_backend_requests_total",
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}
