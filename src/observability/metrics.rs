//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_requests_total` (counter): inbound requests by route, status
//! - `relay_request_duration_seconds` (histogram): inbound latency
//! - `relay_upstream_calls_total` (counter): upstream calls by resource, outcome
//! - `relay_upstream_duration_seconds` (histogram): upstream latency
//!
//! Without an installed recorder every call here is a no-op.

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to start metrics endpoint"),
    }
}

/// Record a finished inbound request.
pub fn record_request(route: String, status: u16, start: Instant) {
    let status = status.to_string();
    ::metrics::counter!("relay_requests_total", "route" => route.clone(), "status" => status)
        .increment(1);
    ::metrics::histogram!("relay_request_duration_seconds", "route" => route)
        .record(start.elapsed().as_secs_f64());
}

/// Record a finished upstream call. `outcome` is the status code or `error`.
pub fn record_upstream_call(resource: &'static str, outcome: &str, start: Instant) {
    ::metrics::counter!(
        "relay_upstream_calls_total",
        "resource" => resource,
        "outcome" => outcome.to_string()
    )
    .increment(1);
    ::metrics::histogram!("relay_upstream_duration_seconds", "resource" => resource)
        .record(start.elapsed().as_secs_f64());
}
