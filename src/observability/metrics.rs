//! Metrics collection and exposition.
//!
//! # Metrics
//! - `agent_http_requests_total` (counter): requests by endpoint and status
//! - `agent_listener_restarts_total` (counter): listener swaps to a new port
//! - `agent_shutdown_dispatch_total` (counter): shutdown dispatches by outcome
//!
//! Without an installed recorder every call is a no-op, so tests and the
//! default binary pay nothing.

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on `addr`. Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(endpoint: &'static str, status: u16) {
    metrics::counter!(
        "agent_http_requests_total",
        "endpoint" => endpoint,
        "status" => status.to_string()
    )
    .increment(1);
}

pub fn record_listener_restart() {
    metrics::counter!("agent_listener_restarts_total").increment(1);
}

pub fn record_shutdown_dispatch(success: bool) {
    let outcome = if success { "dispatched" } else { "failed" };
    metrics::counter!("agent_shutdown_dispatch_total", "outcome" => outcome).increment(1);
}
