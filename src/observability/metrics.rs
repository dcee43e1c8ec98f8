//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by route and status
//! - `gateway_request_duration_seconds` (histogram): handler latency by route
//! - `gateway_ws_connections` (gauge): open WebSocket connections
//! - `gateway_events_total` (counter): broadcasts by event name
//! - `gateway_event_deliveries_total` (counter): per-socket deliveries by event name
//! - `gateway_ledger_rpc_total` (counter): rippled calls by method and outcome
//!
//! Without an installed recorder every call is a no-op.

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a finished HTTP request.
pub fn record_request(route: String, status: u16, start: Instant) {
    counter!("gateway_requests_total", "route" => route.clone(), "status" => status.to_string())
        .increment(1);
    histogram!("gateway_request_duration_seconds", "route" => route)
        .record(start.elapsed().as_secs_f64());
}

/// Record the current number of open WebSocket connections.
pub fn record_ws_connections(open: usize) {
    gauge!("gateway_ws_connections").set(open as f64);
}

/// Record one broadcast and how many sockets it reached.
pub fn record_event(event: &'static str, delivered: usize) {
    counter!("gateway_events_total", "event" => event).increment(1);
    counter!("gateway_event_deliveries_total", "event" => event).increment(delivered as u64);
}

/// Record one rippled call.
pub fn record_ledger_rpc(method: &str, outcome: &'static str) {
    counter!("gateway_ledger_rpc_total", "method" => method.to_string(), "outcome" => outcome)
        .increment(1);
}
