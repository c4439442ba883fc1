//! Metrics collection and exposition.
//!
//! # Metrics
//! - `tx_submissions_total` (counter): submissions by path and terminal state
//! - `tx_receipt_polls_total` (counter): receipt polls by outcome
//! - `tx_rpc_backend_health` (gauge): 1=healthy, 0=unhealthy
//!
//! Without an installed recorder every call here is a no-op.

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

use crate::blockchain::types::TransactionState;

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Count one finished submission.
pub fn record_submission(path: &'static str, state: TransactionState) {
    metrics::counter!("tx_submissions_total", "path" => path, "state" => state.as_str()).increment(1);
}

/// Count one receipt poll.
pub fn record_receipt_poll(outcome: &'static str) {
    metrics::counter!("tx_receipt_polls_total", "outcome" => outcome).increment(1);
}

/// Record the reachability of an RPC backend.
pub fn record_backend_health(backend: &str, healthy: bool) {
    metrics::gauge!("tx_rpc_backend_health", "backend" => backend.to_string())
        .set(if healthy { 1.0 } else { 0.0 });
}
