//! Metrics collection and exposition.
//!
//! # Metrics
//! - `action_calls_total` (counter): calls by outcome (`ok` or error kind)
//! - `action_call_duration_seconds` (histogram): call latency by outcome
//! - `route_store_loads_total` (counter): store loads by source
//!   (`provider` read the artifact, `cache` reused the snapshot)

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one finished action call.
pub fn record_action_call(outcome: &'static str, start: Instant) {
    counter!("action_calls_total", "outcome" => outcome).increment(1);
    histogram!("action_call_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}

/// Record a route store load.
pub fn record_store_load(source: &'static str) {
    counter!("route_store_loads_total", "source" => source).increment(1);
}
