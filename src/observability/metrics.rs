//! Metrics collection and exposition.
//!
//! # Metrics
//! - `monitor_probes_total` (counter): probes by service and resulting status
//! - `monitor_ingest_total` (counter): submitted documents by outcome
//! - `monitor_store_writes_total` (counter): store puts by mode and outcome
//!
//! # Design Decisions
//! - Counter updates are cheap and unconditional; exposition is what the
//!   config toggles
//! - Recording helpers take domain types so call sites stay label-free

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::model::Status;
use crate::store::StoreMode;

/// Start the Prometheus exposition listener. Failure to bind is logged
/// and tolerated; the monitor itself keeps running.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to start metrics exporter"),
    }
}

pub fn record_probe(service: &str, status: Status) {
    metrics::counter!(
        "monitor_probes_total",
        "service" => service.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

pub fn record_ingest(outcome: &'static str) {
    metrics::counter!("monitor_ingest_total", "outcome" => outcome).increment(1);
}

pub fn record_store_write(mode: StoreMode, ok: bool) {
    metrics::counter!(
        "monitor_store_writes_total",
        "mode" => mode.as_str(),
        "outcome" => if ok { "ok" } else { "error" }
    )
    .increment(1);
}
