//! Metrics collection and exposition.
//!
//! # Metrics
//! - `registry_requests_total` (counter): requests by method, status
//! - `registry_request_duration_seconds` (histogram): latency distribution
//! - `registry_issuers` (gauge): number of registered issuers
//! - `registry_page_rejections_total` (counter): invalid page requests by reason
//!
//! Without an installed recorder every call here is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    let status = status.to_string();
    counter!(
        "registry_requests_total",
        "method" => method.to_string(),
        "status" => status.clone()
    )
    .increment(1);
    histogram!(
        "registry_request_duration_seconds",
        "method" => method.to_string(),
        "status" => status
    )
    .record(start.elapsed().as_secs_f64());
}

pub fn record_registry_size(issuers: usize) {
    gauge!("registry_issuers").set(issuers as f64);
}

pub fn record_page_rejected(reason: &'static str) {
    counter!("registry_page_rejections_total", "reason" => reason).increment(1);
}
