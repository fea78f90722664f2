//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define router metrics (dispatch outcomes, probe quality, cache size)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `len_router_dispatch_total` (counter): dispatches by `source`
//!   (`guess`, `brute`, `miss`)
//! - `len_router_false_probes_total` (counter): probes refused by the matcher
//! - `len_router_guesses_learned_total` (counter): guesses appended
//! - `len_router_guesses` (gauge): guesses currently cached
//! - `len_router_http_requests_total` (counter): HTTP responses by status
//!
//! # Design Decisions
//! - Recording without an installed recorder is a no-op (tests, library use)
//! - Labels are static strings only; no per-path cardinality

use std::net::SocketAddr;

use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics recorder"),
    }
}

pub fn record_dispatch(source: &'static str) {
    counter!("len_router_dispatch_total", "source" => source).increment(1);
}

pub fn record_false_probe() {
    counter!("len_router_false_probes_total").increment(1);
}

pub fn record_guess_learned(total: usize) {
    counter!("len_router_guesses_learned_total").increment(1);
    gauge!("len_router_guesses").set(total as f64);
}

pub fn record_http_response(status: u16) {
    counter!("len_router_http_requests_total", "status" => status.to_string()).increment(1);
}
