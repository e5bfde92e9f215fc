//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gatekeeper_requests_total` (counter): forwarded requests by method, status
//! - `gatekeeper_request_duration_seconds` (histogram): forward latency
//! - `gatekeeper_decisions_total` (counter): decisions by kind
//! - `gatekeeper_role_cache_lookups_total` (counter): cache hits/misses
//! - `gatekeeper_role_cache_entries` (gauge): current cache size
//! - `gatekeeper_session_failures_total` (counter): non-benign session errors
//! - `gatekeeper_upstream_errors_total` (counter): failed upstream forwards

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus exporter with its scrape endpoint.
///
/// Failure to bind the exporter is logged but never fatal; the gatekeeper
/// keeps serving without metrics.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => {
            describe_counter!("gatekeeper_requests_total", "Forwarded requests");
            describe_histogram!(
                "gatekeeper_request_duration_seconds",
                "Upstream forward latency"
            );
            describe_counter!("gatekeeper_decisions_total", "Gatekeeper decisions by kind");
            describe_counter!(
                "gatekeeper_role_cache_lookups_total",
                "Role cache lookups by result"
            );
            describe_gauge!("gatekeeper_role_cache_entries", "Current role cache size");
            describe_counter!(
                "gatekeeper_session_failures_total",
                "Non-benign session retrieval failures"
            );
            describe_counter!(
                "gatekeeper_upstream_errors_total",
                "Failed forwards to the upstream backend"
            );
            tracing::info!(address = %addr, "metrics exporter listening");
        }
        Err(err) => {
            tracing::error!(error = %err, "failed to install metrics exporter");
        }
    }
}

/// Record a forwarded request's outcome and latency.
pub fn record_request(method: &str, status: u16, start: Instant) {
    counter!(
        "gatekeeper_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
    )
    .increment(1);
    histogram!("gatekeeper_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record a gatekeeper decision by kind (pass/redirect/rewrite).
pub fn record_decision(kind: &'static str) {
    counter!("gatekeeper_decisions_total", "kind" => kind).increment(1);
}

pub fn record_cache_hit() {
    counter!("gatekeeper_role_cache_lookups_total", "result" => "hit").increment(1);
}

pub fn record_cache_miss() {
    counter!("gatekeeper_role_cache_lookups_total", "result" => "miss").increment(1);
}

pub fn record_cache_size(entries: usize) {
    gauge!("gatekeeper_role_cache_entries").set(entries as f64);
}

pub fn record_session_failure() {
    counter!("gatekeeper_session_failures_total").increment(1);
}

pub fn record_upstream_error() {
    counter!("gatekeeper_upstream_errors_total").increment(1);
}
