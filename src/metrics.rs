//! Prometheus metrics for application observability.
//!
//! # Available Metrics
//!
//! ## Counters
//! - `relay_requests_total` - Relay outcomes (label: outcome = forwarded | unknown_user | upstream_error)
//! - `relay_gate_decisions_total` - Authorization gate decisions (label: decision = allow | deny)
//!
//! ## Histograms
//! - `relay_upstream_duration_seconds` - Outbound call duration (labels: method, status)
//!
//! Recording functions are no-ops until [`init_metrics`] installs the exporter,
//! so handlers and tests can call them unconditionally.

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::{error, info};

/// Metric names as constants for consistency.
pub mod names {
    pub const RELAY_REQUESTS_TOTAL: &str = "relay_requests_total";
    pub const GATE_DECISIONS_TOTAL: &str = "relay_gate_decisions_total";
    pub const UPSTREAM_DURATION_SECONDS: &str = "relay_upstream_duration_seconds";
}

/// Initialize the Prometheus metrics exporter on `metrics_addr`.
pub fn init_metrics(metrics_addr: SocketAddr) -> Result<(), String> {
    PrometheusBuilder::new()
        .with_http_listener(metrics_addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {e}"))?;

    describe_counter!(
        names::RELAY_REQUESTS_TOTAL,
        "Total relay requests by outcome"
    );
    describe_counter!(
        names::GATE_DECISIONS_TOTAL,
        "Total authorization gate decisions"
    );
    describe_histogram!(
        names::UPSTREAM_DURATION_SECONDS,
        "Duration of calls to the directory and posts services in seconds"
    );

    info!(addr = %metrics_addr, "Prometheus metrics endpoint started");
    Ok(())
}

/// Try to initialize metrics, logging any errors but not failing.
pub fn try_init_metrics(metrics_addr: SocketAddr) {
    if let Err(e) = init_metrics(metrics_addr) {
        error!(error = %e, "Failed to initialize metrics, continuing without metrics");
    }
}

/// Record the outcome of one relay request.
pub fn record_relay_outcome(outcome: &'static str) {
    counter!(names::RELAY_REQUESTS_TOTAL, "outcome" => outcome).increment(1);
}

/// Record an authorization gate decision.
pub fn record_gate_decision(allowed: bool) {
    let decision = if allowed { "allow" } else { "deny" };
    counter!(names::GATE_DECISIONS_TOTAL, "decision" => decision).increment(1);
}

/// Record the duration of one outbound call.
pub fn record_upstream_duration(method: &'static str, status: &str, duration_secs: f64) {
    histogram!(names::UPSTREAM_DURATION_SECONDS, "method" => method, "status" => status.to_string())
        .record(duration_secs);
}

#[cfg(test)]
mod tests {
    use super::*;

    // Without an installed recorder these must be silent no-ops.

    #[test]
    fn test_record_relay_outcome() {
        record_relay_outcome("forwarded");
        record_relay_outcome("unknown_user");
    }

    #[test]
    fn test_record_gate_decision() {
        record_gate_decision(true);
        record_gate_decision(false);
    }

    #[test]
    fn test_record_upstream_duration() {
        record_upstream_duration("GET", "200", 0.12);
        record_upstream_duration("POST", "error", 0.5);
    }
}
