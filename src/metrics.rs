// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Prometheus metrics for the DNS-01 webhook solver.
//!
//! This module provides metrics collection with the namespace prefix
//! `hetzner_dns01_`.
//!
//! # Metrics Categories
//!
//! - **Challenge Metrics** - Track `present`/`cleanup` calls and their outcomes
//! - **DNS API Metrics** - Track outbound requests to the provider by status
//!
//! # Example
//!
//! ```rust,no_run
//! use hetzner_dns01::metrics::record_challenge_success;
//!
//! record_challenge_success("present", std::time::Duration::from_millis(350));
//! ```

use prometheus::{CounterVec, Encoder, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder};
use std::sync::LazyLock;
use std::time::Duration;

// ============================================================================
// Metric Name Constants
// ============================================================================

/// Namespace prefix for all solver metrics (prometheus-safe)
const METRICS_NAMESPACE: &str = "hetzner_dns01";

// ============================================================================
// Global Metrics Registry
// ============================================================================

/// Global Prometheus metrics registry
///
/// All metrics are registered in this registry and exposed via `/metrics` endpoint.
pub static METRICS_REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

// ============================================================================
// Challenge Metrics
// ============================================================================

/// Total number of challenge calls by action and status
///
/// Labels:
/// - `action`: `present` or `cleanup`
/// - `status`: Outcome (`success`, `error`)
pub static CHALLENGES_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_challenges_total"),
        "Total number of challenge calls by action and status",
    );
    let counter = CounterVec::new(opts, &["action", "status"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

/// Duration of challenge calls in seconds
///
/// Labels:
/// - `action`: `present` or `cleanup`
pub static CHALLENGE_DURATION_SECONDS: LazyLock<HistogramVec> = LazyLock::new(|| {
    let opts = HistogramOpts::new(
        format!("{METRICS_NAMESPACE}_challenge_duration_seconds"),
        "Duration of challenge calls in seconds by action",
    )
    .buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0]);
    let histogram = HistogramVec::new(opts, &["action"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(histogram.clone()))
        .unwrap();
    histogram
});

// ============================================================================
// DNS API Metrics
// ============================================================================

/// Total number of DNS API requests by method and status
///
/// Labels:
/// - `method`: HTTP method
/// - `status`: Numeric HTTP status, or `error` when no response was received
pub static DNS_API_REQUESTS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_dns_api_requests_total"),
        "Total number of DNS API requests by method and status",
    );
    let counter = CounterVec::new(opts, &["method", "status"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

// ============================================================================
// Helper Functions
// ============================================================================

/// Record a successful challenge call
pub fn record_challenge_success(action: &str, duration: Duration) {
    CHALLENGES_TOTAL
        .with_label_values(&[action, "success"])
        .inc();
    CHALLENGE_DURATION_SECONDS
        .with_label_values(&[action])
        .observe(duration.as_secs_f64());
}

/// Record a failed challenge call
pub fn record_challenge_error(action: &str, duration: Duration) {
    CHALLENGES_TOTAL.with_label_values(&[action, "error"]).inc();
    CHALLENGE_DURATION_SECONDS
        .with_label_values(&[action])
        .observe(duration.as_secs_f64());
}

/// Record an outbound DNS API request
pub fn record_dns_api_request(method: &str, status: &str) {
    DNS_API_REQUESTS_TOTAL
        .with_label_values(&[method, status])
        .inc();
}

/// Gather and encode all metrics in Prometheus text format
///
/// # Returns
/// Prometheus-formatted metrics as a String
///
/// # Errors
/// Returns error if encoding fails
pub fn gather_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = METRICS_REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(format!("UTF-8 error: {e}")))
}
