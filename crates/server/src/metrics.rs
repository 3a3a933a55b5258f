//! Prometheus metrics for observability.
//!
//! This module provides metrics for monitoring the AniHub server:
//! - HTTP request metrics (latency, counts, auth failures)
//! - Submitted events
//! - Catalog size (collected dynamically)
//!
//! Core metrics (feed, wizard, catalog saves, search) are registered here too.

use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// HTTP Request Metrics
// =============================================================================

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "anihub_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
        ]),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("anihub_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "anihub_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

/// Authentication failures.
pub static AUTH_FAILURES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("anihub_auth_failures_total", "Total authentication failures"),
        &["reason"], // "missing_key", "invalid_key"
    )
    .unwrap()
});

// =============================================================================
// Event Metrics
// =============================================================================

/// Events submitted over HTTP, by kind and result.
pub static EVENTS_SUBMITTED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("anihub_events_submitted_total", "Events submitted to the event loop"),
        &["kind", "result"], // result: "handled", "loop_closed"
    )
    .unwrap()
});

// =============================================================================
// Catalog Metrics (collected dynamically)
// =============================================================================

/// Catalog entries.
pub static CATALOG_ENTRIES: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new("anihub_catalog_entries", "Number of entries in the catalog").unwrap()
});

// =============================================================================
// Registration
// =============================================================================

fn register_metrics(registry: &Registry) {
    // HTTP
    registry
        .register(Box::new(HTTP_REQUEST_DURATION.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()))
        .unwrap();
    registry
        .register(Box::new(AUTH_FAILURES_TOTAL.clone()))
        .unwrap();

    // Events
    registry
        .register(Box::new(EVENTS_SUBMITTED.clone()))
        .unwrap();

    // Catalog
    registry
        .register(Box::new(CATALOG_ENTRIES.clone()))
        .unwrap();

    // Core metrics (feed, wizard, catalog saves, search)
    for metric in anihub_core::metrics::all_metrics() {
        registry.register(metric).unwrap();
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

/// Collect dynamic metrics from current application state.
///
/// Called before encoding so gauges reflect the current catalog.
pub fn collect_dynamic_metrics(state: &crate::state::AppState) {
    match state.catalog().entries() {
        Ok(entries) => CATALOG_ENTRIES.set(entries.len() as i64),
        Err(e) => tracing::warn!("Failed to read catalog for metrics: {}", e),
    }
}

/// Normalize a path for metric labels.
///
/// Paths outside the known routes collapse to `/other` so label cardinality
/// stays bounded.
pub fn normalize_path(path: &str) -> String {
    const KNOWN: [&str; 6] = [
        "/metrics",
        "/api/v1/health",
        "/api/v1/config",
        "/api/v1/events",
        "/api/v1/search",
        "/api/v1/catalog",
    ];
    let trimmed = path.trim_end_matches('/');
    if KNOWN.contains(&trimmed) {
        trimmed.to_string()
    } else {
        "/other".to_string()
    }
}
