//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Feed ingestion (extraction gate, stored posts)
//! - Wizard sessions (transitions, evictions)
//! - Catalog persistence
//! - Search requests

use once_cell::sync::Lazy;
use prometheus::{IntCounter, IntCounterVec, Opts};

// =============================================================================
// Feed Metrics
// =============================================================================

/// Feed posts seen, by result.
pub static FEED_POSTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("anihub_feed_posts_total", "Total feed posts received"),
        &["result"], // "ingested", "gated", "foreign_channel", "empty", "failed"
    )
    .unwrap()
});

// =============================================================================
// Wizard Metrics
// =============================================================================

/// Wizard transitions by mode and outcome.
pub static WIZARD_TRANSITIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "anihub_wizard_transitions_total",
            "Wizard state transitions",
        ),
        &["mode", "outcome"], // outcome: "advanced", "committed", "deleted", "cancelled", "invalid", "not_found", "failed"
    )
    .unwrap()
});

/// Wizard sessions evicted for inactivity.
pub static SESSIONS_EVICTED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "anihub_sessions_evicted_total",
        "Wizard sessions evicted after idle timeout",
    )
    .unwrap()
});

// =============================================================================
// Catalog Metrics
// =============================================================================

/// Catalog saves by result.
pub static CATALOG_SAVES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("anihub_catalog_saves_total", "Catalog save attempts"),
        &["result"], // "ok", "failed", "conflict"
    )
    .unwrap()
});

// =============================================================================
// Search Metrics
// =============================================================================

/// Search requests by result.
pub static SEARCH_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("anihub_search_requests_total", "Search requests handled"),
        &["result"], // "hits", "miss", "empty_query", "failed"
    )
    .unwrap()
});

/// All core metrics, for registration in the server's registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(FEED_POSTS.clone()),
        Box::new(WIZARD_TRANSITIONS.clone()),
        Box::new(SESSIONS_EVICTED.clone()),
        Box::new(CATALOG_SAVES.clone()),
        Box::new(SEARCH_REQUESTS.clone()),
    ]
}
