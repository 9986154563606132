//! Structured log events for key pipeline operations.

use sift_core::models::{CacheMode, QueryStats};

/// Log a degradation trigger event.
pub fn degradation_triggered(component: &str, failure: &str, fallback: &str) {
    tracing::warn!(
        event = "degradation_triggered",
        component = %component,
        failure = %failure,
        fallback = %fallback,
        "degradation triggered"
    );
}

/// Log which chunk cache implementation is active.
pub fn cache_mode_selected(mode: CacheMode) {
    match mode {
        CacheMode::Ttl => tracing::info!(event = "cache_mode_selected", mode = "ttl", "chunk cache mode selected"),
        CacheMode::Degraded => tracing::warn!(
            event = "cache_mode_selected",
            mode = "degraded",
            "chunk cache is unbounded; call clear_chunk_cache() to release memory"
        ),
    }
}

/// Log a finished retrieval with its stage counts.
pub fn retrieval_completed(query_id: &str, stats: &QueryStats) {
    tracing::info!(
        event = "retrieval_completed",
        query_id = %query_id,
        dense_hits = stats.dense_hits,
        sparse_hits = stats.sparse_hits,
        fused = stats.fused,
        reranked = stats.reranked,
        windows = stats.windows,
        entries = stats.entries,
        dropped_overlaps = stats.dropped_overlaps,
        truncated = stats.truncated,
        tokens_used = stats.tokens_used,
        token_budget = stats.token_budget,
        latency_ms = stats.latency_ms,
        "retrieval completed"
    );
}

/// Log a boost table swap.
pub fn boost_table_reloaded(rules: usize) {
    tracing::info!(event = "boost_table_reloaded", rules = rules, "boost table reloaded");
}

/// Log an operator cache flush.
pub fn chunk_cache_cleared(entries_before: u64) {
    tracing::info!(
        event = "chunk_cache_cleared",
        entries_before = entries_before,
        "chunk cache cleared"
    );
}
