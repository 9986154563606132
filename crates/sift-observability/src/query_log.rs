//! Per-query performance log: stage counts, tokens used, latency, degradations.

use std::collections::VecDeque;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sift_core::models::QueryStats;

/// Default number of queries retained.
pub const DEFAULT_QUERY_LOG_CAPACITY: usize = 10_000;

/// A single query log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryLogEntry {
    pub query_id: String,
    pub stats: QueryStats,
    pub degradations: usize,
    pub timestamp_epoch_ms: i64,
}

impl QueryLogEntry {
    /// Create a new entry with the timestamp set to now.
    pub fn new(query_id: impl Into<String>, stats: QueryStats, degradations: usize) -> Self {
        Self {
            query_id: query_id.into(),
            stats,
            degradations,
            timestamp_epoch_ms: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.stats.latency_ms)
    }
}

/// Ring buffer of recent queries.
#[derive(Debug, Clone)]
pub struct QueryLog {
    entries: VecDeque<QueryLogEntry>,
    max_entries: usize,
}

impl Default for QueryLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_QUERY_LOG_CAPACITY)
    }
}

impl QueryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with a custom capacity.
    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            max_entries: max_entries.max(1),
        }
    }

    /// Record a query.
    pub fn record(&mut self, entry: QueryLogEntry) {
        tracing::debug!(
            event = "query_logged",
            query_id = %entry.query_id,
            latency_ms = entry.stats.latency_ms,
            entries = entry.stats.entries,
            tokens_used = entry.stats.tokens_used,
            degradations = entry.degradations,
            "query logged"
        );

        self.entries.push_back(entry);
        while self.entries.len() > self.max_entries {
            self.entries.pop_front();
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = &QueryLogEntry> {
        self.entries.iter()
    }

    /// Average latency across all logged queries.
    pub fn avg_latency(&self) -> Duration {
        if self.entries.is_empty() {
            return Duration::ZERO;
        }
        let total: Duration = self.entries.iter().map(QueryLogEntry::latency).sum();
        total / self.entries.len() as u32
    }

    /// Latency at the given percentile (0.0 to 1.0).
    pub fn latency_percentile(&self, p: f64) -> Duration {
        if self.entries.is_empty() {
            return Duration::ZERO;
        }
        let mut latencies: Vec<Duration> = self.entries.iter().map(QueryLogEntry::latency).collect();
        latencies.sort();
        let idx = ((p.clamp(0.0, 1.0) * (latencies.len() - 1) as f64).round() as usize)
            .min(latencies.len() - 1);
        latencies[idx]
    }

    /// Share of queries whose context was cut short by the global budget.
    pub fn truncation_rate(&self) -> f64 {
        if self.entries.is_empty() {
            return 0.0;
        }
        let truncated = self.entries.iter().filter(|e| e.stats.truncated).count();
        truncated as f64 / self.entries.len() as f64
    }

    /// Share of queries that hit at least one degradation.
    pub fn degraded_rate(&self) -> f64 {
        if self.entries.is_empty() {
            return 0.0;
        }
        let degraded = self.entries.iter().filter(|e| e.degradations > 0).count();
        degraded as f64 / self.entries.len() as f64
    }

    /// Total number of logged queries.
    pub fn count(&self) -> usize {
        self.entries.len()
    }
}
