use serde::{Deserialize, Serialize};

use super::{ContextEntry, DegradationEvent};

/// Per-query pipeline counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryStats {
    pub dense_hits: usize,
    pub sparse_hits: usize,
    pub fused: usize,
    pub reranked: usize,
    pub windows: usize,
    pub entries: usize,
    pub dropped_overlaps: usize,
    pub truncated: bool,
    pub tokens_used: usize,
    pub token_budget: usize,
    pub latency_ms: u64,
}

/// Everything a single retrieval produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalOutcome {
    pub query_id: String,
    pub entries: Vec<ContextEntry>,
    pub degradations: Vec<DegradationEvent>,
    pub stats: QueryStats,
}

impl RetrievalOutcome {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
