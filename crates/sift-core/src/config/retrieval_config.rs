use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Search, fusion, and rerank sizing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// RRF smoothing constant.
    pub rrf_k: u32,
    /// Fused-list size fed to the reranker.
    pub max_candidates_n: usize,
    /// Candidates retained after reranking.
    pub top_k: usize,
    /// Dense search depth.
    pub dense_k: usize,
    /// Sparse search depth.
    pub sparse_k: usize,
    /// Issue sparse search at all.
    pub sparse_enabled: bool,
    /// Run dense and sparse search concurrently.
    pub parallel_search: bool,
    /// Deadline for each vector index search call.
    pub search_timeout_ms: u64,
}

impl RetrievalConfig {
    pub fn search_timeout(&self) -> Duration {
        Duration::from_millis(self.search_timeout_ms)
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            rrf_k: defaults::DEFAULT_RRF_K,
            max_candidates_n: defaults::DEFAULT_MAX_CANDIDATES_N,
            top_k: defaults::DEFAULT_TOP_K,
            dense_k: defaults::DEFAULT_DENSE_K,
            sparse_k: defaults::DEFAULT_SPARSE_K,
            sparse_enabled: defaults::DEFAULT_SPARSE_ENABLED,
            parallel_search: defaults::DEFAULT_PARALLEL_SEARCH,
            search_timeout_ms: defaults::DEFAULT_SEARCH_TIMEOUT_MS,
        }
    }
}
