//! HybridSearcher coordinating dense + sparse search and RRF fusion.

pub mod rrf_fusion;

use std::sync::Arc;

use sift_core::config::RetrievalConfig;
use sift_core::errors::SiftResult;
use sift_core::models::{
    DegradationEvent, PipelineStage, QueryVectors, SearchCandidate, SearchHit,
};
use sift_core::traits::IVectorIndex;
use tracing::{debug, warn};

use crate::degradation;

/// Fused candidates plus what it took to get them.
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    pub candidates: Vec<SearchCandidate>,
    pub dense_hits: usize,
    pub sparse_hits: usize,
    pub degradations: Vec<DegradationEvent>,
}

/// Hybrid search over the external vector index.
///
/// A failing or timed-out search side is treated as an empty list and
/// reported as a degradation; it never fails the request.
pub struct HybridSearcher {
    index: Arc<dyn IVectorIndex>,
    config: RetrievalConfig,
}

impl HybridSearcher {
    pub fn new(index: Arc<dyn IVectorIndex>, config: RetrievalConfig) -> Self {
        Self { index, config }
    }

    /// Run dense and sparse search, then fuse.
    ///
    /// Returns candidates sorted by fused RRF score (descending).
    pub fn search(&self, vectors: &QueryVectors) -> SearchOutcome {
        let (dense, sparse) = if self.config.parallel_search {
            rayon::join(|| self.dense(vectors), || self.sparse(vectors))
        } else {
            (self.dense(vectors), self.sparse(vectors))
        };

        let mut outcome = SearchOutcome::default();
        let dense = self.recover(PipelineStage::DenseSearch, dense, &mut outcome.degradations);
        let sparse = self.recover(PipelineStage::SparseSearch, sparse, &mut outcome.degradations);
        outcome.dense_hits = dense.len();
        outcome.sparse_hits = sparse.len();

        outcome.candidates = rrf_fusion::fuse(&dense, &sparse, self.config.rrf_k);
        debug!(
            dense = outcome.dense_hits,
            sparse = outcome.sparse_hits,
            fused = outcome.candidates.len(),
            "hybrid search fused"
        );
        outcome
    }

    fn dense(&self, vectors: &QueryVectors) -> SiftResult<Vec<SearchHit>> {
        match vectors.dense.as_deref() {
            Some(v) if !v.is_empty() => {
                self.index
                    .dense_search(v, self.config.dense_k, self.config.search_timeout())
            }
            _ => Ok(Vec::new()),
        }
    }

    fn sparse(&self, vectors: &QueryVectors) -> SiftResult<Vec<SearchHit>> {
        if !self.config.sparse_enabled {
            return Ok(Vec::new());
        }
        match vectors.sparse.as_ref() {
            Some(v) if !v.is_empty() => {
                self.index
                    .sparse_search(v, self.config.sparse_k, self.config.search_timeout())
            }
            _ => Ok(Vec::new()),
        }
    }

    fn recover(
        &self,
        stage: PipelineStage,
        result: SiftResult<Vec<SearchHit>>,
        degradations: &mut Vec<DegradationEvent>,
    ) -> Vec<SearchHit> {
        match result {
            Ok(hits) => hits,
            Err(e) => {
                warn!(stage = %stage, error = %e, "search failed, continuing with an empty list");
                degradations.push(degradation::stage_failed(stage, &e, "empty result list"));
                Vec::new()
            }
        }
    }
}
