use serde::{Deserialize, Serialize};

use super::Chunk;

/// Boost rule categories, in the order the booster applies them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoostCategory {
    PageType,
    Section,
    Platform,
    UrlPattern,
    TitleKeyword,
    Structural,
    Thematic,
}

impl BoostCategory {
    /// Fixed application order.
    pub const ORDER: [BoostCategory; 7] = [
        Self::PageType,
        Self::Section,
        Self::Platform,
        Self::UrlPattern,
        Self::TitleKeyword,
        Self::Structural,
        Self::Thematic,
    ];
}

/// A single boost that matched a candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedBoost {
    pub category: BoostCategory,
    /// The rule value that matched (page type, pattern, keyword, signal, theme).
    pub matched: String,
    pub factor: f64,
}

/// A fused search result, created per query and discarded after it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchCandidate {
    pub chunk: Chunk,
    pub dense_score: Option<f64>,
    pub sparse_score: Option<f64>,
    /// 1-based rank in the dense list, if present there.
    pub dense_rank: Option<usize>,
    /// 1-based rank in the sparse list, if present there.
    pub sparse_rank: Option<usize>,
    pub rrf_score: f64,
    /// `rrf_score` times every matched boost factor.
    pub boosted_score: f64,
    #[serde(default)]
    pub applied_boosts: Vec<AppliedBoost>,
}

impl SearchCandidate {
    pub fn chunk_id(&self) -> &str {
        &self.chunk.chunk_id
    }
}

/// A candidate after the reranker stage. `rerank_score` is `None` when the
/// reranker is disabled or degraded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RerankedCandidate {
    pub candidate: SearchCandidate,
    pub rerank_score: Option<f64>,
}

impl RerankedCandidate {
    pub fn unscored(candidate: SearchCandidate) -> Self {
        Self {
            candidate,
            rerank_score: None,
        }
    }

    pub fn chunk(&self) -> &Chunk {
        &self.candidate.chunk
    }

    pub fn chunk_id(&self) -> &str {
        &self.candidate.chunk.chunk_id
    }
}
