use std::fmt;

use serde::{Deserialize, Serialize};

/// Pipeline stages that talk to external collaborators or can degrade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    DenseSearch,
    SparseSearch,
    Rerank,
    ChunkFetch,
    AutoMerge,
    Assembly,
    ChunkCache,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DenseSearch => "dense_search",
            Self::SparseSearch => "sparse_search",
            Self::Rerank => "rerank",
            Self::ChunkFetch => "chunk_fetch",
            Self::AutoMerge => "auto_merge",
            Self::Assembly => "assembly",
            Self::ChunkCache => "chunk_cache",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
