use crate::models::PipelineStage;

/// Failures of external collaborators (vector index, reranker, chunk fetch).
#[derive(Debug, Clone, thiserror::Error)]
pub enum UpstreamError {
    #[error("{stage} timed out after {timeout_ms}ms")]
    Timeout { stage: PipelineStage, timeout_ms: u64 },

    #[error("{stage} unavailable: {reason}")]
    Unavailable { stage: PipelineStage, reason: String },

    #[error("{stage} returned an invalid response: {reason}")]
    InvalidResponse { stage: PipelineStage, reason: String },
}

impl UpstreamError {
    pub fn stage(&self) -> PipelineStage {
        match self {
            Self::Timeout { stage, .. }
            | Self::Unavailable { stage, .. }
            | Self::InvalidResponse { stage, .. } => *stage,
        }
    }
}
