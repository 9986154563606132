use super::{CacheError, ConfigError, UpstreamError};

/// Top-level error for the workspace. Aggregates subsystem errors via `From`.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SiftError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("serialization error: {reason}")]
    Serialization { reason: String },
}

impl SiftError {
    /// Whether the error came from an external call exceeding its deadline.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Upstream(UpstreamError::Timeout { .. }))
    }
}

impl From<serde_json::Error> for SiftError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization {
            reason: e.to_string(),
        }
    }
}

pub type SiftResult<T> = Result<T, SiftError>;
