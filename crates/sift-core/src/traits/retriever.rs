use crate::errors::SiftResult;
use crate::models::{QueryVectors, RetrievalOutcome};

/// Query → token-budgeted ordered context.
pub trait IRetriever: Send + Sync {
    fn retrieve(&self, query: &str, vectors: &QueryVectors) -> SiftResult<RetrievalOutcome>;
}
