use std::time::Duration;

use crate::errors::SiftResult;
use crate::models::{Chunk, SearchHit, SparseVector};

/// The external vector index service.
///
/// Every call carries a deadline; implementations return
/// `UpstreamError::Timeout` when it is exceeded.
pub trait IVectorIndex: Send + Sync {
    /// Dense ANN search, best hit first.
    fn dense_search(
        &self,
        vector: &[f32],
        k: usize,
        timeout: Duration,
    ) -> SiftResult<Vec<SearchHit>>;

    /// Sparse (lexical) search, best hit first.
    fn sparse_search(
        &self,
        vector: &SparseVector,
        k: usize,
        timeout: Duration,
    ) -> SiftResult<Vec<SearchHit>>;

    /// All chunks of a document, ideally in one batched call.
    fn fetch_by_doc_id(
        &self,
        doc_id: &str,
        batch_size: usize,
        timeout: Duration,
    ) -> SiftResult<Vec<Chunk>>;
}
