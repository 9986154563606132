/// Document chunk cache errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CacheError {
    #[error("chunk fetch failed for document {doc_id}: {reason}")]
    FetchFailed { doc_id: String, reason: String },

    #[error("document {doc_id} has no chunks")]
    DocumentNotFound { doc_id: String },
}
