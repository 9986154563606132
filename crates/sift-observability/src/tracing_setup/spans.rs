//! Span definitions per pipeline stage.

/// Whole-request span.
#[macro_export]
macro_rules! retrieval_span {
    ($query_id:expr, $query_len:expr) => {
        tracing::info_span!("sift.retrieval", query_id = %$query_id, query_len = $query_len)
    };
}

/// Window expansion over the reranked candidates.
#[macro_export]
macro_rules! merge_span {
    ($candidates:expr, $max_window_tokens:expr) => {
        tracing::debug_span!(
            "sift.merge",
            candidates = $candidates,
            max_window_tokens = $max_window_tokens
        )
    };
}

/// Cross-encoder scoring.
#[macro_export]
macro_rules! rerank_span {
    ($scorer:expr, $candidates:expr) => {
        tracing::debug_span!("sift.rerank", scorer = %$scorer, candidates = $candidates)
    };
}
