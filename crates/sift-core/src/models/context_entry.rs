use serde::{Deserialize, Serialize};

use super::{ChunkSpan, MergedWindow};

/// One passage of the assembled context handed to the answer generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextEntry {
    pub text: String,
    pub url: String,
    pub title: String,
    pub auto_merged: bool,
    pub merged_chunk_count: usize,
    pub chunk_span: ChunkSpan,
    pub merged_chunk_ids: Vec<String>,
    pub boosted_score: f64,
    pub rerank_score: Option<f64>,
    pub token_count: usize,
    pub rank: usize,
}

impl From<MergedWindow> for ContextEntry {
    fn from(w: MergedWindow) -> Self {
        Self {
            text: w.text,
            url: w.url,
            title: w.title,
            auto_merged: w.auto_merged,
            merged_chunk_count: w.merged_chunk_count,
            chunk_span: w.chunk_span,
            merged_chunk_ids: w.merged_chunk_ids,
            boosted_score: w.boosted_score,
            rerank_score: w.rerank_score,
            token_count: w.token_count,
            rank: w.rank,
        }
    }
}
