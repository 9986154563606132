use serde::{Deserialize, Serialize};

/// Inclusive range of chunk indices covered by a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkSpan {
    pub start: u32,
    pub end: u32,
}

impl ChunkSpan {
    pub fn single(index: u32) -> Self {
        Self {
            start: index,
            end: index,
        }
    }
}

/// A contiguous run of a document's chunks around an anchor.
///
/// Transient: built per request by the auto-merge stage and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedWindow {
    pub anchor_chunk_id: String,
    pub doc_id: String,
    pub url: String,
    pub title: String,
    /// Chunk indices in ascending order.
    pub chunk_indices: Vec<u32>,
    /// Chunk ids aligned with `chunk_indices`.
    pub merged_chunk_ids: Vec<String>,
    pub chunk_span: ChunkSpan,
    pub text: String,
    pub token_count: usize,
    pub auto_merged: bool,
    pub merged_chunk_count: usize,
    /// Length of `text` in characters.
    pub content_length: usize,
    /// Position of the anchor in rerank order (0-based).
    pub rank: usize,
    pub boosted_score: f64,
    pub rerank_score: Option<f64>,
}
