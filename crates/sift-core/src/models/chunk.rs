use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Free-form chunk metadata (page type, section, platform, structural signals, theme).
pub type Metadata = BTreeMap<String, serde_json::Value>;

/// An immutable passage produced at ingestion time and owned by the external index.
///
/// `index` orders chunks within their document. Indices are unique per document
/// but not necessarily contiguous: deleted chunks leave gaps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub chunk_id: String,
    pub doc_id: String,
    pub index: u32,
    pub text: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub metadata: Metadata,
}

impl Chunk {
    /// Build the conventional chunk id for a document position.
    pub fn make_id(doc_id: &str, index: u32) -> String {
        format!("{doc_id}#{index}")
    }

    /// Look up a metadata value as a string, if it is one.
    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(|v| v.as_str())
    }
}

/// One ranked result from a dense or sparse search. Higher `score` is better.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub chunk: Chunk,
    pub score: f64,
}

impl SearchHit {
    pub fn new(chunk: Chunk, score: f64) -> Self {
        Self { chunk, score }
    }

    pub fn chunk_id(&self) -> &str {
        &self.chunk.chunk_id
    }
}
