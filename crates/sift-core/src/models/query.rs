use serde::{Deserialize, Serialize};

/// Sparse query vector (e.g. SPLADE or BM25 term weights).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    pub indices: Vec<u32>,
    pub values: Vec<f32>,
}

impl SparseVector {
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Output of the external query embedder. Opaque to this crate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryVectors {
    pub dense: Option<Vec<f32>>,
    pub sparse: Option<SparseVector>,
}

impl QueryVectors {
    pub fn dense_only(dense: Vec<f32>) -> Self {
        Self {
            dense: Some(dense),
            sparse: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.dense.as_ref().map_or(true, |d| d.is_empty())
            && self.sparse.as_ref().map_or(true, |s| s.is_empty())
    }
}
