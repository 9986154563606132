//! Fixture corpus: documents with pre-computed dense and sparse vectors.

use serde::Deserialize;
use sift_core::models::{Chunk, Metadata, QueryVectors, SparseVector};

#[derive(Debug, Clone, Deserialize)]
pub struct FixtureChunk {
    pub index: u32,
    pub text: String,
    #[serde(default)]
    pub metadata: Metadata,
    pub dense: Vec<f32>,
    #[serde(default)]
    pub sparse: SparseVector,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FixtureDocument {
    pub doc_id: String,
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub metadata: Metadata,
    pub chunks: Vec<FixtureChunk>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorpusFixture {
    pub description: String,
    pub documents: Vec<FixtureDocument>,
}

impl FixtureDocument {
    /// Chunks with document metadata merged under chunk metadata.
    pub fn to_chunks(&self) -> Vec<(Chunk, Vec<f32>, SparseVector)> {
        self.chunks
            .iter()
            .map(|fc| {
                let mut metadata = self.metadata.clone();
                metadata.extend(fc.metadata.clone());
                let chunk = Chunk {
                    chunk_id: Chunk::make_id(&self.doc_id, fc.index),
                    doc_id: self.doc_id.clone(),
                    index: fc.index,
                    text: fc.text.clone(),
                    url: self.url.clone(),
                    title: self.title.clone(),
                    metadata,
                };
                (chunk, fc.dense.clone(), fc.sparse.clone())
            })
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct QueryFixture {
    pub name: String,
    pub text: String,
    pub dense: Vec<f32>,
    #[serde(default)]
    pub sparse: SparseVector,
    pub expect_first_doc: String,
}

impl QueryFixture {
    pub fn vectors(&self) -> QueryVectors {
        QueryVectors {
            dense: Some(self.dense.clone()),
            sparse: Some(self.sparse.clone()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuerySet {
    pub queries: Vec<QueryFixture>,
}
