mod chunk_cache;
mod rerank_scorer;
mod retriever;
mod token_estimator;
mod vector_index;

pub use chunk_cache::{IChunkCache, IChunkFetcher};
pub use rerank_scorer::IRerankScorer;
pub use retriever::IRetriever;
pub use token_estimator::ITokenEstimator;
pub use vector_index::IVectorIndex;
