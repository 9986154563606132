//! # sift-retrieval
//!
//! Query vectors in, token-budgeted ordered context out.
//!
//! ## Architecture
//!
//! ```text
//! RetrievalEngine (IRetriever)
//! ├── HybridSearcher
//! │   ├── Dense search  ┐ rayon::join
//! │   ├── Sparse search ┘
//! │   └── RRF Fusion (reciprocal rank)
//! ├── MetadataBooster (BoostTable, optional ThemeRouting)
//! ├── RerankAdapter (IRerankScorer, HTTP scorer behind `http-reranker`)
//! ├── AutoMergeEngine (IChunkCache + ITokenEstimator, per-anchor windows)
//! └── ContextAssembler (dedup + global token budget)
//! ```

pub mod assembly;
pub mod boost;
pub mod degradation;
pub mod engine;
pub mod merge;
pub mod rerank;
pub mod search;

pub use assembly::{global_budget, AssembledContext, ContextAssembler};
pub use boost::{boost, boost_with_routing, BoostTable, ThemeRouting};
pub use engine::RetrievalEngine;
pub use merge::{AutoMergeEngine, MergeOutcome};
pub use rerank::{RerankAdapter, RerankOutcome};
pub use search::{HybridSearcher, SearchOutcome};
