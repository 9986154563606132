//! Configuration system for sift.
//! TOML-based, 3-layer resolution: env > file > defaults.

pub mod boost_config;
pub mod cache_config;
pub mod context_config;
pub mod defaults;
pub mod merge_config;
pub mod observability_config;
pub mod reranker_config;
pub mod retrieval_config;
pub mod sift_config;
pub mod tokens_config;

pub use boost_config::{BoostTableConfig, KeywordRule, PatternRule};
pub use cache_config::CacheConfig;
pub use context_config::ContextConfig;
pub use merge_config::MergeConfig;
pub use observability_config::ObservabilityConfig;
pub use reranker_config::RerankerConfig;
pub use retrieval_config::RetrievalConfig;
pub use sift_config::SiftConfig;
pub use tokens_config::{EstimatorKind, TokensConfig};
