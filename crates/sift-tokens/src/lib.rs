//! # sift-tokens
//!
//! Token estimation behind the `ITokenEstimator` strategy.
//! `TokenCounter` counts exactly with `tiktoken-rs` (`cl100k_base`) and caches
//! results per content hash; `HeuristicEstimator` is the `chars / 4` fallback
//! used when the tokenizer is not compiled in or fails to load.

pub mod budget;
#[cfg(feature = "tiktoken")]
pub mod counter;
pub mod heuristic;
pub mod select;

pub use budget::TokenBudget;
#[cfg(feature = "tiktoken")]
pub use counter::TokenCounter;
pub use heuristic::HeuristicEstimator;
pub use select::select_estimator;
