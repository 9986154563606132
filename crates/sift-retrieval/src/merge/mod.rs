//! Auto-merge: expand each anchor chunk into a window of its document neighbors.

pub mod auto_merge;

pub use auto_merge::{AutoMergeEngine, MergeOutcome};
