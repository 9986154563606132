use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;
use crate::constants::DEFAULT_WINDOW_SEPARATOR;

/// Auto-merge window expansion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    pub auto_merge_enabled: bool,
    /// Per-window token budget. 0 disables merging; negative values are rejected.
    pub max_window_tokens: i64,
    /// Joined between chunk bodies inside a window.
    pub separator: String,
    /// Chunks requested per batch when fetching a document.
    pub fetch_batch_size: usize,
    /// Deadline for fetching one document's chunks.
    pub fetch_timeout_ms: u64,
}

impl MergeConfig {
    /// Window budget the merge engine should run with.
    pub fn effective_window_tokens(&self) -> usize {
        if self.auto_merge_enabled {
            usize::try_from(self.max_window_tokens).unwrap_or(0)
        } else {
            0
        }
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            auto_merge_enabled: defaults::DEFAULT_AUTO_MERGE_ENABLED,
            max_window_tokens: defaults::DEFAULT_MAX_WINDOW_TOKENS,
            separator: DEFAULT_WINDOW_SEPARATOR.to_string(),
            fetch_batch_size: defaults::DEFAULT_FETCH_BATCH_SIZE,
            fetch_timeout_ms: defaults::DEFAULT_FETCH_TIMEOUT_MS,
        }
    }
}
