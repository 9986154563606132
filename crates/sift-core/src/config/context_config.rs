use serde::{Deserialize, Serialize};

use super::defaults;

/// Global context budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    pub max_context_tokens: usize,
    /// Fraction of `max_context_tokens` held back for the generated answer, in [0, 1).
    pub reserve_for_response: f64,
}

impl ContextConfig {
    /// Tokens available to assembled passages: `max × (1 − reserve)`, floored.
    pub fn global_budget(&self) -> usize {
        let ratio = (1.0 - self.reserve_for_response).clamp(0.0, 1.0);
        (self.max_context_tokens as f64 * ratio).floor() as usize
    }
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            max_context_tokens: defaults::DEFAULT_MAX_CONTEXT_TOKENS,
            reserve_for_response: defaults::DEFAULT_RESERVE_FOR_RESPONSE,
        }
    }
}
