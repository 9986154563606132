/// Text → token count. Exact (tokenizer-backed) or heuristic.
pub trait ITokenEstimator: Send + Sync {
    /// Estimated token count of `text`.
    fn estimate(&self, text: &str) -> usize;

    /// Human-readable estimator name.
    fn name(&self) -> &str;

    /// Whether counts come from a real tokenizer.
    fn is_exact(&self) -> bool;
}
