/// sift version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Characters per token assumed by the heuristic estimator.
pub const HEURISTIC_CHARS_PER_TOKEN: usize = 4;

/// Documented error bound of the heuristic estimator against a BPE tokenizer (±15%).
pub const HEURISTIC_ERROR_BOUND: f64 = 0.15;

/// Separator between chunk bodies inside a merged window.
pub const DEFAULT_WINDOW_SEPARATOR: &str = "\n\n";

/// Environment variable prefix for config overrides.
pub const ENV_PREFIX: &str = "SIFT_";

/// Metadata keys read by the booster.
pub mod metadata_keys {
    pub const PAGE_TYPE: &str = "page_type";
    pub const SECTION: &str = "section";
    pub const PLATFORM: &str = "platform";
    pub const THEME: &str = "theme";
}
