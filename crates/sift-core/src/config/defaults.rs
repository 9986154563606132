// Single source of truth for all default values.

// --- Retrieval ---
pub const DEFAULT_RRF_K: u32 = 60;
pub const DEFAULT_MAX_CANDIDATES_N: usize = 50;
pub const DEFAULT_TOP_K: usize = 8;
pub const DEFAULT_DENSE_K: usize = 50;
pub const DEFAULT_SPARSE_K: usize = 50;
pub const DEFAULT_SPARSE_ENABLED: bool = true;
pub const DEFAULT_PARALLEL_SEARCH: bool = true;
pub const DEFAULT_SEARCH_TIMEOUT_MS: u64 = 3_000;

// --- Auto-merge ---
pub const DEFAULT_AUTO_MERGE_ENABLED: bool = true;
pub const DEFAULT_MAX_WINDOW_TOKENS: i64 = 800;
pub const DEFAULT_FETCH_BATCH_SIZE: usize = 256;
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 2_000;

// --- Context ---
pub const DEFAULT_MAX_CONTEXT_TOKENS: usize = 6_000;
pub const DEFAULT_RESERVE_FOR_RESPONSE: f64 = 0.25;

// --- Cache ---
pub const DEFAULT_CACHE_MAXSIZE: i64 = 1_024;
pub const DEFAULT_CACHE_TTL_SECONDS: u64 = 300; // 5 minutes

// --- Reranker ---
pub const DEFAULT_RERANKER_ENABLED: bool = false;
pub const DEFAULT_RERANKER_TIMEOUT_MS: u64 = 2_000;

// --- Tokens ---
pub const DEFAULT_TOKEN_CACHE_CAPACITY: u64 = 10_000;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = false;
