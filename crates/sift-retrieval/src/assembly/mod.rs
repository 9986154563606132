//! Global context assembly: dedup across windows and fit the token budget.

pub mod assembler;

pub use assembler::{global_budget, AssembledContext, ContextAssembler};
