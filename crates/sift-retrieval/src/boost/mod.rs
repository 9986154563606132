//! Metadata-driven score boosting.

pub mod booster;
pub mod table;

pub use booster::{boost, boost_with_routing, ThemeRouting};
pub use table::BoostTable;
