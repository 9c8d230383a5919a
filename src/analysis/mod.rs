//! Analysis modules.
//!
//! Aggregation of normalized metas into completion metrics, and
//! filtering of the meta list.

pub mod aggregator;
pub mod filter;

pub use aggregator::*;
pub use filter::MetaFilter;
