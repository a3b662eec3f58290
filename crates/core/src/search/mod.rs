//! Query validation, fan-out across sources, normalization and ranking.

mod aggregator;
mod normalize;
mod rank;
mod types;

pub use aggregator::Aggregator;
pub use normalize::{normalize, NormalizeError};
pub use rank::rank;
pub use types::*;
