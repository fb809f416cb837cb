//! Feature engineering module
//!
//! Technical indicator primitives and the fixed feature set consumed by
//! the range models.

mod builder;
mod indicators;

pub use builder::{FeatureBuilder, FeatureConfig, FeatureMatrix};
pub use indicators::{rolling_std, rsi, sma};
