//! # rangecast: price range forecasting and options screening
//!
//! Forecasts short-term high/low price ranges from OHLCV history with a
//! pair of random-forest regressors (one per bound, shared feature
//! scaling), then screens an options chain for contracts whose
//! strike/premium combination sits inside the forecast band.
//!
//! ## Modules
//!
//! - `api` - async client for daily price history
//! - `data` - validated OHLCV series and CSV persistence
//! - `features` - technical indicators and the feature matrix
//! - `models` - scaler, regression forest, labels, range predictor
//! - `options` - option contracts and the forecast-driven screen
//! - `pipeline` - the per-symbol computation tying it together

pub mod api;
pub mod data;
pub mod features;
pub mod models;
pub mod options;
pub mod pipeline;

pub use data::{PriceBar, PriceSeries};
pub use features::{FeatureBuilder, FeatureMatrix};
pub use models::{RangeForecast, RangePredictor};
pub use options::{OptionContract, OptionType, SelectedOption};
pub use pipeline::{analyze_symbol, ForecastResult, PipelineConfig, SymbolReport};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::api::StooqClient;
    pub use crate::data::{CsvStore, ForecastRow, PriceBar, PriceSeries};
    pub use crate::features::{FeatureBuilder, FeatureConfig, FeatureMatrix};
    pub use crate::models::{ForestConfig, RangeForecast, RangePredictor};
    pub use crate::options::{OptionContract, OptionType, SelectedOption};
    pub use crate::pipeline::{analyze_symbol, ForecastResult, PipelineConfig, SymbolReport};
}
