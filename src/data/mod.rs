//! Market data types and CSV persistence
//!
//! Provides the validated OHLCV series consumed by the feature and target
//! builders, plus tabular I/O for option chains and run artifacts.

mod bar;
mod loader;

pub use bar::{DataError, PriceBar, PriceSeries};
pub use loader::{CsvStore, ForecastRow};
