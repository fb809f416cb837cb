//! Feature construction from price history
//!
//! Turns an OHLCV series into a fixed-order indicator matrix aligned 1:1
//! with the input bars. Leading positions where a rolling window is not
//! yet full are forward-filled from the nearest defined prior value; rows
//! before any value exists stay undefined.

use super::indicators::{rolling_std, rsi, sma};
use crate::data::PriceSeries;

/// Rolling window configuration for the feature set.
#[derive(Debug, Clone)]
pub struct FeatureConfig {
    pub sma_fast: usize,
    pub sma_slow: usize,
    pub rsi_period: usize,
    pub volatility_period: usize,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            sma_fast: 20,
            sma_slow: 50,
            rsi_period: 14,
            volatility_period: 20,
        }
    }
}

impl FeatureConfig {
    /// Longest trailing window in the set; rows past this index are fully
    /// defined for any valid series.
    pub fn max_window(&self) -> usize {
        self.sma_fast
            .max(self.sma_slow)
            .max(self.rsi_period + 1)
            .max(self.volatility_period)
    }
}

/// Per-bar feature rows, aligned 1:1 with the source series.
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    names: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl FeatureMatrix {
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_features(&self) -> usize {
        self.names.len()
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.rows[i]
    }

    /// Row has a defined value in every column.
    pub fn is_complete(&self, i: usize) -> bool {
        self.rows[i].iter().all(|v| !v.is_nan())
    }
}

/// Builds the indicator feature set for the range models.
pub struct FeatureBuilder {
    config: FeatureConfig,
}

impl Default for FeatureBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureBuilder {
    pub fn new() -> Self {
        Self {
            config: FeatureConfig::default(),
        }
    }

    pub fn with_config(config: FeatureConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FeatureConfig {
        &self.config
    }

    /// Compute the feature matrix for a series, one row per bar.
    pub fn build(&self, series: &PriceSeries) -> FeatureMatrix {
        let closes = series.closes();

        let mut columns = vec![
            sma(&closes, self.config.sma_fast),
            sma(&closes, self.config.sma_slow),
            rsi(&closes, self.config.rsi_period),
            rolling_std(&closes, self.config.volatility_period),
            series.volumes(),
        ];
        for column in &mut columns {
            forward_fill(column);
        }

        let names = vec![
            format!("sma_{}", self.config.sma_fast),
            format!("sma_{}", self.config.sma_slow),
            format!("rsi_{}", self.config.rsi_period),
            format!("volatility_{}", self.config.volatility_period),
            "volume".to_string(),
        ];
        let rows = (0..series.len())
            .map(|i| columns.iter().map(|c| c[i]).collect())
            .collect();

        FeatureMatrix { names, rows }
    }
}

/// Replace NaN with the most recent defined value, strictly forward in
/// time; a NaN prefix with no prior value stays NaN.
fn forward_fill(column: &mut [f64]) {
    let mut last = f64::NAN;
    for value in column.iter_mut() {
        if value.is_nan() {
            if !last.is_nan() {
                *value = last;
            }
        } else {
            last = *value;
        }
    }
}
