//! Per-symbol forecasting pipeline
//!
//! Pure computation from (history, chain) to (forecast, selections);
//! fetching and persistence live with the callers. Symbols share no
//! state, so a batch can run them in any order or in parallel.

use crate::data::{DataError, PriceSeries};
use crate::features::{FeatureBuilder, FeatureConfig};
use crate::models::{ForestConfig, ModelError, RangePredictor};
use crate::options::{self, OptionContract, SelectedOption};
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error("price history for {0} is empty")]
    EmptyHistory(String),
}

/// Point forecast for one symbol.
#[derive(Debug, Clone, Serialize)]
pub struct ForecastResult {
    pub symbol: String,
    pub current_price: f64,
    pub predicted_high: f64,
    pub predicted_low: f64,
}

impl ForecastResult {
    pub fn high_change_pct(&self) -> f64 {
        (self.predicted_high - self.current_price) / self.current_price * 100.0
    }

    pub fn low_change_pct(&self) -> f64 {
        (self.predicted_low - self.current_price) / self.current_price * 100.0
    }
}

/// Forecast plus the option contracts it qualifies.
#[derive(Debug, Clone)]
pub struct SymbolReport {
    pub forecast: ForecastResult,
    pub selections: Vec<SelectedOption>,
}

/// Knobs for one batch run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub horizon_days: usize,
    pub features: FeatureConfig,
    pub forest: ForestConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            horizon_days: 30,
            features: FeatureConfig::default(),
            forest: ForestConfig::default(),
        }
    }
}

/// Run the full forecast for one symbol: features, two-model training,
/// range prediction, option screening. `chain` may be empty.
pub fn analyze_symbol(
    symbol: &str,
    series: &PriceSeries,
    chain: &[OptionContract],
    config: &PipelineConfig,
    as_of: DateTime<Utc>,
) -> Result<SymbolReport, PipelineError> {
    let current_price = series
        .last_close()
        .ok_or_else(|| PipelineError::EmptyHistory(symbol.to_string()))?;

    let builder = FeatureBuilder::with_config(config.features.clone());
    let features = builder.build(series);

    let mut predictor = RangePredictor::new(config.forest.clone(), config.features.max_window());
    predictor.train(&features, series, config.horizon_days)?;
    let range = predictor.predict(&features)?;

    let selections = options::select(
        chain,
        current_price,
        range.high,
        range.low,
        config.horizon_days,
        as_of,
    );
    info!(
        symbol,
        current = current_price,
        high = range.high,
        low = range.low,
        selected = selections.len(),
        "symbol analyzed"
    );

    Ok(SymbolReport {
        forecast: ForecastResult {
            symbol: symbol.to_string(),
            current_price,
            predicted_high: range.high,
            predicted_low: range.low,
        },
        selections,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::PriceBar;
    use crate::options::OptionType;
    use chrono::{Duration, TimeZone};

    fn series(n: usize) -> PriceSeries {
        let bars = (0..n)
            .map(|i| {
                let close = 100.0 + ((i as f64) * 0.17).sin() * 6.0 + (i as f64 % 5.0) * 0.4;
                PriceBar::new(
                    i as i64 * 86_400_000,
                    close,
                    close + 2.0,
                    close - 2.0,
                    close,
                    3000.0 + (i as f64 * 13.0) % 700.0,
                )
            })
            .collect();
        PriceSeries::from_bars(bars).unwrap()
    }

    fn config() -> PipelineConfig {
        PipelineConfig {
            horizon_days: 10,
            forest: ForestConfig {
                n_trees: 10,
                max_depth: 5,
                oob_score: false,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_end_to_end_report() {
        let series = series(200);
        let as_of = Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap();
        // generous strikes so the synthetic forecast qualifies something
        let chain = vec![
            OptionContract::new("TEST", OptionType::Call, 10.0, 1.0, as_of + Duration::days(5)),
            OptionContract::new("TEST", OptionType::Put, 500.0, 1.0, as_of + Duration::days(5)),
        ];

        let report = analyze_symbol("TEST", &series, &chain, &config(), as_of).unwrap();

        assert_eq!(report.forecast.symbol, "TEST");
        assert!(report.forecast.predicted_high.is_finite());
        assert!(report.forecast.predicted_low.is_finite());
        assert_eq!(report.selections.len(), 2);
        assert_eq!(report.selections[0].current_price, report.forecast.current_price);
    }

    #[test]
    fn test_short_history_is_reported_not_hidden() {
        let series = series(30);
        let as_of = Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap();

        let result = analyze_symbol("TEST", &series, &[], &config(), as_of);
        assert!(matches!(
            result,
            Err(PipelineError::Model(
                ModelError::InsufficientTrainingData { .. }
            ))
        ));
    }

    #[test]
    fn test_empty_chain_yields_empty_selection() {
        let series = series(200);
        let as_of = Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap();

        let report = analyze_symbol("TEST", &series, &[], &config(), as_of).unwrap();
        assert!(report.selections.is_empty());
    }
}
