//! Two-model high/low range predictor
//!
//! Owns one fitted scaling transform and two independently trained
//! forests, one per forecast bound. Both regressors are fit on the same
//! valid-row mask so their predictions refer to the same time step.

use super::dataset::TrainingSet;
use super::random_forest::{ForestConfig, RandomForest};
use super::scaler::StandardScaler;
use super::targets::build_targets;
use crate::data::PriceSeries;
use crate::features::FeatureMatrix;
use ndarray::Array2;
use thiserror::Error;
use tracing::{debug, info};

/// Errors raised by training and prediction.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("insufficient training data: {rows} usable rows, need more than {required}")]
    InsufficientTrainingData { rows: usize, required: usize },

    #[error("feature schema mismatch: trained on {expected:?}, got {actual:?}")]
    SchemaMismatch {
        expected: Vec<String>,
        actual: Vec<String>,
    },

    #[error("predict called before train")]
    UntrainedModel,

    #[error("forecast horizon must be at least 1")]
    InvalidHorizon,

    #[error("feature matrix has no rows")]
    EmptyFeatures,

    #[error("features and series are misaligned: {features} rows vs {bars} bars")]
    Misaligned { features: usize, bars: usize },
}

/// Point forecast for the most recent feature row.
#[derive(Debug, Clone, Copy)]
pub struct RangeForecast {
    pub high: f64,
    pub low: f64,
}

struct FittedState {
    scaler: StandardScaler,
    high_model: RandomForest,
    low_model: RandomForest,
    feature_names: Vec<String>,
}

/// High/low range forecaster.
///
/// Retraining rebuilds all fitted state from scratch; there is no
/// incremental update path. The two bound predictions are independently
/// produced scalars with no ordering guarantee between them.
pub struct RangePredictor {
    forest_config: ForestConfig,
    min_window: usize,
    fitted: Option<FittedState>,
}

impl RangePredictor {
    /// `min_window` is the longest trailing feature window; together with
    /// the horizon it sets the usable-row floor for training.
    pub fn new(forest_config: ForestConfig, min_window: usize) -> Self {
        Self {
            forest_config,
            min_window,
            fitted: None,
        }
    }

    pub fn is_trained(&self) -> bool {
        self.fitted.is_some()
    }

    /// Fit the scaler and both bound models on rows where every feature
    /// is defined and a forward label exists.
    pub fn train(
        &mut self,
        features: &FeatureMatrix,
        series: &PriceSeries,
        horizon: usize,
    ) -> Result<(), ModelError> {
        if horizon == 0 {
            return Err(ModelError::InvalidHorizon);
        }
        if features.n_rows() != series.len() {
            return Err(ModelError::Misaligned {
                features: features.n_rows(),
                bars: series.len(),
            });
        }

        let labels = build_targets(series, horizon);
        let mut rows: Vec<Vec<f64>> = Vec::new();
        let mut high_targets: Vec<f64> = Vec::new();
        let mut low_targets: Vec<f64> = Vec::new();
        for i in 0..features.n_rows() {
            if !features.is_complete(i) {
                continue;
            }
            let Some(pair) = labels[i] else { continue };
            rows.push(features.row(i).to_vec());
            high_targets.push(pair.future_high);
            low_targets.push(pair.future_low);
        }

        let required = horizon.max(self.min_window);
        if rows.len() <= required {
            return Err(ModelError::InsufficientTrainingData {
                rows: rows.len(),
                required,
            });
        }

        let n_rows = rows.len();
        let n_features = features.n_features();
        let x = Array2::from_shape_fn((n_rows, n_features), |(i, j)| rows[i][j]);
        let scaler = StandardScaler::fit(&x);
        let scaled: Vec<Vec<f64>> = scaler
            .transform(&x)
            .outer_iter()
            .map(|row| row.to_vec())
            .collect();

        let names = features.names().to_vec();
        let mut high_model = RandomForest::new(self.forest_config.clone());
        let mut low_model = RandomForest::new(self.forest_config.clone());
        high_model.fit(&TrainingSet::from_rows(
            scaled.clone(),
            high_targets,
            names.clone(),
        ));
        low_model.fit(&TrainingSet::from_rows(scaled, low_targets, names.clone()));

        if let (Some(high_r2), Some(low_r2)) = (high_model.oob_r2(), low_model.oob_r2()) {
            debug!(high_r2, low_r2, "out-of-bag fit");
        }
        info!(rows = n_rows, horizon, "trained range models");

        self.fitted = Some(FittedState {
            scaler,
            high_model,
            low_model,
            feature_names: names,
        });
        Ok(())
    }

    /// Forecast the high/low bounds for the most recent feature row.
    pub fn predict(&self, features: &FeatureMatrix) -> Result<RangeForecast, ModelError> {
        let fitted = self.fitted.as_ref().ok_or(ModelError::UntrainedModel)?;
        if features.names() != fitted.feature_names.as_slice() {
            return Err(ModelError::SchemaMismatch {
                expected: fitted.feature_names.clone(),
                actual: features.names().to_vec(),
            });
        }

        let latest = features.rows().last().ok_or(ModelError::EmptyFeatures)?;
        let scaled = fitted.scaler.transform_row(latest);
        Ok(RangeForecast {
            high: fitted.high_model.predict_one(&scaled),
            low: fitted.low_model.predict_one(&scaled),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::PriceBar;
    use crate::features::{FeatureBuilder, FeatureConfig};

    fn series(n: usize) -> PriceSeries {
        let bars = (0..n)
            .map(|i| {
                let close = 100.0 + ((i as f64) * 0.21).sin() * 8.0 + (i as f64 % 7.0) * 0.3;
                PriceBar::new(
                    i as i64 * 86_400_000,
                    close,
                    close + 1.5,
                    close - 1.5,
                    close,
                    5000.0 + (i as f64 * 11.0) % 900.0,
                )
            })
            .collect();
        PriceSeries::from_bars(bars).unwrap()
    }

    fn small_forest() -> ForestConfig {
        ForestConfig {
            n_trees: 10,
            max_depth: 5,
            oob_score: false,
            ..Default::default()
        }
    }

    fn predictor() -> RangePredictor {
        RangePredictor::new(small_forest(), FeatureConfig::default().max_window())
    }

    #[test]
    fn test_train_and_predict_finite_pair() {
        let series = series(160);
        let features = FeatureBuilder::new().build(&series);

        let mut model = predictor();
        model.train(&features, &series, 10).unwrap();
        let forecast = model.predict(&features).unwrap();

        // two independently produced scalars; no high >= low guarantee
        assert!(forecast.high.is_finite());
        assert!(forecast.low.is_finite());
    }

    #[test]
    fn test_predict_before_train_fails() {
        let series = series(160);
        let features = FeatureBuilder::new().build(&series);

        let model = predictor();
        assert!(matches!(
            model.predict(&features),
            Err(ModelError::UntrainedModel)
        ));
    }

    #[test]
    fn test_schema_mismatch_rejected() {
        let series = series(160);
        let features = FeatureBuilder::new().build(&series);

        let mut model = predictor();
        model.train(&features, &series, 10).unwrap();

        let other = FeatureBuilder::with_config(FeatureConfig {
            sma_fast: 10,
            ..Default::default()
        })
        .build(&series);
        assert!(matches!(
            model.predict(&other),
            Err(ModelError::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn test_horizon_exceeding_history_fails() {
        let series = series(60);
        let features = FeatureBuilder::new().build(&series);

        let mut model = predictor();
        assert!(matches!(
            model.train(&features, &series, 60),
            Err(ModelError::InsufficientTrainingData { .. })
        ));
    }

    #[test]
    fn test_short_history_fails() {
        let series = series(40);
        let features = FeatureBuilder::new().build(&series);

        let mut model = predictor();
        assert!(matches!(
            model.train(&features, &series, 10),
            Err(ModelError::InsufficientTrainingData { .. })
        ));
    }

    #[test]
    fn test_zero_horizon_rejected() {
        let series = series(160);
        let features = FeatureBuilder::new().build(&series);

        let mut model = predictor();
        assert!(matches!(
            model.train(&features, &series, 0),
            Err(ModelError::InvalidHorizon)
        ));
    }
}
