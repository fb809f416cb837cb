//! Model training and prediction
//!
//! Feature scaling, regression trees, the bagged forest, forward-extrema
//! label construction, and the two-model range predictor built on top.

mod dataset;
mod decision_tree;
mod predictor;
mod random_forest;
mod scaler;
mod targets;

pub use dataset::TrainingSet;
pub use decision_tree::{DecisionTree, TreeConfig, TreeNode};
pub use predictor::{ModelError, RangeForecast, RangePredictor};
pub use random_forest::{ForestConfig, RandomForest};
pub use scaler::StandardScaler;
pub use targets::{build_targets, LabelPair};
