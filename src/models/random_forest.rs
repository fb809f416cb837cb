//! Random forest regressor
//!
//! Bagged ensemble of CART regression trees with per-split feature
//! subsampling. Trees are grown in parallel; sampling is seeded so a run
//! is reproducible.

use super::dataset::TrainingSet;
use super::decision_tree::{DecisionTree, TreeConfig};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Random forest configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestConfig {
    /// Number of trees
    pub n_trees: usize,
    /// Maximum depth of each tree
    pub max_depth: usize,
    /// Minimum samples to attempt a split
    pub min_samples_split: usize,
    /// Minimum samples in a leaf
    pub min_samples_leaf: usize,
    /// Candidate features per split (None = n_features / 3)
    pub max_features: Option<usize>,
    /// Bootstrap sampling
    pub bootstrap: bool,
    /// Base random seed
    pub seed: u64,
    /// Compute out-of-bag R² after fitting
    pub oob_score: bool,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: 10,
            min_samples_split: 5,
            min_samples_leaf: 2,
            max_features: None,
            bootstrap: true,
            seed: 42,
            oob_score: true,
        }
    }
}

/// Random forest model
#[derive(Debug, Clone)]
pub struct RandomForest {
    config: ForestConfig,
    trees: Vec<DecisionTree>,
    feature_importances: Vec<f64>,
    oob_r2: Option<f64>,
}

impl RandomForest {
    pub fn new(config: ForestConfig) -> Self {
        Self {
            config,
            trees: Vec::new(),
            feature_importances: Vec::new(),
            oob_r2: None,
        }
    }

    /// Fit the forest on the training set.
    pub fn fit(&mut self, data: &TrainingSet) {
        let n_samples = data.n_samples();
        let n_features = data.n_features();
        let max_features = self
            .config
            .max_features
            .unwrap_or_else(|| (n_features / 3).max(1));

        // one bootstrap draw per tree, derived from the base seed so OOB
        // evaluation sees the same membership the tree trained on
        let in_bag: Vec<Vec<usize>> = (0..self.config.n_trees)
            .map(|i| {
                if self.config.bootstrap {
                    bootstrap_indices(n_samples, self.config.seed.wrapping_add(i as u64))
                } else {
                    (0..n_samples).collect()
                }
            })
            .collect();

        self.trees = in_bag
            .par_iter()
            .enumerate()
            .map(|(i, indices)| {
                let tree_config = TreeConfig {
                    max_depth: self.config.max_depth,
                    min_samples_split: self.config.min_samples_split,
                    min_samples_leaf: self.config.min_samples_leaf,
                    max_features: Some(max_features),
                    seed: self.config.seed.wrapping_add(i as u64),
                };
                let mut tree = DecisionTree::new(tree_config);
                tree.fit(&data.subset(indices));
                tree
            })
            .collect();

        self.feature_importances = vec![0.0; n_features];
        for tree in &self.trees {
            for (j, &importance) in tree.feature_importances().iter().enumerate() {
                self.feature_importances[j] += importance;
            }
        }
        let total: f64 = self.feature_importances.iter().sum();
        if total > 0.0 {
            for importance in &mut self.feature_importances {
                *importance /= total;
            }
        }

        self.oob_r2 = if self.config.oob_score && self.config.bootstrap {
            self.compute_oob_r2(data, &in_bag)
        } else {
            None
        };
    }

    /// R² over samples predicted only by trees that never saw them.
    fn compute_oob_r2(&self, data: &TrainingSet, in_bag: &[Vec<usize>]) -> Option<f64> {
        let n_samples = data.n_samples();
        let bags: Vec<HashSet<usize>> = in_bag
            .iter()
            .map(|indices| indices.iter().copied().collect())
            .collect();

        let mut residual = 0.0;
        let mut covered_targets = Vec::new();
        for i in 0..n_samples {
            let predictions: Vec<f64> = self
                .trees
                .iter()
                .zip(&bags)
                .filter(|(_, bag)| !bag.contains(&i))
                .map(|(tree, _)| tree.predict_one(&data.features[i]))
                .collect();
            if predictions.is_empty() {
                continue;
            }
            let prediction = predictions.iter().sum::<f64>() / predictions.len() as f64;
            residual += (prediction - data.targets[i]).powi(2);
            covered_targets.push(data.targets[i]);
        }

        if covered_targets.is_empty() {
            return None;
        }
        let mean = covered_targets.iter().sum::<f64>() / covered_targets.len() as f64;
        let total: f64 = covered_targets.iter().map(|t| (t - mean).powi(2)).sum();
        if total == 0.0 {
            None
        } else {
            Some(1.0 - residual / total)
        }
    }

    /// Predict for a single feature row by averaging the trees.
    pub fn predict_one(&self, row: &[f64]) -> f64 {
        if self.trees.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.trees.iter().map(|t| t.predict_one(row)).sum();
        sum / self.trees.len() as f64
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn feature_importances(&self) -> &[f64] {
        &self.feature_importances
    }

    pub fn oob_r2(&self) -> Option<f64> {
        self.oob_r2
    }
}

/// Sample-with-replacement index draw.
fn bootstrap_indices(n: usize, seed: u64) -> Vec<usize> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n).map(|_| rng.gen_range(0..n)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wavy_data(n: usize) -> TrainingSet {
        let mut data = TrainingSet::new(vec!["x1".to_string(), "x2".to_string()]);
        for i in 0..n {
            let x1 = i as f64 / 20.0;
            let x2 = (i as f64 / 10.0).sin();
            data.add_sample(vec![x1, x2], x1 + 2.0 * x2);
        }
        data
    }

    #[test]
    fn test_fit_and_predict() {
        let data = wavy_data(200);
        let mut forest = RandomForest::new(ForestConfig {
            n_trees: 10,
            max_depth: 5,
            ..Default::default()
        });
        forest.fit(&data);

        assert_eq!(forest.n_trees(), 10);
        assert_eq!(forest.feature_importances().len(), 2);

        let prediction = forest.predict_one(&data.features[100]);
        assert!(prediction.is_finite());
    }

    #[test]
    fn test_oob_r2_reported() {
        let data = wavy_data(200);
        let mut forest = RandomForest::new(ForestConfig {
            n_trees: 20,
            max_depth: 6,
            ..Default::default()
        });
        forest.fit(&data);

        let r2 = forest.oob_r2().expect("oob should be computed");
        assert!(r2 > 0.0, "oob r2 {r2} unexpectedly poor");
    }

    #[test]
    fn test_deterministic_with_seed() {
        let data = wavy_data(150);
        let config = ForestConfig {
            n_trees: 5,
            max_depth: 4,
            oob_score: false,
            ..Default::default()
        };

        let mut a = RandomForest::new(config.clone());
        let mut b = RandomForest::new(config);
        a.fit(&data);
        b.fit(&data);

        assert_eq!(a.predict_one(&[3.0, 0.5]), b.predict_one(&[3.0, 0.5]));
    }

    #[test]
    fn test_bootstrap_indices_in_range() {
        let indices = bootstrap_indices(50, 7);
        assert_eq!(indices.len(), 50);
        assert!(indices.iter().all(|&i| i < 50));
    }
}
