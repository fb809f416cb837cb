//! CART regression tree

use super::dataset::TrainingSet;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Decision tree configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Maximum depth of the tree
    pub max_depth: usize,
    /// Minimum samples required to attempt a split
    pub min_samples_split: usize,
    /// Minimum samples in a leaf
    pub min_samples_leaf: usize,
    /// Candidate features per split (None = all)
    pub max_features: Option<usize>,
    /// Random seed for feature subsampling
    pub seed: u64,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: 10,
            min_samples_split: 5,
            min_samples_leaf: 2,
            max_features: None,
            seed: 42,
        }
    }
}

/// Tree node: internal nodes carry a split, leaves carry the mean target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeNode {
    feature_idx: Option<usize>,
    threshold: Option<f64>,
    value: f64,
    n_samples: usize,
    impurity: f64,
    left: Option<Box<TreeNode>>,
    right: Option<Box<TreeNode>>,
}

impl TreeNode {
    fn leaf(value: f64, n_samples: usize, impurity: f64) -> Self {
        Self {
            feature_idx: None,
            threshold: None,
            value,
            n_samples,
            impurity,
            left: None,
            right: None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    pub fn depth(&self) -> usize {
        if self.is_leaf() {
            1
        } else {
            let left = self.left.as_ref().map(|n| n.depth()).unwrap_or(0);
            let right = self.right.as_ref().map(|n| n.depth()).unwrap_or(0);
            1 + left.max(right)
        }
    }
}

struct Split {
    feature_idx: usize,
    threshold: f64,
    left: Vec<usize>,
    right: Vec<usize>,
    importance: f64,
}

/// Regression tree minimizing within-node MSE.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    config: TreeConfig,
    root: Option<TreeNode>,
    feature_importances: Vec<f64>,
}

impl DecisionTree {
    pub fn new(config: TreeConfig) -> Self {
        Self {
            config,
            root: None,
            feature_importances: Vec::new(),
        }
    }

    /// Fit the tree on the full training set.
    pub fn fit(&mut self, data: &TrainingSet) {
        self.feature_importances = vec![0.0; data.n_features()];

        let indices: Vec<usize> = (0..data.n_samples()).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        self.root = Some(self.grow(data, &indices, 0, &mut rng));

        let total: f64 = self.feature_importances.iter().sum();
        if total > 0.0 {
            for importance in &mut self.feature_importances {
                *importance /= total;
            }
        }
    }

    fn grow(
        &mut self,
        data: &TrainingSet,
        indices: &[usize],
        depth: usize,
        rng: &mut ChaCha8Rng,
    ) -> TreeNode {
        let targets: Vec<f64> = indices.iter().map(|&i| data.targets[i]).collect();
        let impurity = mse(&targets);
        let node_value = mean(&targets);

        if depth >= self.config.max_depth
            || indices.len() < self.config.min_samples_split
            || impurity < 1e-10
        {
            return TreeNode::leaf(node_value, indices.len(), impurity);
        }

        let Some(split) = self.best_split(data, indices, impurity, rng) else {
            return TreeNode::leaf(node_value, indices.len(), impurity);
        };
        if split.left.len() < self.config.min_samples_leaf
            || split.right.len() < self.config.min_samples_leaf
        {
            return TreeNode::leaf(node_value, indices.len(), impurity);
        }

        self.feature_importances[split.feature_idx] += split.importance;

        let left = self.grow(data, &split.left, depth + 1, rng);
        let right = self.grow(data, &split.right, depth + 1, rng);

        TreeNode {
            feature_idx: Some(split.feature_idx),
            threshold: Some(split.threshold),
            value: node_value,
            n_samples: indices.len(),
            impurity,
            left: Some(Box::new(left)),
            right: Some(Box::new(right)),
        }
    }

    /// Best MSE-reducing split over a random feature subset, trying
    /// midpoints between consecutive distinct values as thresholds.
    fn best_split(
        &self,
        data: &TrainingSet,
        indices: &[usize],
        parent_impurity: f64,
        rng: &mut ChaCha8Rng,
    ) -> Option<Split> {
        let n_features = data.n_features();
        let max_features = self.config.max_features.unwrap_or(n_features);

        let mut candidates: Vec<usize> = (0..n_features).collect();
        candidates.shuffle(rng);
        candidates.truncate(max_features.max(1));

        let mut best_gain = 0.0;
        let mut best: Option<Split> = None;

        for &feature_idx in &candidates {
            let mut values: Vec<f64> = indices
                .iter()
                .map(|&i| data.features[i][feature_idx])
                .collect();
            values.sort_by(|a, b| a.total_cmp(b));
            values.dedup();

            for pair in values.windows(2) {
                let threshold = (pair[0] + pair[1]) / 2.0;
                let (left, right): (Vec<usize>, Vec<usize>) = indices
                    .iter()
                    .partition(|&&i| data.features[i][feature_idx] <= threshold);
                if left.is_empty() || right.is_empty() {
                    continue;
                }

                let left_targets: Vec<f64> = left.iter().map(|&i| data.targets[i]).collect();
                let right_targets: Vec<f64> = right.iter().map(|&i| data.targets[i]).collect();

                let n_left = left.len() as f64;
                let n_right = right.len() as f64;
                let weighted = (n_left * mse(&left_targets) + n_right * mse(&right_targets))
                    / (n_left + n_right);
                let gain = parent_impurity - weighted;

                if gain > best_gain {
                    best_gain = gain;
                    best = Some(Split {
                        feature_idx,
                        threshold,
                        left,
                        right,
                        importance: gain * indices.len() as f64,
                    });
                }
            }
        }
        best
    }

    /// Predict the target for a single feature row.
    pub fn predict_one(&self, row: &[f64]) -> f64 {
        let Some(mut node) = self.root.as_ref() else {
            return 0.0;
        };
        loop {
            match (node.feature_idx, node.threshold, &node.left, &node.right) {
                (Some(feature_idx), Some(threshold), Some(left), Some(right)) => {
                    node = if row[feature_idx] <= threshold {
                        left
                    } else {
                        right
                    };
                }
                _ => return node.value,
            }
        }
    }

    pub fn feature_importances(&self) -> &[f64] {
        &self.feature_importances
    }

    pub fn root(&self) -> Option<&TreeNode> {
        self.root.as_ref()
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn mse(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64
}
