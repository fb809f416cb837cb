//! Training set container

/// Row-aligned feature rows and a single target column.
///
/// The range predictor builds one of these per target (future high,
/// future low) from the same valid-row mask, so both regressors always
/// see identical row alignment.
#[derive(Debug, Clone)]
pub struct TrainingSet {
    pub features: Vec<Vec<f64>>,
    pub targets: Vec<f64>,
    pub feature_names: Vec<String>,
}

impl TrainingSet {
    pub fn new(feature_names: Vec<String>) -> Self {
        Self {
            features: Vec::new(),
            targets: Vec::new(),
            feature_names,
        }
    }

    pub fn from_rows(
        features: Vec<Vec<f64>>,
        targets: Vec<f64>,
        feature_names: Vec<String>,
    ) -> Self {
        debug_assert_eq!(features.len(), targets.len());
        Self {
            features,
            targets,
            feature_names,
        }
    }

    pub fn n_samples(&self) -> usize {
        self.features.len()
    }

    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    pub fn add_sample(&mut self, row: Vec<f64>, target: f64) {
        debug_assert_eq!(row.len(), self.feature_names.len());
        self.features.push(row);
        self.targets.push(target);
    }

    /// Row subset by index, preserving order (bootstrap sampling draws
    /// through this).
    pub fn subset(&self, indices: &[usize]) -> TrainingSet {
        TrainingSet {
            features: indices.iter().map(|&i| self.features[i].clone()).collect(),
            targets: indices.iter().map(|&i| self.targets[i]).collect(),
            feature_names: self.feature_names.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subset_preserves_alignment() {
        let mut data = TrainingSet::new(vec!["a".to_string(), "b".to_string()]);
        data.add_sample(vec![1.0, 2.0], 10.0);
        data.add_sample(vec![3.0, 4.0], 20.0);
        data.add_sample(vec![5.0, 6.0], 30.0);

        let sub = data.subset(&[2, 0]);
        assert_eq!(sub.n_samples(), 2);
        assert_eq!(sub.features[0], vec![5.0, 6.0]);
        assert_eq!(sub.targets[0], 30.0);
        assert_eq!(sub.targets[1], 10.0);
    }
}
