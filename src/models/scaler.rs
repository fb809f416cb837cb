//! Feature scaling transform

use ndarray::{Array1, Array2, Axis};

/// Columns with std below this are treated as constant and left
/// undivided.
const MIN_STD: f64 = 1e-10;

/// Per-column z-score transform with parameters fit on training rows only.
#[derive(Debug, Clone)]
pub struct StandardScaler {
    means: Array1<f64>,
    stds: Array1<f64>,
}

impl StandardScaler {
    /// Fit column means and standard deviations on the given rows.
    pub fn fit(x: &Array2<f64>) -> Self {
        let means = x
            .mean_axis(Axis(0))
            .unwrap_or_else(|| Array1::zeros(x.ncols()));
        let stds = x
            .std_axis(Axis(0), 0.0)
            .mapv(|s| if s > MIN_STD { s } else { 1.0 });
        Self { means, stds }
    }

    pub fn n_features(&self) -> usize {
        self.means.len()
    }

    /// Apply the fitted transform to a matrix of rows.
    pub fn transform(&self, x: &Array2<f64>) -> Array2<f64> {
        (x - &self.means) / &self.stds
    }

    /// Apply the fitted transform to a single row.
    pub fn transform_row(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .zip(self.means.iter())
            .zip(self.stds.iter())
            .map(|((v, m), s)| (v - m) / s)
            .collect()
    }
}
