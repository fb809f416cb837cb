//! Technical indicator primitives
//!
//! All functions return a vector aligned with the input; positions where
//! the rolling window is not yet full hold NaN.

/// Simple Moving Average over a trailing window.
pub fn sma(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.len() < period {
        return vec![f64::NAN; values.len()];
    }

    let mut result = vec![f64::NAN; period - 1];
    for i in (period - 1)..values.len() {
        let sum: f64 = values[(i + 1 - period)..=i].iter().sum();
        result.push(sum / period as f64);
    }
    result
}

/// Sample standard deviation over a trailing window.
pub fn rolling_std(values: &[f64], period: usize) -> Vec<f64> {
    if period < 2 || values.len() < period {
        return vec![f64::NAN; values.len()];
    }

    let mut result = vec![f64::NAN; period - 1];
    for i in (period - 1)..values.len() {
        let window = &values[(i + 1 - period)..=i];
        let mean: f64 = window.iter().sum::<f64>() / period as f64;
        let variance: f64 =
            window.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (period - 1) as f64;
        result.push(variance.sqrt());
    }
    result
}

/// Relative Strength Index from simple rolling means of gains and losses.
///
/// A window whose mean loss is zero (flat or all-gain regime) yields
/// exactly 100 instead of a division fault.
pub fn rsi(closes: &[f64], period: usize) -> Vec<f64> {
    let n = closes.len();
    if period == 0 || n < period + 1 {
        return vec![f64::NAN; n];
    }

    // per-step close deltas split into gains and losses; index 0 has no delta
    let mut gains = vec![0.0; n];
    let mut losses = vec![0.0; n];
    for i in 1..n {
        let delta = closes[i] - closes[i - 1];
        if delta > 0.0 {
            gains[i] = delta;
        } else {
            losses[i] = -delta;
        }
    }

    let mut result = vec![f64::NAN; n];
    for t in period..n {
        let window = (t + 1 - period)..=t;
        let mean_gain: f64 = gains[window.clone()].iter().sum::<f64>() / period as f64;
        let mean_loss: f64 = losses[window].iter().sum::<f64>() / period as f64;

        result[t] = if mean_loss == 0.0 {
            100.0
        } else {
            let rs = mean_gain / mean_loss;
            100.0 - 100.0 / (1.0 + rs)
        };
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sma() {
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let result = sma(&values, 3);

        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert!((result[2] - 2.0).abs() < 1e-10);
        assert!((result[3] - 3.0).abs() < 1e-10);
        assert!((result[4] - 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_rolling_std() {
        let values = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let result = rolling_std(&values, 8);
        // sample std of the canonical population-std-2 example
        assert!((result[7] - (32.0f64 / 7.0).sqrt()).abs() < 1e-10);
    }

    #[test]
    fn test_rsi_bounds() {
        let closes: Vec<f64> = (0..40)
            .map(|i| 100.0 + ((i as f64) * 0.7).sin() * 5.0)
            .collect();
        let result = rsi(&closes, 14);

        for (i, value) in result.iter().enumerate() {
            if i >= 14 {
                assert!(*value >= 0.0 && *value <= 100.0, "rsi out of bounds at {i}");
            } else {
                assert!(value.is_nan());
            }
        }
    }

    #[test]
    fn test_rsi_flat_is_100() {
        let closes = vec![100.0; 30];
        let result = rsi(&closes, 14);
        assert_eq!(result[29], 100.0);
    }

    #[test]
    fn test_rsi_all_gain_is_100() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let result = rsi(&closes, 14);
        assert_eq!(result[29], 100.0);
    }
}
