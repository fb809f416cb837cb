//! Forward-looking extrema labels

use crate::data::PriceSeries;

/// Extremes observed over the `horizon` steps strictly after a bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelPair {
    pub future_high: f64,
    pub future_low: f64,
}

/// Label every step `t` with the max High and min Low over
/// `(t, t + horizon]`. Steps whose window runs past the end of the
/// series get `None` and are excluded from training.
pub fn build_targets(series: &PriceSeries, horizon: usize) -> Vec<Option<LabelPair>> {
    let bars = series.bars();
    let n = bars.len();

    let mut labels = Vec::with_capacity(n);
    for t in 0..n {
        if horizon == 0 || t + horizon >= n {
            labels.push(None);
            continue;
        }
        let window = &bars[t + 1..=t + horizon];
        let future_high = window.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
        let future_low = window.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
        labels.push(Some(LabelPair {
            future_high,
            future_low,
        }));
    }
    labels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::PriceBar;

    fn series(closes: &[f64]) -> PriceSeries {
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                PriceBar::new(
                    i as i64 * 1000,
                    close,
                    close + 2.0,
                    (close - 2.0).max(0.0),
                    close,
                    100.0,
                )
            })
            .collect();
        PriceSeries::from_bars(bars).unwrap()
    }

    #[test]
    fn test_window_is_strictly_forward() {
        let series = series(&[10.0, 20.0, 15.0, 30.0, 5.0]);
        let labels = build_targets(&series, 2);

        // t=0 sees bars 1 and 2: highs 22/17, lows 18/13
        let first = labels[0].unwrap();
        assert_eq!(first.future_high, 22.0);
        assert_eq!(first.future_low, 13.0);

        // the bar's own high never enters its label
        let second = labels[1].unwrap();
        assert_eq!(second.future_high, 32.0);
        assert_eq!(second.future_low, 13.0);
    }

    #[test]
    fn test_direct_recomputation_equality() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + ((i as f64) * 0.9).sin() * 20.0).collect();
        let series = series(&closes);
        let horizon = 7;
        let labels = build_targets(&series, horizon);

        for (t, label) in labels.iter().enumerate() {
            match label {
                Some(pair) => {
                    for k in 1..=horizon {
                        assert!(pair.future_high >= series.bars()[t + k].high);
                        assert!(pair.future_low <= series.bars()[t + k].low);
                    }
                }
                None => assert!(t + horizon >= series.len()),
            }
        }
    }

    #[test]
    fn test_trailing_labels_invalid() {
        let series = series(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let labels = build_targets(&series, 3);

        assert_eq!(labels.iter().filter(|l| l.is_none()).count(), 3);
        assert!(labels[2].is_some());
        assert!(labels[3].is_none());
    }

    #[test]
    fn test_horizon_exceeding_length_invalidates_all() {
        let series = series(&[1.0, 2.0, 3.0]);
        let labels = build_targets(&series, 3);
        assert!(labels.iter().all(|l| l.is_none()));
    }
}
