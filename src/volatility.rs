//! Volatility indicators
//!
//! Rolling standard deviation, true range / ATR, Bollinger bands and the
//! derived band-width ratio, and the rolling z-score.

use crate::common::{has_enough_data, mean, nan_vec, rolling};
use crate::moving_averages::sma;

/// Standard Deviation
///
/// Population standard deviation over a rolling window
pub fn std_dev(values: &[f64], period: usize) -> Vec<f64> {
    rolling(values, period, |window| {
        let m = mean(window);
        let variance =
            window.iter().map(|x| (x - m).powi(2)).sum::<f64>() / window.len() as f64;
        variance.sqrt()
    })
}

/// True Range
///
/// The greatest of:
/// - Current High - Current Low
/// - |Current High - Previous Close|
/// - |Current Low - Previous Close|
///
/// The first bar has no previous close; its true range is High - Low.
pub fn true_range(highs: &[f64], lows: &[f64], closes: &[f64]) -> Vec<f64> {
    let n = highs.len();
    if n != lows.len() || n != closes.len() || n == 0 {
        return nan_vec(n);
    }

    let mut result = nan_vec(n);
    result[0] = highs[0] - lows[0];
    for i in 1..n {
        let h_l = highs[i] - lows[i];
        let h_c = (highs[i] - closes[i - 1]).abs();
        let l_c = (lows[i] - closes[i - 1]).abs();
        result[i] = h_l.max(h_c).max(l_c);
    }
    result
}

/// ATR - Average True Range
///
/// Rolling simple mean of the true range (no Wilder smoothing)
pub fn atr(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> Vec<f64> {
    let tr = true_range(highs, lows, closes);
    sma(&tr, period)
}

/// Bollinger Bands
///
/// # Formula
/// Middle = SMA(period)
/// Upper / Lower = Middle ± std_mult × population σ(period)
///
/// # Returns
/// Tuple of (upper, middle, lower)
pub fn bollinger(
    closes: &[f64],
    period: usize,
    std_mult: f64,
) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let n = closes.len();
    if !has_enough_data(n, period) {
        return (nan_vec(n), nan_vec(n), nan_vec(n));
    }

    let middle = sma(closes, period);
    let std = std_dev(closes, period);

    let mut upper = nan_vec(n);
    let mut lower = nan_vec(n);
    for i in 0..n {
        if !middle[i].is_nan() && !std[i].is_nan() {
            upper[i] = middle[i] + std_mult * std[i];
            lower[i] = middle[i] - std_mult * std[i];
        }
    }
    (upper, middle, lower)
}

/// Bollinger band width as a ratio of the middle band
///
/// # Formula
/// (Upper - Lower) / Middle
pub fn bb_width(closes: &[f64], period: usize, std_mult: f64) -> Vec<f64> {
    let (upper, middle, lower) = bollinger(closes, period, std_mult);
    let n = closes.len();

    let mut result = nan_vec(n);
    for i in 0..n {
        if !middle[i].is_nan() && middle[i] != 0.0 {
            result[i] = (upper[i] - lower[i]) / middle[i];
        }
    }
    result
}

/// Rolling z-score
///
/// # Formula
/// (Close - rolling mean) / rolling σ, 0 when σ is 0
pub fn zscore(closes: &[f64], period: usize) -> Vec<f64> {
    let n = closes.len();
    if !has_enough_data(n, period) {
        return nan_vec(n);
    }

    let m = sma(closes, period);
    let std = std_dev(closes, period);

    let mut result = nan_vec(n);
    for i in (period - 1)..n {
        result[i] = if std[i] == 0.0 {
            0.0
        } else {
            (closes[i] - m[i]) / std[i]
        };
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        if a.is_nan() && b.is_nan() {
            return true;
        }
        (a - b).abs() < epsilon
    }

    #[test]
    fn test_std_dev_known_value() {
        let values = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let result = std_dev(&values, 8);
        // Population std dev of these values is 2.0
        assert!(approx_eq(result[7], 2.0, 1e-9));
    }

    #[test]
    fn test_true_range() {
        let highs = vec![50.0, 52.0, 51.0];
        let lows = vec![48.0, 49.0, 47.0];
        let closes = vec![49.0, 51.0, 48.0];

        let tr = true_range(&highs, &lows, &closes);

        // First bar falls back to high - low
        assert!(approx_eq(tr[0], 2.0, 1e-9));
        // max(52-49, |52-49|, |49-49|) = 3
        assert!(approx_eq(tr[1], 3.0, 1e-9));
        // max(51-47, |51-51|, |47-51|) = 4
        assert!(approx_eq(tr[2], 4.0, 1e-9));
    }

    #[test]
    fn test_atr_is_rolling_mean_of_tr() {
        let highs: Vec<f64> = (0..20).map(|x| 51.0 + x as f64).collect();
        let lows: Vec<f64> = (0..20).map(|x| 48.0 + x as f64).collect();
        let closes: Vec<f64> = (0..20).map(|x| 50.0 + x as f64).collect();

        let tr = true_range(&highs, &lows, &closes);
        let result = atr(&highs, &lows, &closes, 14);

        assert!(result[12].is_nan());
        let expected = tr[..14].iter().sum::<f64>() / 14.0;
        assert!(approx_eq(result[13], expected, 1e-9));
    }

    #[test]
    fn test_bollinger_bands_bracket_middle() {
        let closes: Vec<f64> = (0..30).map(|x| 100.0 + (x as f64).sin() * 5.0).collect();
        let (upper, middle, lower) = bollinger(&closes, 20, 2.0);
        for i in 19..closes.len() {
            assert!(upper[i] >= middle[i]);
            assert!(lower[i] <= middle[i]);
        }
    }

    #[test]
    fn test_bb_width_is_ratio() {
        let closes: Vec<f64> = (0..30).map(|x| 100.0 + (x as f64).sin() * 5.0).collect();
        let (upper, middle, lower) = bollinger(&closes, 20, 2.0);
        let width = bb_width(&closes, 20, 2.0);
        for i in 19..closes.len() {
            assert!(approx_eq(width[i], (upper[i] - lower[i]) / middle[i], 1e-12));
        }
    }

    #[test]
    fn test_bb_width_constant_series_is_zero() {
        let closes = vec![10.0; 25];
        let width = bb_width(&closes, 20, 2.0);
        assert!(approx_eq(width[24], 0.0, 1e-12));
    }

    #[test]
    fn test_zscore_constant_series_is_zero() {
        // σ = 0 must substitute 0, not divide by zero
        let closes = vec![10.0; 25];
        let result = zscore(&closes, 20);
        assert!(result[18].is_nan());
        assert_eq!(result[19], 0.0);
        assert_eq!(result[24], 0.0);
    }

    #[test]
    fn test_zscore_sign() {
        let mut closes = vec![100.0; 19];
        closes.push(110.0); // last value above the window mean
        let result = zscore(&closes, 20);
        assert!(result[19] > 0.0);
    }
}
