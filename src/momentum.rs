//! Momentum indicators

use crate::common::{has_enough_data, nan_vec};

/// MACD - Moving Average Convergence Divergence
///
/// # Formula
/// MACD Line = EMA(fast) - EMA(slow)
/// Signal Line = EMA(MACD Line, signal)
/// Histogram = MACD Line - Signal Line
///
/// EMAs are seeded from SMAs the way TA-Lib does it: both the fast and the
/// slow EMA start at index `slow - 1`, the fast seed being the SMA of the
/// `fast` values ending there; the signal line seeds from the SMA of the
/// first `signal` MACD values.
///
/// # Returns
/// Tuple of (macd_line, signal_line, histogram), each NaN before its warm-up
pub fn macd(
    closes: &[f64],
    fast: usize,
    slow: usize,
    signal: usize,
) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let n = closes.len();
    if fast >= slow || signal == 0 || !has_enough_data(n, slow + signal) {
        return (nan_vec(n), nan_vec(n), nan_vec(n));
    }

    let slow_start = slow - 1;
    let fast_k = 2.0 / (fast as f64 + 1.0);
    let slow_k = 2.0 / (slow as f64 + 1.0);

    let slow_seed: f64 = closes[..slow].iter().sum::<f64>() / slow as f64;
    let fast_seed: f64 = closes[(slow - fast)..slow].iter().sum::<f64>() / fast as f64;

    let mut fast_ema = nan_vec(n);
    let mut slow_ema = nan_vec(n);
    fast_ema[slow_start] = fast_seed;
    slow_ema[slow_start] = slow_seed;

    for i in slow..n {
        fast_ema[i] = (closes[i] - fast_ema[i - 1]) * fast_k + fast_ema[i - 1];
        slow_ema[i] = (closes[i] - slow_ema[i - 1]) * slow_k + slow_ema[i - 1];
    }

    let mut macd_line = nan_vec(n);
    for i in slow_start..n {
        macd_line[i] = fast_ema[i] - slow_ema[i];
    }

    let signal_k = 2.0 / (signal as f64 + 1.0);
    let signal_start = slow_start + signal - 1;

    let mut signal_line = nan_vec(n);
    if signal_start < n {
        let signal_seed: f64 =
            macd_line[slow_start..=signal_start].iter().sum::<f64>() / signal as f64;
        signal_line[signal_start] = signal_seed;

        for i in (signal_start + 1)..n {
            signal_line[i] = (macd_line[i] - signal_line[i - 1]) * signal_k + signal_line[i - 1];
        }
    }

    let mut histogram = nan_vec(n);
    for i in 0..n {
        if !macd_line[i].is_nan() && !signal_line[i].is_nan() {
            histogram[i] = macd_line[i] - signal_line[i];
        }
    }

    (macd_line, signal_line, histogram)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_macd_warmup() {
        let closes: Vec<f64> = (1..=60).map(|x| 100.0 + (x as f64 * 0.3).sin()).collect();
        let (line, signal, hist) = macd(&closes, 12, 26, 9);

        // MACD line valid from slow - 1, signal from slow + signal - 2
        assert!(line[24].is_nan());
        assert!(!line[25].is_nan());
        assert!(signal[32].is_nan());
        assert!(!signal[33].is_nan());
        assert!(!hist[33].is_nan());
    }

    #[test]
    fn test_macd_histogram_is_difference() {
        let closes: Vec<f64> = (1..=80).map(|x| 50.0 + (x as f64 * 0.1).cos() * 4.0).collect();
        let (line, signal, hist) = macd(&closes, 12, 26, 9);
        for i in 33..closes.len() {
            assert!((hist[i] - (line[i] - signal[i])).abs() < 1e-12);
        }
    }

    #[test]
    fn test_macd_constant_series_is_zero() {
        let closes = vec![42.0; 60];
        let (line, signal, hist) = macd(&closes, 12, 26, 9);
        assert!(line[40].abs() < 1e-12);
        assert!(signal[40].abs() < 1e-12);
        assert!(hist[40].abs() < 1e-12);
    }

    #[test]
    fn test_macd_insufficient_data() {
        let closes = vec![1.0; 20];
        let (line, signal, hist) = macd(&closes, 12, 26, 9);
        assert!(line.iter().all(|v| v.is_nan()));
        assert!(signal.iter().all(|v| v.is_nan()));
        assert!(hist.iter().all(|v| v.is_nan()));
    }
}
