//! Moving averages
//!
//! Only the simple moving average is needed here: the signal rules compare
//! SMA(10) against SMA(50), and the volume/volatility modules reuse `sma`
//! for their rolling means. MACD keeps its own TA-Lib-seeded EMAs in
//! `momentum`.

use crate::common::{has_enough_data, nan_vec};

/// Simple Moving Average (SMA)
///
/// The arithmetic mean of the last `period` values.
///
/// # Formula
/// SMA = (P1 + P2 + ... + Pn) / n
///
/// # Returns
/// Vector of same length as input, with NaN for first `period - 1` values
///
/// # Example
/// ```
/// use tickersim::sma;
/// let prices = vec![2.0, 4.0, 6.0, 8.0, 10.0];
/// let result = sma(&prices, 3);
/// assert_eq!(result[2], 4.0);  // (2+4+6)/3
/// assert_eq!(result[4], 8.0);  // (6+8+10)/3
/// ```
pub fn sma(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    if !has_enough_data(n, period) {
        return nan_vec(n);
    }

    let mut result = nan_vec(n);

    // Calculate first SMA
    let mut sum: f64 = values[..period].iter().sum();
    result[period - 1] = sum / period as f64;

    // Rolling calculation - add new, subtract old
    for i in period..n {
        sum = sum + values[i] - values[i - period];
        result[i] = sum / period as f64;
    }

    result
}
