//! Oscillator indicators
//!
//! RSI here is the simple-mean variant: average gain and average loss are
//! plain means over the last `period` price deltas, with no Wilder
//! smoothing carried across windows.

use crate::common::{diff, gains_losses, nan_vec};
use crate::moving_averages::sma;

/// Relative Strength Index, simple-mean variant
///
/// # Formula
/// RS = mean(gains over last `period` deltas) / mean(losses over last `period` deltas)
/// RSI = 100 - (100 / (1 + RS))
///
/// RSI is 100 when the average loss is 0 (including flat windows where both
/// averages are 0).
///
/// # Returns
/// RSI values in [0, 100], NaN until `period` deltas are available
pub fn rsi(closes: &[f64], period: usize) -> Vec<f64> {
    let n = closes.len();
    if n < period + 1 || period == 0 {
        return nan_vec(n);
    }

    let changes = diff(closes);
    let (gains, losses) = gains_losses(&changes);

    // Rolling means over the deltas; delta j sits between closes j and j+1,
    // so the window ending at close i is the SMA at delta index i - 1.
    let avg_gains = sma(&gains, period);
    let avg_losses = sma(&losses, period);

    let mut result = nan_vec(n);
    for i in period..n {
        let avg_gain = avg_gains[i - 1];
        let avg_loss = avg_losses[i - 1];
        if avg_loss != 0.0 {
            result[i] = 100.0 - (100.0 / (1.0 + avg_gain / avg_loss));
        } else {
            result[i] = 100.0;
        }
    }

    result
}
