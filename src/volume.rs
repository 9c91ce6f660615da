//! Volume indicators

use crate::common::{has_enough_data, nan_vec};
use crate::moving_averages::sma;

/// Relative Volume
///
/// Current volume relative to average volume over the period
///
/// # Formula
/// Volume / SMA(Volume, period)
pub fn relative_volume(volumes: &[f64], period: usize) -> Vec<f64> {
    let n = volumes.len();
    if !has_enough_data(n, period) {
        return nan_vec(n);
    }

    let sma_vol = sma(volumes, period);

    let mut result = nan_vec(n);
    for i in 0..n {
        if !sma_vol[i].is_nan() && sma_vol[i] != 0.0 {
            result[i] = volumes[i] / sma_vol[i];
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_volume_constant_is_one() {
        let volumes = vec![1_000.0; 25];
        let result = relative_volume(&volumes, 20);
        assert!(result[18].is_nan());
        assert!((result[19] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_relative_volume_spike() {
        let mut volumes = vec![1_000.0; 19];
        volumes.push(3_000.0);
        let result = relative_volume(&volumes, 20);
        // mean of window = 1100, spike = 3000
        assert!((result[19] - 3_000.0 / 1_100.0).abs() < 1e-9);
    }

    #[test]
    fn test_relative_volume_zero_mean_is_nan() {
        let volumes = vec![0.0; 25];
        let result = relative_volume(&volumes, 20);
        assert!(result[24].is_nan());
    }
}
