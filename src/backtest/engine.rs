// src/backtest/engine.rs
// Batch indicator precomputation with per-(ticker, bar) slicing

use std::collections::HashMap;

use tracing::debug;

use crate::backtest::data::{BarSet, TickerSeries};
use crate::{atr, bb_width, bollinger, macd, relative_volume, rsi, sma, zscore};

/// Bars required before any indicator values are reported
pub const MIN_HISTORY: usize = 50;

/// Indicator values for one (ticker, bar). Only finite values are present;
/// an empty map means the bar is still inside the warm-up window.
pub type IndicatorSet = HashMap<&'static str, f64>;

/// Full-series indicator columns for one ticker, computed in a single pass
#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    pub sma_10: Vec<f64>,
    pub sma_50: Vec<f64>,
    pub rsi_14: Vec<f64>,
    pub macd: Vec<f64>,
    pub macd_signal: Vec<f64>,
    pub macd_hist: Vec<f64>,
    pub upperband: Vec<f64>,
    pub middleband: Vec<f64>,
    pub lowerband: Vec<f64>,
    pub bb_width_20: Vec<f64>,
    pub zscore_20: Vec<f64>,
    pub atr_14: Vec<f64>,
    pub relative_volume_20: Vec<f64>,
}

impl IndicatorSeries {
    pub fn compute(series: &TickerSeries) -> Self {
        let closes = &series.close;
        let (macd_line, macd_signal, macd_hist) = macd(closes, 12, 26, 9);
        let (upperband, middleband, lowerband) = bollinger(closes, 20, 2.0);

        Self {
            sma_10: sma(closes, 10),
            sma_50: sma(closes, 50),
            rsi_14: rsi(closes, 14),
            macd: macd_line,
            macd_signal,
            macd_hist,
            upperband,
            middleband,
            lowerband,
            bb_width_20: bb_width(closes, 20, 2.0),
            zscore_20: zscore(closes, 20),
            atr_14: atr(&series.high, &series.low, closes, 14),
            relative_volume_20: relative_volume(&series.volume, 20),
        }
    }
}

/// Per-ticker indicator cache. All series are computed once up front; every
/// per-bar lookup is a slice into the precomputed columns, so replaying a
/// bar never sees data past its own index.
#[derive(Debug)]
pub struct IndicatorEngine {
    cache: Vec<IndicatorSeries>,
}

impl IndicatorEngine {
    pub fn precompute(bars: &BarSet) -> Self {
        let cache: Vec<IndicatorSeries> = bars
            .all_series()
            .iter()
            .map(IndicatorSeries::compute)
            .collect();

        debug!(tickers = cache.len(), "indicator cache built");
        Self { cache }
    }

    /// Indicator values for bar `index` of ticker `ticker_idx`.
    ///
    /// Returns an empty set until `MIN_HISTORY` bars of history exist
    /// (i.e. from index `MIN_HISTORY - 1` on). NaN warm-up values of
    /// individual indicators are simply absent from the map.
    pub fn indicator_set(&self, bars: &BarSet, ticker_idx: usize, index: usize) -> IndicatorSet {
        let mut set = IndicatorSet::new();
        if index + 1 < MIN_HISTORY {
            return set;
        }

        let columns = &self.cache[ticker_idx];
        let mut insert = |key: &'static str, column: &[f64]| {
            if let Some(&value) = column.get(index) {
                if value.is_finite() {
                    set.insert(key, value);
                }
            }
        };

        insert("sma_10", &columns.sma_10);
        insert("sma_50", &columns.sma_50);
        insert("rsi_14", &columns.rsi_14);
        insert("macd", &columns.macd);
        insert("macd_signal", &columns.macd_signal);
        insert("macd_hist", &columns.macd_hist);
        insert("upperband", &columns.upperband);
        insert("middleband", &columns.middleband);
        insert("lowerband", &columns.lowerband);
        insert("bb_width_20", &columns.bb_width_20);
        insert("zscore_20", &columns.zscore_20);
        insert("atr_14", &columns.atr_14);
        insert("relative_volume_20", &columns.relative_volume_20);
        insert("close", &bars.series(ticker_idx).close);

        set
    }
}
