// src/backtest/signal.rs
// Threshold-scored BUY/SELL/HOLD signal generation

use serde::{Deserialize, Serialize};

use crate::backtest::engine::IndicatorSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl Signal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::Buy => "BUY",
            Signal::Sell => "SELL",
            Signal::Hold => "HOLD",
        }
    }
}

fn get(set: &IndicatorSet, key: &str) -> Option<f64> {
    set.get(key).copied()
}

// A rule with a missing indicator votes false rather than poisoning the
// whole score.
fn vote(condition: Option<bool>) -> u32 {
    u32::from(condition.unwrap_or(false))
}

/// Number of buy rules that fire (0..=5)
///
/// Rules: RSI oversold, fast SMA above slow, wide bands with price
/// stretched below the mean, MACD above its signal line, volume surge.
pub fn buy_score(set: &IndicatorSet) -> u32 {
    let rsi = get(set, "rsi_14");
    let sma_10 = get(set, "sma_10");
    let sma_50 = get(set, "sma_50");
    let bb_width = get(set, "bb_width_20");
    let zscore = get(set, "zscore_20");
    let macd = get(set, "macd");
    let macd_signal = get(set, "macd_signal");
    let rel_vol = get(set, "relative_volume_20");

    vote(rsi.map(|v| v < 30.0))
        + vote(sma_10.zip(sma_50).map(|(fast, slow)| fast > slow))
        + vote(bb_width.zip(zscore).map(|(w, z)| w > 0.2 && z < -1.0))
        + vote(macd.zip(macd_signal).map(|(m, s)| m > s))
        + vote(rel_vol.map(|v| v > 1.5))
}

/// Number of sell rules that fire (0..=4)
pub fn sell_score(set: &IndicatorSet) -> u32 {
    let rsi = get(set, "rsi_14");
    let sma_10 = get(set, "sma_10");
    let sma_50 = get(set, "sma_50");
    let bb_width = get(set, "bb_width_20");
    let zscore = get(set, "zscore_20");
    let macd = get(set, "macd");
    let macd_signal = get(set, "macd_signal");

    vote(rsi.map(|v| v > 70.0))
        + vote(sma_10.zip(sma_50).map(|(fast, slow)| fast < slow))
        + vote(bb_width.zip(zscore).map(|(w, z)| w > 0.2 && z > 1.0))
        + vote(macd.zip(macd_signal).map(|(m, s)| m < s))
}

/// Score both sides against their thresholds. BUY wins when both sides
/// clear their thresholds on the same bar.
pub fn generate_signal(set: &IndicatorSet, buy_threshold: u32, sell_threshold: u32) -> Signal {
    if buy_score(set) >= buy_threshold {
        Signal::Buy
    } else if sell_score(set) >= sell_threshold {
        Signal::Sell
    } else {
        Signal::Hold
    }
}
