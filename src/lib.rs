//! # Tickersim
//!
//! Backtest engine that replays historical OHLCV bars through a
//! threshold-scored trading strategy and produces a portfolio performance
//! trace.
//!
//! Two layers:
//! - Indicator functions operating on whole price series (`sma`, `rsi`,
//!   `macd`, `atr`, ...), returning vectors with NaN for the warm-up prefix
//! - The `backtest` module: batch indicator precomputation, signal scoring,
//!   the portfolio state machine, metrics, and trade export
//!
//! ## Example
//! ```
//! use tickersim::{sma, rsi};
//!
//! let closes = vec![44.0, 44.5, 45.0, 44.5, 45.5, 46.0, 45.5, 46.5];
//!
//! let sma_values = sma(&closes, 3);
//! assert!((sma_values[2] - 44.5).abs() < 1e-9);
//!
//! let rsi_values = rsi(&closes, 3);
//! assert!(rsi_values[2].is_nan()); // needs `period` deltas first
//! ```

pub mod backtest;
pub mod common;
pub mod momentum;
pub mod moving_averages;
pub mod oscillators;
pub mod volatility;
pub mod volume;

// Re-export the indicator functions at crate root
pub use momentum::macd;
pub use moving_averages::sma;
pub use oscillators::rsi;
pub use volatility::{atr, bb_width, bollinger, std_dev, true_range, zscore};
pub use volume::relative_volume;
