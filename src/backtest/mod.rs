// src/backtest/mod.rs
// Backtest engine: data model, batch indicator cache, signal scoring,
// portfolio state machine, metrics and trade export

pub mod config;
pub mod data;
pub mod engine;
pub mod error;
pub mod export;
pub mod metrics;
pub mod portfolio;
pub mod runner;
pub mod signal;
pub mod types;

pub use config::BacktestConfig;
pub use data::{Bar, BarSet, Tick, TickerSeries};
pub use engine::{IndicatorEngine, IndicatorSet, MIN_HISTORY};
pub use error::{ConfigError, ExportError};
pub use export::write_trades_csv;
pub use metrics::summarize;
pub use portfolio::PortfolioSimulator;
pub use runner::run_backtest;
pub use signal::{buy_score, generate_signal, sell_score, Signal};
pub use types::{
    EquitySnapshot, ExitReason, PortfolioState, Position, RunResult, RunSummary, TradeDirection,
    TradeRecord,
};
