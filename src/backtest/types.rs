// src/backtest/types.rs
// Core types for the backtest engine

use serde::{Deserialize, Serialize};

// ============================================================================
// Positions and portfolio state
// ============================================================================

/// An open long position in a single ticker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub ticker: String,
    pub shares: u64,
    /// Effective entry price including slippage and commission
    pub entry_price: f64,
    pub entry_timestamp: i64,
    /// Stop level frozen at entry
    pub stop_loss: f64,
    /// Take-profit level frozen at entry
    pub take_profit: f64,
}

/// Mutable account state carried through a single-ticker simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioState {
    pub cash_balance: f64,
    /// Realized-profit bucket; excluded from future position sizing
    pub savings_balance: f64,
    pub position: Option<Position>,
    /// Bars remaining in the cooling-off window; entries are blocked while > 0
    pub cooling_off_counter: u32,
    pub consecutive_losses: u32,
}

impl PortfolioState {
    pub fn new(initial_balance: f64) -> Self {
        Self {
            cash_balance: initial_balance,
            savings_balance: 0.0,
            position: None,
            cooling_off_counter: 0,
            consecutive_losses: 0,
        }
    }
}

// ============================================================================
// Per-tick and per-trade records
// ============================================================================

/// Portfolio valuation captured after each processed bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquitySnapshot {
    pub timestamp: i64,
    pub cash_balance: f64,
    pub savings_balance: f64,
    pub position_shares: u64,
    /// cash + savings + shares × close
    pub portfolio_value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeDirection {
    Long,
}

impl TradeDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeDirection::Long => "long",
        }
    }
}

/// Why a position was closed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    TakeProfit,
    StopLoss,
    Signal,
    EndOfRun,
}

impl ExitReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExitReason::TakeProfit => "take_profit",
            ExitReason::StopLoss => "stop_loss",
            ExitReason::Signal => "signal",
            ExitReason::EndOfRun => "end_of_run",
        }
    }
}

/// One completed round trip, entry through exit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub ticker: String,
    pub direction: TradeDirection,
    pub entry: f64,
    pub exit: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub entry_timestamp: i64,
    pub exit_timestamp: i64,
    pub exit_reason: ExitReason,
}

// ============================================================================
// Run output
// ============================================================================

/// Performance summary computed from the equity curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RunSummary {
    pub final_value: f64,
    /// (final - initial) / initial
    pub total_return: f64,
    pub sharpe_ratio: f64,
    pub avg_return: f64,
    /// Coefficient of variation: σ of per-bar returns / average return
    pub volatility: f64,
    /// Per-bar simple returns between consecutive snapshots
    pub returns: Vec<f64>,
}

/// Full output of a single-ticker backtest
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunResult {
    pub ticker: String,
    pub snapshots: Vec<EquitySnapshot>,
    pub trades: Vec<TradeRecord>,
    pub summary: RunSummary,
}
