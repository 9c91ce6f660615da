// src/backtest/portfolio.rs
// Single-ticker portfolio state machine: entries, exits, cooling-off

use tracing::{debug, info};

use crate::backtest::config::BacktestConfig;
use crate::backtest::signal::Signal;
use crate::backtest::types::{
    EquitySnapshot, ExitReason, PortfolioState, Position, TradeDirection, TradeRecord,
};

/// Replays signals for one ticker against an isolated account.
///
/// State machine per tick:
/// - cooling off: decrement the counter, never enter; exits are also
///   suppressed unless `cooling_off_blocks_exits` is false
/// - holding: check take-profit, then stop-loss, then a SELL signal
/// - flat + BUY: risk-sized entry at the slippage/commission-adjusted price
///
/// Every processed tick appends one equity snapshot.
pub struct PortfolioSimulator<'a> {
    config: &'a BacktestConfig,
    ticker: String,
    state: PortfolioState,
    snapshots: Vec<EquitySnapshot>,
    trades: Vec<TradeRecord>,
}

impl<'a> PortfolioSimulator<'a> {
    pub fn new(ticker: impl Into<String>, config: &'a BacktestConfig) -> Self {
        Self {
            config,
            ticker: ticker.into(),
            state: PortfolioState::new(config.initial_balance),
            snapshots: Vec::new(),
            trades: Vec::new(),
        }
    }

    pub fn state(&self) -> &PortfolioState {
        &self.state
    }

    pub fn snapshots(&self) -> &[EquitySnapshot] {
        &self.snapshots
    }

    pub fn trades(&self) -> &[TradeRecord] {
        &self.trades
    }

    pub fn into_parts(self) -> (Vec<EquitySnapshot>, Vec<TradeRecord>) {
        (self.snapshots, self.trades)
    }

    /// Advance one bar. `atr` is the tick's ATR(14), 0 when unavailable.
    pub fn on_tick(&mut self, timestamp: i64, close: f64, atr: f64, signal: Signal) {
        if self.state.cooling_off_counter > 0 {
            self.state.cooling_off_counter -= 1;
            if !self.config.cooling_off_blocks_exits {
                self.check_exits(timestamp, close, signal);
            }
            self.emit_snapshot(timestamp, close);
            return;
        }

        if self.state.position.is_some() {
            self.check_exits(timestamp, close, signal);
        } else if signal == Signal::Buy {
            self.enter(timestamp, close, atr);
        }

        self.emit_snapshot(timestamp, close);
    }

    /// Force-close any open position at the final bar. Liquidation credits
    /// full net proceeds to cash and ignores signals and cooling-off.
    pub fn finish(&mut self, timestamp: i64, close: f64) {
        if self.state.position.is_some() {
            self.close_position(timestamp, close, ExitReason::EndOfRun);
            self.emit_snapshot(timestamp, close);
        }
    }

    fn check_exits(&mut self, timestamp: i64, close: f64, signal: Signal) {
        let (take_profit, stop_loss) = match &self.state.position {
            Some(position) => (position.take_profit, position.stop_loss),
            None => return,
        };

        if close >= take_profit {
            self.close_position(timestamp, close, ExitReason::TakeProfit);
        } else if close <= stop_loss {
            self.close_position(timestamp, close, ExitReason::StopLoss);
        } else if signal == Signal::Sell {
            self.close_position(timestamp, close, ExitReason::Signal);
        }
    }

    fn enter(&mut self, timestamp: i64, close: f64, atr: f64) {
        let config = self.config;
        let entry_price =
            close * (1.0 + config.slippage_percent) * (1.0 + config.commission_percent);

        let shares = if atr.is_finite() && atr > 0.0 && entry_price > 0.0 {
            let risk_budget = config.risk_percent * self.state.cash_balance;
            let risk_per_share = config.stop_loss_percent * atr * entry_price;
            let sized = (risk_budget / risk_per_share).floor();
            let affordable = (self.state.cash_balance / entry_price).floor();
            sized.min(affordable).max(0.0).min(config.max_shares as f64) as u64
        } else {
            0
        };

        // Any entry attempt opens the cooling window, even an unsized one
        self.state.cooling_off_counter = config.cooling_off_period;

        if shares == 0 {
            debug!(
                ticker = %self.ticker,
                timestamp,
                close,
                atr,
                "BUY signal produced zero shares, staying flat"
            );
            return;
        }

        self.state.cash_balance -= shares as f64 * entry_price;
        self.state.position = Some(Position {
            ticker: self.ticker.clone(),
            shares,
            entry_price,
            entry_timestamp: timestamp,
            stop_loss: entry_price - config.stop_loss_percent * atr,
            take_profit: entry_price + config.take_profit_percent * atr,
        });

        info!(
            ticker = %self.ticker,
            timestamp,
            shares,
            entry_price,
            "opened position"
        );
    }

    fn close_position(&mut self, timestamp: i64, close: f64, reason: ExitReason) {
        let Some(position) = self.state.position.take() else {
            return;
        };

        let proceeds = position.shares as f64 * close * (1.0 - self.config.commission_percent);
        match reason {
            ExitReason::EndOfRun => {
                self.state.cash_balance += proceeds;
            }
            _ => {
                // Realized value is split evenly between spendable cash and
                // the savings bucket
                self.state.cash_balance += proceeds / 2.0;
                self.state.savings_balance += proceeds / 2.0;
            }
        }

        match reason {
            ExitReason::StopLoss => {
                self.state.consecutive_losses += 1;
                if self.state.consecutive_losses >= self.config.max_loss_count {
                    self.state.cooling_off_counter = self.config.cooling_off_period;
                    self.state.consecutive_losses = 0;
                    info!(
                        ticker = %self.ticker,
                        timestamp,
                        period = self.config.cooling_off_period,
                        "loss streak hit, cooling off"
                    );
                }
            }
            ExitReason::TakeProfit | ExitReason::Signal => {
                self.state.consecutive_losses = 0;
            }
            ExitReason::EndOfRun => {}
        }

        info!(
            ticker = %self.ticker,
            timestamp,
            exit = close,
            entry = position.entry_price,
            reason = reason.as_str(),
            "closed position"
        );

        self.trades.push(TradeRecord {
            ticker: position.ticker,
            direction: TradeDirection::Long,
            entry: position.entry_price,
            exit: close,
            stop_loss: position.stop_loss,
            take_profit: position.take_profit,
            entry_timestamp: position.entry_timestamp,
            exit_timestamp: timestamp,
            exit_reason: reason,
        });
    }

    fn emit_snapshot(&mut self, timestamp: i64, close: f64) {
        let shares = self.state.position.as_ref().map_or(0, |p| p.shares);
        self.snapshots.push(EquitySnapshot {
            timestamp,
            cash_balance: self.state.cash_balance,
            savings_balance: self.state.savings_balance,
            position_shares: shares,
            portfolio_value: self.state.cash_balance
                + self.state.savings_balance
                + shares as f64 * close,
        });
    }
}
