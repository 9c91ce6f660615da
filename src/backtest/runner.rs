// src/backtest/runner.rs
// Orchestrates a full run: validate, precompute, replay, summarize

use tracing::info;

use crate::backtest::config::BacktestConfig;
use crate::backtest::data::BarSet;
use crate::backtest::engine::IndicatorEngine;
use crate::backtest::error::ConfigError;
use crate::backtest::metrics::summarize;
use crate::backtest::portfolio::PortfolioSimulator;
use crate::backtest::signal::generate_signal;
use crate::backtest::types::RunResult;

/// Replay every bar through the signal and portfolio layers, one isolated
/// account per ticker, in (timestamp, ticker) order.
///
/// Bars inside the warm-up window produce an empty indicator set and are
/// skipped without touching the account. Any position still open after the
/// last bar is liquidated at that bar's close.
pub fn run_backtest(
    bars: &BarSet,
    config: &BacktestConfig,
) -> Result<Vec<RunResult>, ConfigError> {
    config.validate()?;

    let engine = IndicatorEngine::precompute(bars);

    let mut simulators: Vec<PortfolioSimulator> = bars
        .tickers()
        .iter()
        .map(|ticker| PortfolioSimulator::new(ticker.clone(), config))
        .collect();

    for tick in bars.ticks() {
        let set = engine.indicator_set(bars, tick.ticker, tick.index);
        if set.is_empty() {
            continue;
        }

        let close = bars.series(tick.ticker).close[tick.index];
        let atr = set.get("atr_14").copied().unwrap_or(0.0);
        let signal = generate_signal(&set, config.buy_threshold, config.sell_threshold);

        simulators[tick.ticker].on_tick(tick.timestamp, close, atr, signal);
    }

    let mut results = Vec::with_capacity(simulators.len());
    for (ticker_idx, mut simulator) in simulators.into_iter().enumerate() {
        let series = bars.series(ticker_idx);
        if let (Some(&timestamp), Some(&close)) =
            (series.timestamps.last(), series.close.last())
        {
            simulator.finish(timestamp, close);
        }

        let summary = summarize(
            simulator.snapshots(),
            config.initial_balance,
            config.risk_free_rate,
        );

        let ticker = bars.tickers()[ticker_idx].clone();
        let (snapshots, trades) = simulator.into_parts();

        info!(
            ticker = %ticker,
            trades = trades.len(),
            snapshots = snapshots.len(),
            final_value = summary.final_value,
            total_return = summary.total_return,
            "run complete"
        );

        results.push(RunResult {
            ticker,
            snapshots,
            trades,
            summary,
        });
    }

    Ok(results)
}
