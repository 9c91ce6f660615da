// src/backtest/metrics.rs
// Performance summary over the equity snapshot sequence

use crate::backtest::types::{EquitySnapshot, RunSummary};
use crate::common::mean;

/// Summarize an equity curve.
///
/// Per-tick returns are simple returns between consecutive portfolio
/// values. Volatility is reported as a coefficient of variation
/// (σ of returns / average return) rather than raw σ, and the Sharpe ratio
/// divides the excess average return by that value. Degenerate inputs fall
/// back to zero instead of NaN:
/// - fewer than two snapshots → all-zero summary
/// - zero previous value in a return step → that return is 0
/// - zero average return → volatility 0
/// - zero volatility → sharpe 0
pub fn summarize(
    snapshots: &[EquitySnapshot],
    initial_balance: f64,
    risk_free_rate: f64,
) -> RunSummary {
    if snapshots.len() < 2 {
        return RunSummary::default();
    }

    let final_value = snapshots[snapshots.len() - 1].portfolio_value;
    let total_return = (final_value - initial_balance) / initial_balance;

    let returns: Vec<f64> = snapshots
        .windows(2)
        .map(|pair| {
            let prev = pair[0].portfolio_value;
            if prev == 0.0 {
                0.0
            } else {
                (pair[1].portfolio_value - prev) / prev
            }
        })
        .collect();

    let avg_return = mean(&returns);
    let sigma = {
        let variance = returns
            .iter()
            .map(|r| (r - avg_return).powi(2))
            .sum::<f64>()
            / returns.len() as f64;
        variance.sqrt()
    };

    let volatility = if avg_return == 0.0 {
        0.0
    } else {
        sigma / avg_return
    };

    let sharpe_ratio = if volatility > 0.0 {
        (avg_return - risk_free_rate) / volatility
    } else {
        0.0
    };

    RunSummary {
        final_value,
        total_return,
        sharpe_ratio,
        avg_return,
        volatility,
        returns,
    }
}
