// src/backtest/export.rs
// Closed-trade export for offline review

use std::path::Path;

use tracing::info;

use crate::backtest::error::ExportError;
use crate::backtest::types::TradeRecord;

fn format_timestamp(timestamp: i64) -> String {
    match chrono::DateTime::from_timestamp(timestamp, 0) {
        Some(datetime) => datetime.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => timestamp.to_string(),
    }
}

/// Write closed trades as CSV, one row per round trip
pub fn write_trades_csv(path: &Path, trades: &[TradeRecord]) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_path(path)?;

    writer.write_record([
        "ticker",
        "direction",
        "entry",
        "exit",
        "stop_loss",
        "take_profit",
        "entry_timestamp",
        "exit_timestamp",
        "exit_reason",
    ])?;

    for trade in trades {
        writer.write_record([
            trade.ticker.as_str(),
            trade.direction.as_str(),
            &trade.entry.to_string(),
            &trade.exit.to_string(),
            &trade.stop_loss.to_string(),
            &trade.take_profit.to_string(),
            &format_timestamp(trade.entry_timestamp),
            &format_timestamp(trade.exit_timestamp),
            trade.exit_reason.as_str(),
        ])?;
    }

    writer.flush()?;
    info!(path = %path.display(), trades = trades.len(), "trades exported");
    Ok(())
}
