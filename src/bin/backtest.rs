//! Backtest CLI
//!
//! Usage: backtest <bars.csv> [config.toml] [trades_out.csv]
//!
//! The bars file needs a header with ticker, timestamp, open, high, low,
//! close, volume columns. Timestamps may be unix seconds, `YYYY-MM-DD`
//! dates, or RFC 3339 datetimes.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use tickersim::backtest::{
    run_backtest, write_trades_csv, BacktestConfig, Bar, BarSet, TradeRecord,
};

#[derive(Debug, Deserialize)]
struct BarRow {
    ticker: String,
    timestamp: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

fn parse_timestamp(raw: &str) -> Option<i64> {
    if let Ok(seconds) = raw.parse::<i64>() {
        return Some(seconds);
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc().timestamp());
    }
    chrono::DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.timestamp())
}

fn load_bars(path: &Path) -> Result<Vec<Bar>, Box<dyn std::error::Error>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut bars = Vec::new();
    let mut skipped = 0usize;

    for row in reader.deserialize() {
        let row: BarRow = row?;
        match parse_timestamp(&row.timestamp) {
            Some(timestamp) => bars.push(Bar {
                ticker: row.ticker,
                timestamp,
                open: row.open,
                high: row.high,
                low: row.low,
                close: row.close,
                volume: row.volume,
            }),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        error!(skipped, "rows with unparseable timestamps were dropped");
    }
    Ok(bars)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: backtest <bars.csv> [config.toml] [trades_out.csv]");
        return ExitCode::FAILURE;
    }

    let bars_path = PathBuf::from(&args[1]);
    let config = match args.get(2) {
        Some(path) => match BacktestConfig::from_toml_file(Path::new(path)) {
            Ok(config) => config,
            Err(e) => {
                error!("failed to load config: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => BacktestConfig::default(),
    };

    let start = Instant::now();
    let bars = match load_bars(&bars_path) {
        Ok(bars) => bars,
        Err(e) => {
            error!("failed to load bars from {}: {e}", bars_path.display());
            return ExitCode::FAILURE;
        }
    };
    if bars.is_empty() {
        error!("no usable bars in {}", bars_path.display());
        return ExitCode::FAILURE;
    }

    let set = BarSet::from_bars(bars);
    info!(
        tickers = set.tickers().len(),
        bars = set.ticks().len(),
        "loaded input in {:?}",
        start.elapsed()
    );

    let results = match run_backtest(&set, &config) {
        Ok(results) => results,
        Err(e) => {
            error!("backtest failed: {e}");
            return ExitCode::FAILURE;
        }
    };
    info!("backtest finished in {:?}", start.elapsed());

    for result in &results {
        match serde_json::to_string_pretty(&result.summary) {
            Ok(json) => println!("{}:\n{json}", result.ticker),
            Err(e) => {
                error!("failed to serialize summary for {}: {e}", result.ticker);
                return ExitCode::FAILURE;
            }
        }
    }

    if let Some(out_path) = args.get(3) {
        let trades: Vec<TradeRecord> = results
            .iter()
            .flat_map(|r| r.trades.iter().cloned())
            .collect();
        if let Err(e) = write_trades_csv(Path::new(out_path), &trades) {
            error!("failed to write trades: {e}");
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}
