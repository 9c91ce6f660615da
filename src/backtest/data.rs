// src/backtest/data.rs
// Bar ingestion: column-major per-ticker series and the global replay order

use serde::{Deserialize, Serialize};

/// One OHLCV bar as loaded from the input file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub ticker: String,
    /// Unix seconds
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Column-major price history for one ticker, sorted by timestamp
#[derive(Debug, Clone, Default)]
pub struct TickerSeries {
    pub timestamps: Vec<i64>,
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
    pub volume: Vec<f64>,
}

impl TickerSeries {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    fn push(&mut self, bar: &Bar) {
        self.timestamps.push(bar.timestamp);
        self.open.push(bar.open);
        self.high.push(bar.high);
        self.low.push(bar.low);
        self.close.push(bar.close);
        self.volume.push(bar.volume);
    }

    /// Prefix of the series up to `len` bars
    pub fn truncated(&self, len: usize) -> TickerSeries {
        let len = len.min(self.len());
        TickerSeries {
            timestamps: self.timestamps[..len].to_vec(),
            open: self.open[..len].to_vec(),
            high: self.high[..len].to_vec(),
            low: self.low[..len].to_vec(),
            close: self.close[..len].to_vec(),
            volume: self.volume[..len].to_vec(),
        }
    }
}

/// One entry in the global replay order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// Index into `BarSet::tickers`
    pub ticker: usize,
    /// Bar index within that ticker's series
    pub index: usize,
    pub timestamp: i64,
}

/// All input bars, grouped per ticker plus a flat (timestamp, ticker)
/// ordered tick list that fixes the replay order
#[derive(Debug, Clone, Default)]
pub struct BarSet {
    tickers: Vec<String>,
    series: Vec<TickerSeries>,
    ticks: Vec<Tick>,
}

impl BarSet {
    pub fn from_bars(mut bars: Vec<Bar>) -> Self {
        bars.sort_by(|a, b| {
            a.timestamp
                .cmp(&b.timestamp)
                .then_with(|| a.ticker.cmp(&b.ticker))
        });

        let mut tickers: Vec<String> = bars.iter().map(|b| b.ticker.clone()).collect();
        tickers.sort();
        tickers.dedup();

        let mut series = vec![TickerSeries::default(); tickers.len()];
        let mut ticks = Vec::with_capacity(bars.len());

        for bar in &bars {
            // tickers is sorted, lookup cannot fail for a bar drawn from it
            let ticker_idx = match tickers.binary_search(&bar.ticker) {
                Ok(i) => i,
                Err(_) => continue,
            };
            let index = series[ticker_idx].len();
            series[ticker_idx].push(bar);
            ticks.push(Tick {
                ticker: ticker_idx,
                index,
                timestamp: bar.timestamp,
            });
        }

        Self {
            tickers,
            series,
            ticks,
        }
    }

    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    pub fn series(&self, ticker_idx: usize) -> &TickerSeries {
        &self.series[ticker_idx]
    }

    pub fn all_series(&self) -> &[TickerSeries] {
        &self.series
    }

    /// Replay order: ascending timestamp, ties broken by ticker symbol
    pub fn ticks(&self) -> &[Tick] {
        &self.ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(ticker: &str, timestamp: i64, close: f64) -> Bar {
        Bar {
            ticker: ticker.to_string(),
            timestamp,
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1_000.0,
        }
    }

    #[test]
    fn test_ticks_ordered_by_timestamp_then_ticker() {
        let bars = vec![
            bar("MSFT", 200, 2.0),
            bar("AAPL", 200, 1.0),
            bar("AAPL", 100, 1.0),
            bar("MSFT", 100, 2.0),
        ];
        let set = BarSet::from_bars(bars);

        assert_eq!(set.tickers(), &["AAPL".to_string(), "MSFT".to_string()]);

        let order: Vec<(i64, usize)> =
            set.ticks().iter().map(|t| (t.timestamp, t.ticker)).collect();
        assert_eq!(order, vec![(100, 0), (100, 1), (200, 0), (200, 1)]);
    }

    #[test]
    fn test_bar_indexes_follow_series_order() {
        let bars = vec![bar("AAPL", 300, 3.0), bar("AAPL", 100, 1.0), bar("AAPL", 200, 2.0)];
        let set = BarSet::from_bars(bars);

        let series = set.series(0);
        assert_eq!(series.timestamps, vec![100, 200, 300]);
        assert_eq!(series.close, vec![1.0, 2.0, 3.0]);

        let indexes: Vec<usize> = set.ticks().iter().map(|t| t.index).collect();
        assert_eq!(indexes, vec![0, 1, 2]);
    }

    #[test]
    fn test_truncated() {
        let bars = vec![bar("AAPL", 100, 1.0), bar("AAPL", 200, 2.0), bar("AAPL", 300, 3.0)];
        let set = BarSet::from_bars(bars);

        let prefix = set.series(0).truncated(2);
        assert_eq!(prefix.len(), 2);
        assert_eq!(prefix.close, vec![1.0, 2.0]);

        // Clamped, not panicking
        assert_eq!(set.series(0).truncated(10).len(), 3);
    }
}
