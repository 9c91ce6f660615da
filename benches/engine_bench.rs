//! Indicator cache benchmarks
//!
//! Compares the batch precompute-then-slice cache against naively
//! recomputing every indicator on a growing prefix at each bar.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use tickersim::backtest::{Bar, BarSet, IndicatorEngine, MIN_HISTORY};
use tickersim::backtest::engine::IndicatorSeries;

fn synthetic_bars(count: usize) -> BarSet {
    let bars = (0..count)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.2).sin() * 6.0 + i as f64 * 0.01;
            Bar {
                ticker: "BENCH".to_string(),
                timestamp: 86_400 * i as i64,
                open: close,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: 1_000.0 + (i % 9) as f64 * 200.0,
            }
        })
        .collect();
    BarSet::from_bars(bars)
}

fn bench_precompute(c: &mut Criterion) {
    let bars = synthetic_bars(2_000);

    c.bench_function("precompute_2000_bars", |b| {
        b.iter(|| IndicatorEngine::precompute(black_box(&bars)))
    });
}

fn bench_replay(c: &mut Criterion) {
    let bars = synthetic_bars(2_000);
    let mut group = c.benchmark_group("replay_2000_bars");

    group.bench_function("cached_slices", |b| {
        let engine = IndicatorEngine::precompute(&bars);
        b.iter(|| {
            let mut acc = 0.0;
            for tick in bars.ticks() {
                let set = engine.indicator_set(&bars, tick.ticker, tick.index);
                acc += set.get("atr_14").copied().unwrap_or(0.0);
            }
            black_box(acc)
        })
    });

    group.bench_function("naive_prefix_recompute", |b| {
        b.iter(|| {
            let mut acc = 0.0;
            for tick in bars.ticks() {
                if tick.index + 1 < MIN_HISTORY {
                    continue;
                }
                let prefix = bars.series(tick.ticker).truncated(tick.index + 1);
                let columns = IndicatorSeries::compute(&prefix);
                acc += columns.atr_14[tick.index];
            }
            black_box(acc)
        })
    });

    group.finish();
}

criterion_group!(benches, bench_precompute, bench_replay);
criterion_main!(benches);
