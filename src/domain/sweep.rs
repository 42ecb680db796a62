//! Parameter-sweep optimizer: grid-search a strategy's thresholds.
//!
//! Each combination gets its own fresh strategy instance; the series is
//! shared read-only, so the parallel runner needs no synchronization and
//! must match the sequential runner combination for combination.

use rayon::prelude::*;

use super::backtest::{cumulative_profit, run_backtest};
use super::strategy::{BreakoutStrategy, MeanReversionStrategy, Strategy};
use super::trading_day::TradingDaySeries;

/// Which strategy variant a sweep constructs per combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    Breakout,
    MeanReversion,
}

impl StrategyKind {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "breakout" => Some(StrategyKind::Breakout),
            "mean-reversion" | "mean_reversion" => Some(StrategyKind::MeanReversion),
            _ => None,
        }
    }

    pub fn build(self, buy_threshold: f64, hold_threshold: u32) -> Box<dyn Strategy + Send> {
        match self {
            StrategyKind::Breakout => {
                Box::new(BreakoutStrategy::new(buy_threshold, hold_threshold))
            }
            StrategyKind::MeanReversion => {
                Box::new(MeanReversionStrategy::new(buy_threshold, hold_threshold))
            }
        }
    }
}

/// The two grid axes of a sweep.
#[derive(Debug, Clone)]
pub struct SweepSpec {
    pub hold_thresholds: Vec<u32>,
    pub buy_thresholds: Vec<f64>,
}

impl SweepSpec {
    pub fn new(hold_thresholds: Vec<u32>, buy_thresholds: Vec<f64>) -> Self {
        Self {
            hold_thresholds,
            buy_thresholds,
        }
    }

    pub fn grid_size(&self) -> usize {
        self.hold_thresholds.len() * self.buy_thresholds.len()
    }
}

/// Half-open integer range `[start, stop)` with a positive step.
pub fn hold_range(start: u32, stop: u32, step: u32) -> Vec<u32> {
    if step == 0 {
        return Vec::new();
    }
    (start..stop).step_by(step as usize).collect()
}

/// Half-open float range `[start, stop)`; the step may be negative for
/// sweeps over loss thresholds. Values are computed as `start + i * step`
/// rather than accumulated, keeping long grids drift-free.
///
/// The element count is fixed up front, so the builder always terminates.
/// A step whose magnitude cannot walk the span in a representable number
/// of elements yields an empty range; config validation rejects such
/// steps with a diagnostic before a sweep gets here.
pub fn buy_range(start: f64, stop: f64, step: f64) -> Vec<f64> {
    if !start.is_finite() || !stop.is_finite() || !step.is_finite() || step == 0.0 {
        return Vec::new();
    }
    let span = (stop - start) / step;
    if span <= 0.0 {
        return Vec::new();
    }
    let count = span.ceil();
    if !count.is_finite() || count > f64::from(u32::MAX) {
        return Vec::new();
    }
    let mut values = Vec::with_capacity(count as usize);
    for i in 0..count as u32 {
        let value = start + f64::from(i) * step;
        let past_stop = if step > 0.0 { value >= stop } else { value <= stop };
        if past_stop {
            break;
        }
        values.push(value);
    }
    values
}

/// One grid combination's outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepResult {
    pub cumulative_profit: f64,
    pub hold_threshold: u32,
    pub buy_threshold: f64,
}

fn run_combination(
    series: &TradingDaySeries,
    kind: StrategyKind,
    hold_threshold: u32,
    buy_threshold: f64,
) -> SweepResult {
    let mut strategy = kind.build(buy_threshold, hold_threshold);
    let profits = run_backtest(series, strategy.as_mut());
    SweepResult {
        cumulative_profit: cumulative_profit(&profits),
        hold_threshold,
        buy_threshold,
    }
}

/// Run every combination sequentially, outer loop over hold thresholds,
/// inner loop over buy thresholds. Produces exactly `grid_size` results in
/// grid order.
pub fn run_sweep(
    series: &TradingDaySeries,
    kind: StrategyKind,
    spec: &SweepSpec,
) -> Vec<SweepResult> {
    let mut results = Vec::with_capacity(spec.grid_size());
    for &hold in &spec.hold_thresholds {
        for &buy in &spec.buy_thresholds {
            results.push(run_combination(series, kind, hold, buy));
        }
    }
    results
}

/// Rayon fan-out over the same grid. Result order and per-combination
/// values are identical to [`run_sweep`].
pub fn run_sweep_parallel(
    series: &TradingDaySeries,
    kind: StrategyKind,
    spec: &SweepSpec,
) -> Vec<SweepResult> {
    let combos: Vec<(u32, f64)> = spec
        .hold_thresholds
        .iter()
        .flat_map(|&hold| spec.buy_thresholds.iter().map(move |&buy| (hold, buy)))
        .collect();

    combos
        .par_iter()
        .map(|&(hold, buy)| run_combination(series, kind, hold, buy))
        .collect()
}

/// Rank results descending as whole tuples: profit first, then hold
/// threshold, then buy threshold. Returns at most `top_n` entries.
pub fn rank_results(results: &[SweepResult], top_n: usize) -> Vec<SweepResult> {
    let mut ranked = results.to_vec();
    ranked.sort_by(|a, b| {
        b.cumulative_profit
            .total_cmp(&a.cumulative_profit)
            .then_with(|| b.hold_threshold.cmp(&a.hold_threshold))
            .then_with(|| b.buy_threshold.total_cmp(&a.buy_threshold))
    });
    ranked.truncate(top_n);
    ranked
}
