//! Day-by-day simulation driver.

use super::strategy::Strategy;
use super::trading_day::TradingDaySeries;

/// Run one strategy over one series, returning the profit sequence: the
/// per-day change of every day on which a position was already open.
///
/// The ordering inside the loop is load-bearing. Profit is recorded from
/// the holding state *before* today's strategy calls, so an entry day never
/// contributes while an exit day still does. Buy is always evaluated before
/// sell, once each per day.
pub fn run_backtest(series: &TradingDaySeries, strategy: &mut dyn Strategy) -> Vec<f64> {
    let mut profits = Vec::new();

    for (index, day) in series.iter().enumerate() {
        if strategy.holding_days() > 0 {
            profits.push(day.change);
        }
        strategy.evaluate_buy(index, day, series);
        strategy.evaluate_sell(index, day, series);
    }

    profits
}

/// Sum of a profit sequence; 0.0 when no day contributed.
pub fn cumulative_profit(profits: &[f64]) -> f64 {
    profits.iter().sum()
}
