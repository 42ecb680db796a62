//! Strategy state machines: when to open and close a simulated position.
//!
//! Every strategy implements both [`Strategy::evaluate_buy`] and
//! [`Strategy::evaluate_sell`]; the driver invokes both once per day in that
//! order. Evaluation never fails; it only mutates the holding counter.
//! Thresholds are per-instance values, so sweep combinations running
//! concurrently cannot interfere through shared configuration.

use super::error::TradesweepError;
use super::trading_day::{TradingDay, TradingDaySeries};

pub const DEFAULT_BREAKOUT_BUY_THRESHOLD: f64 = 0.07;
pub const DEFAULT_BREAKOUT_HOLD_THRESHOLD: u32 = 20;
pub const DEFAULT_MEAN_REVERSION_BUY_THRESHOLD: f64 = -0.10;
pub const DEFAULT_MEAN_REVERSION_HOLD_THRESHOLD: u32 = 10;

pub trait Strategy {
    /// Buy-side evaluation for day `index`. Opens a position or advances the
    /// holding counter; never fails.
    fn evaluate_buy(&mut self, index: usize, day: &TradingDay, series: &TradingDaySeries);

    /// Sell-side evaluation for day `index`, invoked after the buy side.
    fn evaluate_sell(&mut self, index: usize, day: &TradingDay, series: &TradingDaySeries);

    /// Consecutive days the current position has been held, entry day
    /// included; 0 means no open position.
    fn holding_days(&self) -> u32;

    /// Clear position state so the instance can drive a fresh run.
    fn reset(&mut self);
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Momentum breakout: buy after a single-day rise above the threshold, hold
/// for a fixed number of days.
#[derive(Debug, Clone)]
pub struct BreakoutStrategy {
    holding_days: u32,
    buy_change_threshold: f64,
    hold_threshold: u32,
}

impl Default for BreakoutStrategy {
    fn default() -> Self {
        Self::new(DEFAULT_BREAKOUT_BUY_THRESHOLD, DEFAULT_BREAKOUT_HOLD_THRESHOLD)
    }
}

impl BreakoutStrategy {
    pub fn new(buy_change_threshold: f64, hold_threshold: u32) -> Self {
        Self {
            holding_days: 0,
            buy_change_threshold: round2(buy_change_threshold),
            hold_threshold,
        }
    }

    pub fn buy_change_threshold(&self) -> f64 {
        self.buy_change_threshold
    }

    pub fn hold_threshold(&self) -> u32 {
        self.hold_threshold
    }

    /// Validated mutator: rejects non-finite values and stores the
    /// threshold rounded to 2 decimal places. The prior value stays in
    /// effect on rejection.
    pub fn set_buy_change_threshold(&mut self, value: f64) -> Result<(), TradesweepError> {
        if !value.is_finite() {
            return Err(TradesweepError::InvalidThreshold { value });
        }
        self.buy_change_threshold = round2(value);
        Ok(())
    }

    pub fn set_hold_threshold(&mut self, value: u32) {
        self.hold_threshold = value;
    }
}

impl Strategy for BreakoutStrategy {
    fn evaluate_buy(&mut self, _index: usize, day: &TradingDay, _series: &TradingDaySeries) {
        if self.holding_days == 0 && day.change > self.buy_change_threshold {
            self.holding_days = 1;
        } else if self.holding_days > 0 {
            self.holding_days += 1;
        }
    }

    fn evaluate_sell(&mut self, _index: usize, _day: &TradingDay, _series: &TradingDaySeries) {
        if self.holding_days >= self.hold_threshold {
            self.holding_days = 0;
        }
    }

    fn holding_days(&self) -> u32 {
        self.holding_days
    }

    fn reset(&mut self) {
        self.holding_days = 0;
    }
}

/// Mean reversion: buy after two consecutive down days whose combined move
/// falls below the (negative) threshold, hold for a fixed number of days.
#[derive(Debug, Clone)]
pub struct MeanReversionStrategy {
    holding_days: u32,
    buy_change_threshold: f64,
    hold_threshold: u32,
}

impl Default for MeanReversionStrategy {
    fn default() -> Self {
        Self::new(
            DEFAULT_MEAN_REVERSION_BUY_THRESHOLD,
            DEFAULT_MEAN_REVERSION_HOLD_THRESHOLD,
        )
    }
}

impl MeanReversionStrategy {
    pub fn new(buy_change_threshold: f64, hold_threshold: u32) -> Self {
        Self {
            holding_days: 0,
            buy_change_threshold,
            hold_threshold,
        }
    }

    pub fn buy_change_threshold(&self) -> f64 {
        self.buy_change_threshold
    }

    pub fn hold_threshold(&self) -> u32 {
        self.hold_threshold
    }

    pub fn set_buy_change_threshold(&mut self, value: f64) -> Result<(), TradesweepError> {
        if !value.is_finite() {
            return Err(TradesweepError::InvalidThreshold { value });
        }
        self.buy_change_threshold = value;
        Ok(())
    }

    pub fn set_hold_threshold(&mut self, value: u32) {
        self.hold_threshold = value;
    }
}

impl Strategy for MeanReversionStrategy {
    fn evaluate_buy(&mut self, index: usize, day: &TradingDay, series: &TradingDaySeries) {
        if self.holding_days == 0 {
            // Two-day lookback: index 0 can never trigger a buy.
            if index >= 1 {
                if let Some(yesterday) = series.get(index - 1) {
                    let today_down = day.change < 0.0;
                    let yesterday_down = yesterday.change < 0.0;
                    let combined = day.change + yesterday.change;
                    if today_down && yesterday_down && combined < self.buy_change_threshold {
                        self.holding_days = 1;
                    }
                }
            }
        } else {
            self.holding_days += 1;
        }
    }

    fn evaluate_sell(&mut self, _index: usize, _day: &TradingDay, _series: &TradingDaySeries) {
        if self.holding_days >= self.hold_threshold {
            self.holding_days = 0;
        }
    }

    fn holding_days(&self) -> u32 {
        self.holding_days
    }

    fn reset(&mut self) {
        self.holding_days = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn sample_series() -> TradingDaySeries {
        TradingDaySeries::from_start_date(
            vec![23.2, 22.1, 24.5, 27.3, 25.6],
            NaiveDate::from_ymd_opt(2017, 1, 3).unwrap(),
        )
        .unwrap()
    }

    fn step(strategy: &mut dyn Strategy, series: &TradingDaySeries, index: usize) {
        let day = series.at(index).unwrap().clone();
        strategy.evaluate_buy(index, &day, series);
        strategy.evaluate_sell(index, &day, series);
    }

    #[test]
    fn breakout_defaults() {
        let s = BreakoutStrategy::default();
        assert_relative_eq!(s.buy_change_threshold(), 0.07);
        assert_eq!(s.hold_threshold(), 20);
        assert_eq!(s.holding_days(), 0);
    }

    #[test]
    fn breakout_opens_on_threshold_breach() {
        let series = sample_series();
        let mut s = BreakoutStrategy::default();

        step(&mut s, &series, 0);
        assert_eq!(s.holding_days(), 0);
        step(&mut s, &series, 1);
        assert_eq!(s.holding_days(), 0);
        // change 0.109 > 0.07 opens the position
        step(&mut s, &series, 2);
        assert_eq!(s.holding_days(), 1);
        step(&mut s, &series, 3);
        assert_eq!(s.holding_days(), 2);
    }

    #[test]
    fn breakout_closes_at_hold_threshold() {
        let series = sample_series();
        let mut s = BreakoutStrategy::new(0.07, 2);

        step(&mut s, &series, 2);
        assert_eq!(s.holding_days(), 1);
        // Counter reaches 2 and the sell check fires the same day.
        step(&mut s, &series, 3);
        assert_eq!(s.holding_days(), 0);
    }

    #[test]
    fn breakout_no_buy_below_threshold() {
        let series = sample_series();
        let mut s = BreakoutStrategy::new(0.20, 20);
        for i in 0..series.len() {
            step(&mut s, &series, i);
        }
        assert_eq!(s.holding_days(), 0);
    }

    #[test]
    fn breakout_setter_rounds_to_two_places() {
        let mut s = BreakoutStrategy::default();
        s.set_buy_change_threshold(0.0749).unwrap();
        assert_relative_eq!(s.buy_change_threshold(), 0.07);
        s.set_buy_change_threshold(0.075).unwrap();
        assert_relative_eq!(s.buy_change_threshold(), 0.08);
    }

    #[test]
    fn breakout_setter_rejects_non_finite() {
        let mut s = BreakoutStrategy::default();
        assert!(matches!(
            s.set_buy_change_threshold(f64::NAN),
            Err(TradesweepError::InvalidThreshold { .. })
        ));
        assert!(matches!(
            s.set_buy_change_threshold(f64::INFINITY),
            Err(TradesweepError::InvalidThreshold { .. })
        ));
        // Prior configuration remains in effect.
        assert_relative_eq!(s.buy_change_threshold(), 0.07);
    }

    #[test]
    fn mean_reversion_defaults() {
        let s = MeanReversionStrategy::default();
        assert_relative_eq!(s.buy_change_threshold(), -0.10);
        assert_eq!(s.hold_threshold(), 10);
    }

    #[test]
    fn mean_reversion_never_buys_on_first_day() {
        // No lookback exists at index 0, so the buy check is skipped there.
        let series = sample_series();
        let mut s = MeanReversionStrategy::new(-0.10, 10);
        step(&mut s, &series, 0);
        assert_eq!(s.holding_days(), 0);
    }

    #[test]
    fn mean_reversion_buys_after_two_down_days() {
        // changes: [0, -0.1, -0.1]; combined -0.2 < -0.15
        let series = TradingDaySeries::from_start_date(
            vec![100.0, 90.0, 81.0],
            NaiveDate::from_ymd_opt(2017, 1, 3).unwrap(),
        )
        .unwrap();
        let mut s = MeanReversionStrategy::new(-0.15, 10);
        step(&mut s, &series, 0);
        step(&mut s, &series, 1);
        assert_eq!(s.holding_days(), 0);
        step(&mut s, &series, 2);
        assert_eq!(s.holding_days(), 1);
    }

    #[test]
    fn mean_reversion_requires_both_days_down() {
        // changes: [0, 0.1, -0.3]; yesterday was up, so no buy even though
        // the combined move clears the threshold.
        let series = TradingDaySeries::from_start_date(
            vec![100.0, 110.0, 77.0],
            NaiveDate::from_ymd_opt(2017, 1, 3).unwrap(),
        )
        .unwrap();
        let mut s = MeanReversionStrategy::new(-0.10, 10);
        for i in 0..series.len() {
            step(&mut s, &series, i);
        }
        assert_eq!(s.holding_days(), 0);
    }

    #[test]
    fn mean_reversion_reenters_after_immediate_close() {
        // hold_threshold 1: the sell check fires on the entry day itself,
        // and nothing stops the next day's buy check from re-opening. The
        // order of operations (buy check before sell check) is preserved,
        // not guarded against.
        let series = TradingDaySeries::from_start_date(
            vec![100.0, 90.0, 81.0, 72.0, 64.0],
            NaiveDate::from_ymd_opt(2017, 1, 3).unwrap(),
        )
        .unwrap();
        let mut s = MeanReversionStrategy::new(-0.15, 1);

        step(&mut s, &series, 2);
        // Entered with holding 1, then the sell check fires at >= 1.
        assert_eq!(s.holding_days(), 0);
        // Next day the lookback still qualifies and re-entry happens.
        step(&mut s, &series, 3);
        assert_eq!(s.holding_days(), 0);
    }

    #[test]
    fn holding_days_never_negative_and_resets_only_via_sell() {
        let series = sample_series();
        let mut s = BreakoutStrategy::new(0.07, 3);
        let mut seen = Vec::new();
        for i in 0..series.len() {
            step(&mut s, &series, i);
            seen.push(s.holding_days());
        }
        // u32 guarantees non-negativity; the counter only ever steps up by
        // one or falls back to zero.
        for pair in seen.windows(2) {
            assert!(pair[1] == 0 || pair[1] == pair[0] + 1 || pair[1] == 1);
        }
    }

    #[test]
    fn reset_clears_position_state() {
        let series = sample_series();
        let mut s = BreakoutStrategy::default();
        step(&mut s, &series, 2);
        assert_eq!(s.holding_days(), 1);
        s.reset();
        assert_eq!(s.holding_days(), 0);
    }
}
