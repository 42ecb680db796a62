//! Trading-day series: the read model every backtest runs over.

use chrono::{Duration, NaiveDate};
use std::collections::HashMap;

use super::error::TradesweepError;

/// One row of the time series: a date, its close price, and the computed
/// day-over-day fractional change (rounded to 3 decimal places).
#[derive(Debug, Clone, PartialEq)]
pub struct TradingDay {
    pub date: NaiveDate,
    pub price: f64,
    pub change: f64,
}

/// Raw close-price row as supplied by a data adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct ClosingPrice {
    pub date: NaiveDate,
    pub close: f64,
}

/// Direction selector for [`TradingDaySeries::filter_days`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeDirection {
    Up,
    Down,
}

/// Ordered, immutable-after-construction sequence of [`TradingDay`] keyed
/// by date. Shared read-only across sweep combinations.
#[derive(Debug, Clone)]
pub struct TradingDaySeries {
    days: Vec<TradingDay>,
    date_index: HashMap<NaiveDate, usize>,
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

impl TradingDaySeries {
    /// Build a series from parallel price and date vectors.
    ///
    /// Fails on length mismatch, duplicate dates, and any price that cannot
    /// serve the change computation (non-finite anywhere, zero where it
    /// would be a divisor).
    pub fn new(prices: Vec<f64>, dates: Vec<NaiveDate>) -> Result<Self, TradesweepError> {
        if prices.len() != dates.len() {
            return Err(TradesweepError::LengthMismatch {
                prices: prices.len(),
                dates: dates.len(),
            });
        }

        let changes = compute_changes(&prices)?;

        let mut date_index = HashMap::with_capacity(dates.len());
        for (i, date) in dates.iter().enumerate() {
            if date_index.insert(*date, i).is_some() {
                return Err(TradesweepError::DuplicateDate { date: *date });
            }
        }

        let days = dates
            .into_iter()
            .zip(prices)
            .zip(changes)
            .map(|((date, price), change)| TradingDay {
                date,
                price,
                change,
            })
            .collect();

        Ok(Self { days, date_index })
    }

    /// Build a series from prices and a start date, deriving successive
    /// dates by one-day increments.
    ///
    /// This is an approximation: it counts calendar days, not trading days,
    /// so weekends and holidays land in the series as if they traded.
    pub fn from_start_date(prices: Vec<f64>, start: NaiveDate) -> Result<Self, TradesweepError> {
        let dates = (0..prices.len())
            .map(|i| start + Duration::days(i as i64))
            .collect();
        Self::new(prices, dates)
    }

    /// Build a series from data-port rows, preserving their order.
    pub fn from_closes(closes: &[ClosingPrice]) -> Result<Self, TradesweepError> {
        let prices = closes.iter().map(|c| c.close).collect();
        let dates = closes.iter().map(|c| c.date).collect();
        Self::new(prices, dates)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Day at ordinal position, failing on out-of-range indexes.
    pub fn at(&self, index: usize) -> Result<&TradingDay, TradesweepError> {
        self.days.get(index).ok_or(TradesweepError::IndexOutOfRange {
            index,
            len: self.days.len(),
        })
    }

    /// Non-failing positional lookup for hot-loop callers.
    pub fn get(&self, index: usize) -> Option<&TradingDay> {
        self.days.get(index)
    }

    /// Day at a date key, failing on unknown dates.
    pub fn by_date(&self, date: NaiveDate) -> Result<&TradingDay, TradesweepError> {
        self.date_index
            .get(&date)
            .map(|&i| &self.days[i])
            .ok_or(TradesweepError::UnknownDate { date })
    }

    /// Restartable in-order iteration.
    pub fn iter(&self) -> std::slice::Iter<'_, TradingDay> {
        self.days.iter()
    }

    /// Days whose change is strictly positive (Up) or strictly negative
    /// (Down). Zero-change days match neither direction.
    pub fn filter_days(
        &self,
        direction: ChangeDirection,
    ) -> impl Iterator<Item = &TradingDay> {
        self.days.iter().filter(move |day| match direction {
            ChangeDirection::Up => day.change > 0.0,
            ChangeDirection::Down => day.change < 0.0,
        })
    }

    /// Sum of `change` over the filtered subsequence; 0.0 when empty.
    pub fn change_sum(&self, direction: ChangeDirection) -> f64 {
        self.filter_days(direction).map(|day| day.change).sum()
    }
}

impl<'a> IntoIterator for &'a TradingDaySeries {
    type Item = &'a TradingDay;
    type IntoIter = std::slice::Iter<'a, TradingDay>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// changes[0] is 0 by convention (no prior reference); afterwards each
/// change is the rounded fractional move from the previous close.
fn compute_changes(prices: &[f64]) -> Result<Vec<f64>, TradesweepError> {
    for (i, price) in prices.iter().enumerate() {
        if !price.is_finite() {
            return Err(TradesweepError::InvalidPrice { index: i });
        }
        if *price == 0.0 && i + 1 < prices.len() {
            return Err(TradesweepError::InvalidPrice { index: i });
        }
    }

    let mut changes = Vec::with_capacity(prices.len());
    if !prices.is_empty() {
        changes.push(0.0);
    }
    for pair in prices.windows(2) {
        changes.push(round3((pair[1] - pair[0]) / pair[0]));
    }
    Ok(changes)
}
