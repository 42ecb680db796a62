#![allow(dead_code)]

use chrono::NaiveDate;
use std::collections::HashMap;
use tradesweep::domain::error::TradesweepError;
use tradesweep::domain::trading_day::{ClosingPrice, TradingDaySeries};
use tradesweep::ports::data_port::DataPort;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<ClosingPrice>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_closes(mut self, code: &str, closes: Vec<ClosingPrice>) -> Self {
        self.data.insert(code.to_string(), closes);
        self
    }

    pub fn with_error(mut self, code: &str, reason: &str) -> Self {
        self.errors.insert(code.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_closes(&self, code: &str) -> Result<Vec<ClosingPrice>, TradesweepError> {
        if let Some(reason) = self.errors.get(code) {
            return Err(TradesweepError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self.data.get(code).cloned().unwrap_or_default())
    }

    fn list_codes(&self) -> Result<Vec<String>, TradesweepError> {
        let mut codes: Vec<String> = self.data.keys().cloned().collect();
        codes.sort();
        Ok(codes)
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_closes(start: NaiveDate, prices: &[f64]) -> Vec<ClosingPrice> {
    prices
        .iter()
        .enumerate()
        .map(|(i, &close)| ClosingPrice {
            date: start + chrono::Duration::days(i as i64),
            close,
        })
        .collect()
}

/// The worked example used throughout: prices 23.2, 22.1, 24.5, 27.3, 25.6
/// over 2017-01-03..07 with changes [0, -0.047, 0.109, 0.114, -0.062].
pub fn sample_series() -> TradingDaySeries {
    TradingDaySeries::from_start_date(
        vec![23.2, 22.1, 24.5, 27.3, 25.6],
        date(2017, 1, 3),
    )
    .unwrap()
}
