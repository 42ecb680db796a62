//! CSV close-price data adapter.
//!
//! Reads `<code>.csv` files of `date,close` rows, one file per
//! instrument under a configured base directory.

use crate::domain::error::TradesweepError;
use crate::domain::trading_day::ClosingPrice;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, code: &str) -> PathBuf {
        self.base_path.join(format!("{code}.csv"))
    }
}

impl DataPort for CsvAdapter {
    fn fetch_closes(&self, code: &str) -> Result<Vec<ClosingPrice>, TradesweepError> {
        let path = self.csv_path(code);
        let content = fs::read_to_string(&path).map_err(|e| TradesweepError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut closes = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| TradesweepError::Data {
                reason: format!("CSV parse error: {e}"),
            })?;

            let date_str = record.get(0).ok_or_else(|| TradesweepError::Data {
                reason: "missing date column".into(),
            })?;
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                TradesweepError::Data {
                    reason: format!("invalid date '{date_str}': {e}"),
                }
            })?;

            let close: f64 = record
                .get(1)
                .ok_or_else(|| TradesweepError::Data {
                    reason: "missing close column".into(),
                })?
                .parse()
                .map_err(|e| TradesweepError::Data {
                    reason: format!("invalid close value: {e}"),
                })?;

            closes.push(ClosingPrice { date, close });
        }

        closes.sort_by_key(|c| c.date);
        Ok(closes)
    }

    fn list_codes(&self) -> Result<Vec<String>, TradesweepError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| TradesweepError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut codes = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| TradesweepError::Data {
                reason: format!("directory entry error: {e}"),
            })?;
            let name = entry.file_name();
            let name_str = name.to_string_lossy();
            if let Some(code) = name_str.strip_suffix(".csv") {
                codes.push(code.to_string());
            }
        }

        codes.sort();
        Ok(codes)
    }
}
