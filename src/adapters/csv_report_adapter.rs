//! CSV report adapter.

use crate::domain::error::TradesweepError;
use crate::domain::sweep::SweepResult;
use crate::ports::report_port::ReportPort;

pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CsvReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

fn map_csv_err(e: csv::Error) -> TradesweepError {
    TradesweepError::Data {
        reason: format!("CSV write error: {e}"),
    }
}

impl ReportPort for CsvReportAdapter {
    fn write_backtest(
        &self,
        code: &str,
        profits: &[f64],
        output_path: &str,
    ) -> Result<(), TradesweepError> {
        let mut wtr = csv::Writer::from_path(output_path).map_err(map_csv_err)?;
        wtr.write_record(["code", "profit_day", "change"])
            .map_err(map_csv_err)?;
        for (i, change) in profits.iter().enumerate() {
            wtr.write_record([code.to_string(), i.to_string(), change.to_string()])
                .map_err(map_csv_err)?;
        }
        wtr.flush()?;
        Ok(())
    }

    fn write_sweep(
        &self,
        results: &[SweepResult],
        output_path: &str,
    ) -> Result<(), TradesweepError> {
        let mut wtr = csv::Writer::from_path(output_path).map_err(map_csv_err)?;
        wtr.write_record(["cumulative_profit", "hold_threshold", "buy_threshold"])
            .map_err(map_csv_err)?;
        for result in results {
            wtr.write_record([
                result.cumulative_profit.to_string(),
                result.hold_threshold.to_string(),
                result.buy_threshold.to_string(),
            ])
            .map_err(map_csv_err)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn write_sweep_emits_header_and_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sweep.csv");
        let results = vec![
            SweepResult {
                cumulative_profit: 0.25,
                hold_threshold: 20,
                buy_threshold: 0.07,
            },
            SweepResult {
                cumulative_profit: -0.1,
                hold_threshold: 10,
                buy_threshold: 0.05,
            },
        ];

        CsvReportAdapter::new()
            .write_sweep(&results, path.to_str().unwrap())
            .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next(),
            Some("cumulative_profit,hold_threshold,buy_threshold")
        );
        assert_eq!(lines.next(), Some("0.25,20,0.07"));
        assert_eq!(lines.next(), Some("-0.1,10,0.05"));
    }

    #[test]
    fn write_backtest_emits_profit_sequence() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("run.csv");

        CsvReportAdapter::new()
            .write_backtest("2330", &[0.114, -0.062], path.to_str().unwrap())
            .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "code,profit_day,change");
        assert_eq!(lines[1], "2330,0,0.114");
        assert_eq!(lines[2], "2330,1,-0.062");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn write_sweep_empty_results_writes_header_only() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.csv");
        CsvReportAdapter::new()
            .write_sweep(&[], path.to_str().unwrap())
            .unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 1);
    }
}
