//! Report output port trait.

use crate::domain::error::TradesweepError;
use crate::domain::sweep::SweepResult;

/// Port for writing run results for downstream consumers.
pub trait ReportPort {
    /// Write one backtest run's profit sequence.
    fn write_backtest(
        &self,
        code: &str,
        profits: &[f64],
        output_path: &str,
    ) -> Result<(), TradesweepError>;

    /// Write the (already ranked or raw) sweep result tuples.
    fn write_sweep(
        &self,
        results: &[SweepResult],
        output_path: &str,
    ) -> Result<(), TradesweepError>;
}
