//! Data access port trait.
//!
//! Whatever fetches or stores prices sits behind this trait; the core
//! only ever sees an already-cleaned ordered close-price sequence.

use crate::domain::error::TradesweepError;
use crate::domain::trading_day::ClosingPrice;

pub trait DataPort {
    /// Ordered close prices for one instrument code, oldest first.
    fn fetch_closes(&self, code: &str) -> Result<Vec<ClosingPrice>, TradesweepError>;

    fn list_codes(&self) -> Result<Vec<String>, TradesweepError>;
}
