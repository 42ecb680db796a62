//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for tradesweep.
///
/// Every failure here is a deterministic function of the input: nothing is
/// retried and there is no asynchronous error surface.
#[derive(Debug, thiserror::Error)]
pub enum TradesweepError {
    #[error("price/date length mismatch: {prices} prices, {dates} dates")]
    LengthMismatch { prices: usize, dates: usize },

    #[error("duplicate date {date} in series construction")]
    DuplicateDate { date: NaiveDate },

    #[error("invalid price at index {index}: change computation needs a finite, non-zero divisor")]
    InvalidPrice { index: usize },

    #[error("index {index} out of range for series of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("no trading day for date {date}")]
    UnknownDate { date: NaiveDate },

    #[error("invalid threshold {value}: must be a finite number")]
    InvalidThreshold { value: f64 },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&TradesweepError> for std::process::ExitCode {
    fn from(err: &TradesweepError) -> Self {
        let code: u8 = match err {
            TradesweepError::Io(_) => 1,
            TradesweepError::ConfigParse { .. }
            | TradesweepError::ConfigMissing { .. }
            | TradesweepError::ConfigInvalid { .. } => 2,
            TradesweepError::Data { .. } => 3,
            TradesweepError::LengthMismatch { .. }
            | TradesweepError::DuplicateDate { .. }
            | TradesweepError::InvalidPrice { .. }
            | TradesweepError::InvalidThreshold { .. } => 4,
            TradesweepError::IndexOutOfRange { .. } | TradesweepError::UnknownDate { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
