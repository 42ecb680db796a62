//! Core domain types and logic.

pub mod trading_day;
pub mod strategy;
pub mod backtest;
pub mod sweep;
pub mod config_validation;
pub mod error;
