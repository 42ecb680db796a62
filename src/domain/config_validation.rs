//! Configuration validation.
//!
//! Checks all config fields before a backtest or sweep runs, so bad values
//! fail fast with a config error instead of surfacing mid-run.

use crate::domain::error::TradesweepError;
use crate::domain::sweep::StrategyKind;
use crate::ports::config_port::ConfigPort;

pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), TradesweepError> {
    validate_data_path(config)?;
    validate_code(config)?;
    Ok(())
}

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), TradesweepError> {
    validate_kind(config)?;
    validate_buy_threshold(config)?;
    validate_hold_threshold(config)?;
    Ok(())
}

pub fn validate_sweep_config(config: &dyn ConfigPort) -> Result<(), TradesweepError> {
    validate_kind(config)?;
    validate_hold_axis(config)?;
    validate_buy_axis(config)?;
    validate_top(config)?;
    Ok(())
}

fn validate_data_path(config: &dyn ConfigPort) -> Result<(), TradesweepError> {
    match config.get_string("data", "path") {
        Some(path) if !path.trim().is_empty() => Ok(()),
        Some(_) => Err(TradesweepError::ConfigInvalid {
            section: "data".to_string(),
            key: "path".to_string(),
            reason: "path must not be empty".to_string(),
        }),
        None => Err(TradesweepError::ConfigMissing {
            section: "data".to_string(),
            key: "path".to_string(),
        }),
    }
}

fn validate_code(config: &dyn ConfigPort) -> Result<(), TradesweepError> {
    match config.get_string("data", "code") {
        Some(code) if !code.trim().is_empty() => Ok(()),
        _ => Err(TradesweepError::ConfigMissing {
            section: "data".to_string(),
            key: "code".to_string(),
        }),
    }
}

fn validate_kind(config: &dyn ConfigPort) -> Result<(), TradesweepError> {
    let kind = config
        .get_string("strategy", "kind")
        .ok_or_else(|| TradesweepError::ConfigMissing {
            section: "strategy".to_string(),
            key: "kind".to_string(),
        })?;
    if StrategyKind::parse(&kind).is_none() {
        return Err(TradesweepError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "kind".to_string(),
            reason: format!("unknown strategy kind '{kind}' (breakout | mean-reversion)"),
        });
    }
    Ok(())
}

fn validate_buy_threshold(config: &dyn ConfigPort) -> Result<(), TradesweepError> {
    let value = config.get_double("strategy", "buy_change_threshold", 0.07);
    if !value.is_finite() {
        return Err(TradesweepError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "buy_change_threshold".to_string(),
            reason: "buy_change_threshold must be a finite number".to_string(),
        });
    }
    Ok(())
}

fn validate_hold_threshold(config: &dyn ConfigPort) -> Result<(), TradesweepError> {
    let value = config.get_int("strategy", "hold_threshold", 20);
    if value < 1 || value > i64::from(u32::MAX) {
        return Err(TradesweepError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "hold_threshold".to_string(),
            reason: format!("hold_threshold must be between 1 and {}", u32::MAX),
        });
    }
    Ok(())
}

fn validate_hold_axis(config: &dyn ConfigPort) -> Result<(), TradesweepError> {
    let min = config.get_int("sweep", "hold_min", 2);
    let max = config.get_int("sweep", "hold_max", 30);
    let step = config.get_int("sweep", "hold_step", 2);
    for (key, value) in [("hold_min", min), ("hold_max", max), ("hold_step", step)] {
        if value > i64::from(u32::MAX) {
            return Err(TradesweepError::ConfigInvalid {
                section: "sweep".to_string(),
                key: key.to_string(),
                reason: format!("{key} must be at most {}", u32::MAX),
            });
        }
    }
    if min < 1 {
        return Err(TradesweepError::ConfigInvalid {
            section: "sweep".to_string(),
            key: "hold_min".to_string(),
            reason: "hold_min must be at least 1".to_string(),
        });
    }
    if max <= min {
        return Err(TradesweepError::ConfigInvalid {
            section: "sweep".to_string(),
            key: "hold_max".to_string(),
            reason: "hold_max must be greater than hold_min".to_string(),
        });
    }
    if step < 1 {
        return Err(TradesweepError::ConfigInvalid {
            section: "sweep".to_string(),
            key: "hold_step".to_string(),
            reason: "hold_step must be at least 1".to_string(),
        });
    }
    Ok(())
}

fn validate_buy_axis(config: &dyn ConfigPort) -> Result<(), TradesweepError> {
    let start = config.get_double("sweep", "buy_start", -0.05);
    let stop = config.get_double("sweep", "buy_stop", -0.15);
    let step = config.get_double("sweep", "buy_step", -0.01);
    if !start.is_finite() || !stop.is_finite() || !step.is_finite() {
        return Err(TradesweepError::ConfigInvalid {
            section: "sweep".to_string(),
            key: "buy_start".to_string(),
            reason: "buy axis values must be finite numbers".to_string(),
        });
    }
    if step == 0.0 {
        return Err(TradesweepError::ConfigInvalid {
            section: "sweep".to_string(),
            key: "buy_step".to_string(),
            reason: "buy_step must be non-zero".to_string(),
        });
    }
    // The step has to walk from start toward stop, or the grid is empty.
    if (stop - start) * step <= 0.0 {
        return Err(TradesweepError::ConfigInvalid {
            section: "sweep".to_string(),
            key: "buy_step".to_string(),
            reason: "buy_step must point from buy_start toward buy_stop".to_string(),
        });
    }
    // A correctly-signed step below f64 resolution at the start value can
    // never reach the stop.
    if start + step == start {
        return Err(TradesweepError::ConfigInvalid {
            section: "sweep".to_string(),
            key: "buy_step".to_string(),
            reason: "buy_step is too small to advance buy_start".to_string(),
        });
    }
    Ok(())
}

fn validate_top(config: &dyn ConfigPort) -> Result<(), TradesweepError> {
    let value = config.get_int("sweep", "top", 10);
    if value < 1 {
        return Err(TradesweepError::ConfigInvalid {
            section: "sweep".to_string(),
            key: "top".to_string(),
            reason: "top must be at least 1".to_string(),
        });
    }
    Ok(())
}
