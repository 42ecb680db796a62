//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::{cumulative_profit, run_backtest};
use crate::domain::config_validation::{
    validate_data_config, validate_strategy_config, validate_sweep_config,
};
use crate::domain::error::TradesweepError;
use crate::domain::strategy::{
    BreakoutStrategy, MeanReversionStrategy, Strategy, DEFAULT_BREAKOUT_BUY_THRESHOLD,
    DEFAULT_BREAKOUT_HOLD_THRESHOLD, DEFAULT_MEAN_REVERSION_BUY_THRESHOLD,
    DEFAULT_MEAN_REVERSION_HOLD_THRESHOLD,
};
use crate::domain::sweep::{
    buy_range, hold_range, rank_results, run_sweep, run_sweep_parallel, StrategyKind, SweepSpec,
};
use crate::domain::trading_day::{ChangeDirection, TradingDaySeries};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "tradesweep", about = "Daily-series strategy backtester and sweep ranker")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one backtest and print its profit summary
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        code: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Grid-search strategy thresholds and rank by cumulative profit
    Sweep {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        top: Option<usize>,
        #[arg(long)]
        parallel: bool,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List instrument codes available in the data directory
    ListCodes {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            code,
            output,
        } => run_backtest_command(&config, code.as_deref(), output.as_ref()),
        Command::Sweep {
            config,
            top,
            parallel,
            output,
        } => run_sweep_command(&config, top, parallel, output.as_ref()),
        Command::Validate { config } => run_validate(&config),
        Command::ListCodes { config } => run_list_codes(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = TradesweepError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Checked read of an integer key that must fit a `u32`. A plain cast
/// would silently truncate oversized or negative config values.
fn get_u32(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: u32,
) -> Result<u32, TradesweepError> {
    let value = config.get_int(section, key, i64::from(default));
    u32::try_from(value).map_err(|_| TradesweepError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: format!("{key} must be between 0 and {}", u32::MAX),
    })
}

/// Strategy construction from the `[strategy]` section. Assumes the section
/// already passed validation.
pub fn build_strategy(config: &dyn ConfigPort) -> Result<Box<dyn Strategy>, TradesweepError> {
    let kind = build_strategy_kind(config)?;
    let strategy: Box<dyn Strategy> = match kind {
        StrategyKind::Breakout => {
            let buy = config.get_double(
                "strategy",
                "buy_change_threshold",
                DEFAULT_BREAKOUT_BUY_THRESHOLD,
            );
            let hold = get_u32(
                config,
                "strategy",
                "hold_threshold",
                DEFAULT_BREAKOUT_HOLD_THRESHOLD,
            )?;
            Box::new(BreakoutStrategy::new(buy, hold))
        }
        StrategyKind::MeanReversion => {
            let buy = config.get_double(
                "strategy",
                "buy_change_threshold",
                DEFAULT_MEAN_REVERSION_BUY_THRESHOLD,
            );
            let hold = get_u32(
                config,
                "strategy",
                "hold_threshold",
                DEFAULT_MEAN_REVERSION_HOLD_THRESHOLD,
            )?;
            Box::new(MeanReversionStrategy::new(buy, hold))
        }
    };
    Ok(strategy)
}

pub fn build_strategy_kind(config: &dyn ConfigPort) -> Result<StrategyKind, TradesweepError> {
    let name = config
        .get_string("strategy", "kind")
        .ok_or_else(|| TradesweepError::ConfigMissing {
            section: "strategy".to_string(),
            key: "kind".to_string(),
        })?;
    StrategyKind::parse(&name).ok_or_else(|| TradesweepError::ConfigInvalid {
        section: "strategy".to_string(),
        key: "kind".to_string(),
        reason: format!("unknown strategy kind '{name}'"),
    })
}

/// Grid axes from the `[sweep]` section, defaulting to the classic
/// hold 2..30 step 2 by buy -0.05..-0.15 step -0.01 grid.
pub fn build_sweep_spec(config: &dyn ConfigPort) -> Result<SweepSpec, TradesweepError> {
    let hold_min = get_u32(config, "sweep", "hold_min", 2)?;
    let hold_max = get_u32(config, "sweep", "hold_max", 30)?;
    let hold_step = get_u32(config, "sweep", "hold_step", 2)?;
    let buy_start = config.get_double("sweep", "buy_start", -0.05);
    let buy_stop = config.get_double("sweep", "buy_stop", -0.15);
    let buy_step = config.get_double("sweep", "buy_step", -0.01);
    Ok(SweepSpec::new(
        hold_range(hold_min, hold_max, hold_step),
        buy_range(buy_start, buy_stop, buy_step),
    ))
}

pub fn resolve_code(code_override: Option<&str>, config: &dyn ConfigPort) -> Option<String> {
    match code_override {
        Some(code) => Some(code.to_string()),
        None => config.get_string("data", "code"),
    }
}

fn load_series(
    adapter: &FileConfigAdapter,
    code_override: Option<&str>,
) -> Result<(String, TradingDaySeries), ExitCode> {
    let data_path = match adapter.get_string("data", "path") {
        Some(p) => PathBuf::from(p),
        None => {
            eprintln!("error: [data] path is required");
            return Err(ExitCode::from(2));
        }
    };

    let code = match resolve_code(code_override, adapter) {
        Some(c) => c,
        None => {
            eprintln!("error: no instrument code configured");
            return Err(ExitCode::from(2));
        }
    };

    let data_port = CsvAdapter::new(data_path);
    let closes = match data_port.fetch_closes(&code) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return Err(ExitCode::from(&e));
        }
    };

    eprintln!("Loaded {} close prices for {}", closes.len(), code);

    match TradingDaySeries::from_closes(&closes) {
        Ok(series) => Ok((code, series)),
        Err(e) => {
            eprintln!("error: {e}");
            Err(ExitCode::from(&e))
        }
    }
}

fn run_backtest_command(
    config_path: &PathBuf,
    code_override: Option<&str>,
    output_path: Option<&PathBuf>,
) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_data_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    if let Err(e) = validate_strategy_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let (code, series) = match load_series(&adapter, code_override) {
        Ok(pair) => pair,
        Err(exit) => return exit,
    };

    let mut strategy = match build_strategy(&adapter) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let profits = run_backtest(&series, strategy.as_mut());
    let total = cumulative_profit(&profits);

    eprintln!("\n=== Backtest Results ===");
    eprintln!("Trading days:      {}", series.len());
    eprintln!(
        "Up-day change sum: {:+.3}",
        series.change_sum(ChangeDirection::Up)
    );
    eprintln!(
        "Down-day change sum: {:+.3}",
        series.change_sum(ChangeDirection::Down)
    );
    eprintln!("Holding days:      {}", profits.len());
    eprintln!("Cumulative profit: {:+.3}", total);

    if let Some(output) = output_path {
        let report = CsvReportAdapter::new();
        match report.write_backtest(&code, &profits, &output.display().to_string()) {
            Ok(()) => eprintln!("\nProfit sequence written to: {}", output.display()),
            Err(e) => {
                eprintln!("error: failed to write report: {e}");
                return (&e).into();
            }
        }
    }

    ExitCode::SUCCESS
}

fn run_sweep_command(
    config_path: &PathBuf,
    top_override: Option<usize>,
    parallel_flag: bool,
    output_path: Option<&PathBuf>,
) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_data_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    if let Err(e) = validate_sweep_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let (_, series) = match load_series(&adapter, None) {
        Ok(pair) => pair,
        Err(exit) => return exit,
    };

    let kind = match build_strategy_kind(&adapter) {
        Ok(k) => k,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let spec = match build_sweep_spec(&adapter) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let parallel = parallel_flag || adapter.get_bool("sweep", "parallel", false);

    eprintln!(
        "Sweeping {} combinations ({} hold x {} buy){}",
        spec.grid_size(),
        spec.hold_thresholds.len(),
        spec.buy_thresholds.len(),
        if parallel { " in parallel" } else { "" },
    );

    let results = if parallel {
        run_sweep_parallel(&series, kind, &spec)
    } else {
        run_sweep(&series, kind, &spec)
    };

    let top = top_override.unwrap_or_else(|| adapter.get_int("sweep", "top", 10) as usize);
    let ranked = rank_results(&results, top);

    eprintln!("\n=== Top {} of {} ===", ranked.len(), results.len());
    eprintln!("{:>10}  {:>5}  {:>7}", "profit", "hold", "buy");
    for result in &ranked {
        eprintln!(
            "{:>+10.3}  {:>5}  {:>7.3}",
            result.cumulative_profit, result.hold_threshold, result.buy_threshold,
        );
    }

    if let Some(output) = output_path {
        let report = CsvReportAdapter::new();
        match report.write_sweep(&ranked, &output.display().to_string()) {
            Ok(()) => eprintln!("\nRanked results written to: {}", output.display()),
            Err(e) => {
                eprintln!("error: failed to write report: {e}");
                return (&e).into();
            }
        }
    }

    ExitCode::SUCCESS
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    for check in [
        validate_data_config(&adapter),
        validate_strategy_config(&adapter),
        validate_sweep_config(&adapter),
    ] {
        if let Err(e) = check {
            eprintln!("error: {e}");
            return (&e).into();
        }
    }

    eprintln!("Config OK: {}", config_path.display());
    ExitCode::SUCCESS
}

fn run_list_codes(config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let data_path = match adapter.get_string("data", "path") {
        Some(p) => PathBuf::from(p),
        None => {
            eprintln!("error: [data] path is required");
            return ExitCode::from(2);
        }
    };

    let data_port = CsvAdapter::new(data_path);
    match data_port.list_codes() {
        Ok(codes) => {
            for code in codes {
                println!("{code}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}
