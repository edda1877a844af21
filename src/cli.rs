//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_report_adapter;
use crate::adapters::strategy_export;
use crate::domain::backtest::run_backtest;
use crate::domain::error::QuantflowError;
use crate::domain::graph::crossover_graph;
use crate::domain::params::BacktestParams;
use crate::ports::config_port::ConfigPort;

#[derive(Parser, Debug)]
#[command(name = "quantflow", about = "Synthetic-market strategy backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Write the full result as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Write a strategy graph snapshot into this directory
        #[arg(long)]
        export_strategy: Option<PathBuf>,
    },
    /// Validate a backtest configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            output,
            export_strategy,
        } => run_backtest_command(&config, output.as_deref(), export_strategy.as_deref()),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &std::path::Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = QuantflowError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Read the raw `[backtest]` fields and run them through validation.
pub fn build_params(adapter: &dyn ConfigPort) -> Result<BacktestParams, QuantflowError> {
    let get = |key: &str| {
        adapter
            .get_string("backtest", key)
            .ok_or_else(|| QuantflowError::ConfigMissing {
                section: "backtest".to_string(),
                key: key.to_string(),
            })
    };

    let start_date = get("start_date")?;
    let end_date = get("end_date")?;
    let capital = get("initial_capital")?;
    let position_size = get("position_size")?;
    let commission = get("commission")?;

    BacktestParams::from_raw(&start_date, &end_date, &capital, &position_size, &commission)
}

fn run_backtest_command(
    config_path: &std::path::Path,
    output_path: Option<&std::path::Path>,
    export_dir: Option<&std::path::Path>,
) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let params = match build_params(&adapter) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!(
        "Running backtest: {} to {}, {} days",
        params.start_date,
        params.end_date,
        params.span_days(),
    );

    let result = match run_backtest(&params) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let m = &result.metrics;
    eprintln!("\n=== Backtest Results ===");
    eprintln!("Initial Capital:  {:.2}", m.initial);
    eprintln!("Final Equity:     {:.2}", m.final_equity);
    eprintln!("Total Return:     {:.2}%", m.total_return_pct);
    eprintln!("CAGR:             {:.2}%", m.cagr_pct);
    eprintln!("Max Drawdown:     {:.2}%", m.max_drawdown_pct);
    eprintln!("Sharpe Ratio:     {:.3}", m.sharpe);
    eprintln!("Total Trades:     {}", m.trade_count);
    eprintln!("Win Rate:         {:.2}%", m.win_rate_pct);

    if let Some(path) = output_path {
        if let Err(e) = json_report_adapter::write_report(&result, path) {
            eprintln!("error: failed to write result: {e}");
            return (&e).into();
        }
        eprintln!("\nResult written to: {}", path.display());
    }

    if let Some(dir) = export_dir {
        let graph = crossover_graph();
        if let Err(e) = graph.check_integrity() {
            eprintln!("error: {e}");
            return (&e).into();
        }
        match strategy_export::write_snapshot(dir, &graph, Some(&params)) {
            Ok(path) => eprintln!("Strategy snapshot written to: {}", path.display()),
            Err(e) => {
                eprintln!("error: failed to write snapshot: {e}");
                return (&e).into();
            }
        }
    }

    ExitCode::SUCCESS
}

fn run_validate(config_path: &std::path::Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    match build_params(&adapter) {
        Ok(params) => {
            eprintln!(
                "Config is valid: {} to {}, capital {:.2}, position size {:.2}%, commission {}",
                params.start_date,
                params.end_date,
                params.initial_capital,
                params.position_size_pct,
                params.commission,
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}
