//! CLI definitions.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "stockviz")]
#[command(author, version, about = "Daily price report with returns, moving averages and a terminal chart")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Log level (overrides logging.level)
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch prices, write the CSV report and show the chart
    Report(ReportArgs),
    /// Re-display an existing CSV report
    Show(ShowArgs),
    /// Validate configuration
    ValidateConfig,
}

#[derive(clap::Args)]
pub struct ReportArgs {
    /// Ticker symbol (overrides source.ticker)
    #[arg(short, long)]
    pub symbol: Option<String>,

    /// Output CSV path (overrides output.csv_path)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Read bars from a local CSV file instead of the network
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Do not open the chart window
    #[arg(long)]
    pub no_chart: bool,
}

#[derive(clap::Args)]
pub struct ShowArgs {
    /// Report file written by `report`
    #[arg(short, long)]
    pub input: PathBuf,

    /// Ticker shown in titles (defaults to source.ticker)
    #[arg(short, long)]
    pub symbol: Option<String>,

    /// Do not open the chart window
    #[arg(long)]
    pub no_chart: bool,
}
