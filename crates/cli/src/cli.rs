//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use contracts::SpeedUnit;
use std::path::PathBuf;

/// speedsync - align and merge two vehicle speed logs
#[derive(Parser, Debug)]
#[command(
    name = "speedsync",
    author,
    version,
    about = "Align a CSV speed log with an XML engine-data log",
    long_about = "Resamples two independently clocked speed logs onto uniform grids,\n\
                  estimates the constant clock offset between them by cross-correlation\n\
                  and writes one merged, time-synchronized table."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "SPEEDSYNC_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "SPEEDSYNC_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Align the two logs and write the merged table
    Run(RunArgs),

    /// Validate a job file without running
    Validate(ValidateArgs),

    /// Display job information and optionally inspect the inputs
    Info(InfoArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone, Default)]
pub struct RunArgs {
    /// Path to job file (TOML or JSON); optional when --csv and --xml are given
    #[arg(short, long, env = "SPEEDSYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Delimited-text speed log (overrides inputs.tabular.path)
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Tagged-record engine log (overrides inputs.tagged.path)
    #[arg(long)]
    pub xml: Option<PathBuf>,

    /// Speed unit of the CSV log
    #[arg(long, value_enum)]
    pub csv_units: Option<UnitArg>,

    /// Speed unit of the XML log
    #[arg(long, value_enum)]
    pub xml_units: Option<UnitArg>,

    /// Resampling interval in seconds
    #[arg(long, env = "SPEEDSYNC_INTERVAL")]
    pub interval: Option<f64>,

    /// Use this offset in seconds instead of estimating one
    #[arg(long, allow_hyphen_values = true)]
    pub offset: Option<f64>,

    /// Write the merged CSV here (replaces configured file sinks)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// With --output, also write both resampled series and a meta file
    #[arg(long, requires = "output")]
    pub write_resampled: bool,

    /// Validate the assembled job and exit without running
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to job file to validate
    #[arg(short, long, default_value = "speedsync.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to job file
    #[arg(short, long, default_value = "speedsync.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Parse both inputs and show detected channels and time ranges
    #[arg(long)]
    pub inputs: bool,

    /// Show sink configuration
    #[arg(long)]
    pub sinks: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}

/// Speed unit accepted on the command line
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnitArg {
    Kph,
    Mph,
}

impl From<UnitArg> for SpeedUnit {
    fn from(unit: UnitArg) -> Self {
        match unit {
            UnitArg::Kph => SpeedUnit::Kph,
            UnitArg::Mph => SpeedUnit::Mph,
        }
    }
}
