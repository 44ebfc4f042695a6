//! CLI argument definitions for `mrf`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use mrf_cli::logging::LogFormat;
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(
    name = "mrf",
    version,
    about = "Build out-of-network allowed-amount machine-readable files from claims",
    long_about = "Validate claim uploads (CSV or JSON) and aggregate them into an \
                  out-of-network allowed-amounts machine-readable file.\n\n\
                  Rows that fail validation are reported with their row index and \
                  never block the valid rows."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Include claim values in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate a claims upload and report rejected rows.
    Validate(ValidateArgs),

    /// Validate claims and write the MRF document built from the valid rows.
    Generate(GenerateArgs),

    /// Parse an MRF document and check it against the output schema.
    Check(CheckArgs),

    /// List generated MRF files in a directory.
    List(ListArgs),
}

#[derive(Parser)]
pub struct ValidateArgs {
    /// Claims file (.csv or .json).
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,
}

#[derive(Parser)]
pub struct GenerateArgs {
    /// Claims file (.csv or .json).
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Reporting configuration (TOML). Built-in defaults when omitted.
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output path (default: ./mrf-out-of-network-<timestamp>.json).
    #[arg(long = "output", short = 'o', value_name = "PATH", conflicts_with = "stdout")]
    pub output: Option<PathBuf>,

    /// Print the document to stdout instead of writing a file.
    #[arg(long = "stdout")]
    pub stdout: bool,
}

#[derive(Parser)]
pub struct CheckArgs {
    #[arg(value_name = "MRF_JSON")]
    pub path: PathBuf,
}

#[derive(Parser)]
pub struct ListArgs {
    #[arg(long = "dir", value_name = "DIR", default_value = ".")]
    pub dir: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Log format (pretty for people, json for log shippers).
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl LogLevelArg {
    pub fn level_filter(self) -> LevelFilter {
        match self {
            Self::Error => LevelFilter::ERROR,
            Self::Warn => LevelFilter::WARN,
            Self::Info => LevelFilter::INFO,
            Self::Debug => LevelFilter::DEBUG,
            Self::Trace => LevelFilter::TRACE,
        }
    }
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Pretty => Self::Pretty,
            LogFormatArg::Compact => Self::Compact,
            LogFormatArg::Json => Self::Json,
        }
    }
}
