//! CLI argument definitions for the grant normalizer.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "grants-normalizer",
    version,
    about = "Normalize a denormalized grant-tracking table into Grants, Progress Reports, and Site Visits",
    long_about = "Extract the denormalized grant-tracking table, decompose it into three\n\
                  related tables (Grants, Progress_Reports, Site_Visits), validate\n\
                  referential integrity, and write the results back.\n\n\
                  Reads and writes the hosted tabular-data API when GRANTS_API_TOKEN and\n\
                  GRANTS_BASE_ID are set (--remote), or local CSV files otherwise."
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

    /// Log output format (pretty for human, json for machine parsing).
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
}

#[derive(Subcommand)]
pub enum Command {
    /// Fetch the raw table, normalize it, validate, and write the results.
    Run(RunArgs),

    /// Print the fixed field schema of the raw and derived tables.
    Fields,
}

#[derive(Parser)]
pub struct RunArgs {
    /// Directory containing the raw CSV file (CSV mode).
    #[arg(long = "input-dir", value_name = "DIR", default_value = ".")]
    pub input_dir: PathBuf,

    /// Directory for derived CSV files (default: <input-dir>/output).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Use the hosted API for source and sink.
    ///
    /// Requires GRANTS_API_TOKEN and GRANTS_BASE_ID in the environment.
    #[arg(long = "remote")]
    pub remote: bool,

    /// Name of the raw table (or CSV file without extension).
    #[arg(long = "table", value_name = "NAME")]
    pub raw_table: Option<String>,

    /// Derive and validate without writing anything.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Print the structured run report as JSON instead of the summary table.
    #[arg(long = "json")]
    pub json: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
