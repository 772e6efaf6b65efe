//! CLI argument definitions for `csvw-check`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "csvw-check",
    version,
    about = "Validate CSV files against CSVW column datatypes",
    long_about = "Validate CSV files against a CSVW column schema.\n\n\
                  Each column declares a datatype, an optional format pattern \
                  and facets such as length and value range."
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

    /// Allow cell contents in trace-level log events.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate a CSV file against a schema.
    Check(CheckArgs),

    /// List the supported datatypes.
    Datatypes,
}

#[derive(Parser)]
pub struct CheckArgs {
    /// CSV file to validate.
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,

    /// JSON schema: {"columns": [...]} or CSVW table metadata.
    #[arg(long = "schema", short = 's', value_name = "SCHEMA")]
    pub schema: PathBuf,

    /// Treat the first record as data rather than a header.
    #[arg(long = "no-header")]
    pub no_header: bool,

    /// Field delimiter (a single ASCII character).
    #[arg(long = "delimiter", short = 'd', default_value = ",")]
    pub delimiter: char,

    /// Stop after this many data rows.
    #[arg(long = "max-rows", value_name = "N")]
    pub max_rows: Option<usize>,

    /// Maximum number of diagnostics listed in the issue table.
    #[arg(long = "limit", default_value_t = 50)]
    pub limit: usize,
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
