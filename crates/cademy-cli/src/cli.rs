//! CLI argument definitions for the student record cleanser.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "cademy-cleanse",
    version,
    about = "Cleanse raw student records into analysis-ready tables",
    long_about = "Cleanse a raw student table.\n\n\
                  Derives age and age group, flattens contact details, splits mailing\n\
                  addresses, normalizes numeric columns, and separates incomplete records."
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

    /// Log output format (pretty for humans, json for machine parsing).
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

    /// Allow row values (birth dates, emails, addresses) in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Cleanse a student table and write the output tables.
    Cleanse(CleanseArgs),

    /// List the required input columns and the columns each stage produces.
    Schema,
}

#[derive(Parser)]
pub struct CleanseArgs {
    /// Path to the raw student CSV.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output directory for generated files (default: <INPUT dir>/output).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Date ages are computed against, as YYYY-MM-DD (default: today).
    #[arg(long = "reference-date", value_name = "DATE")]
    pub reference_date: Option<NaiveDate>,

    /// Abort on the first malformed record instead of quarantining it.
    #[arg(long = "fail-fast")]
    pub fail_fast: bool,

    /// Require exactly four comma-separated address segments.
    #[arg(long = "strict-address")]
    pub strict_address: bool,

    /// Write the run report as JSON to this path.
    #[arg(long = "report", value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Cleanse and report without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Exit with status 1 when any record was quarantined.
    #[arg(long = "fail-on-errors")]
    pub fail_on_errors: bool,
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
