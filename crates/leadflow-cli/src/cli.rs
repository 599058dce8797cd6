//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "leadflow",
    version,
    about = "Lead ingestion pipeline - reconcile headers, dedupe, and store leads",
    long_about = "Ingest spreadsheet-like lead files with inconsistent column headers.\n\n\
                  Headers are reconciled against an evolving canonical schema; records\n\
                  are deduplicated by email/phone identity before insertion."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
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

    /// Allow row-level lead values (emails, phone numbers) in logs.
    ///
    /// Off by default; without it row-level log fields are redacted.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    /// Path to the lead database (overrides the config file).
    #[arg(long = "db", value_name = "PATH", global = true)]
    pub db: Option<PathBuf>,

    /// Path to the config file (default: ./leadflow.toml if present).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Ingest a lead file, suspending if it has unknown headers.
    Ingest(IngestArgs),

    /// Resume a suspended upload by supplying mapping decisions.
    Resolve(ResolveArgs),

    /// Show the canonical schema with aliases and required flags.
    Schema,

    /// List stored leads.
    Leads(LeadsArgs),

    /// Show aggregate counters for the store.
    Stats,

    /// Export active leads to a CSV file.
    Export(ExportArgs),
}

#[derive(Parser)]
pub struct IngestArgs {
    /// Path to the CSV lead file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

#[derive(Parser)]
pub struct ResolveArgs {
    /// Resume token returned by a suspended ingest.
    #[arg(value_name = "TOKEN")]
    pub token: String,

    /// Attach an unknown header to an existing column (repeatable).
    #[arg(long = "attach", value_name = "HEADER=COLUMN")]
    pub attach: Vec<String>,

    /// Create a new canonical column for an unknown header (repeatable).
    ///
    /// Append `:required` to mark the new column required.
    #[arg(long = "create", value_name = "HEADER=NAME[:required]")]
    pub create: Vec<String>,
}

#[derive(Parser)]
pub struct LeadsArgs {
    /// Lead status to list.
    #[arg(long = "status", value_enum, default_value = "active")]
    pub status: StatusArg,

    /// Substring match against identities and field values.
    #[arg(long = "search", value_name = "TEXT")]
    pub search: Option<String>,

    #[arg(long = "limit", default_value_t = 50)]
    pub limit: usize,

    #[arg(long = "offset", default_value_t = 0)]
    pub offset: usize,
}

#[derive(Parser)]
pub struct ExportArgs {
    /// Output CSV path.
    #[arg(value_name = "OUT")]
    pub out: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum StatusArg {
    Active,
    Duplicate,
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
