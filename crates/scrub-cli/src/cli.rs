//! CLI argument definitions for the sales cleaning pipeline.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "scrub",
    version,
    about = "Sales data cleaning pipeline - normalize, curate and profile CSV sales data",
    long_about = "Clean raw sales exports into analysis-ready datasets.\n\n\
                  Normalization applies a fixed, configuration-driven rule order and\n\
                  records every change in an append-only lineage log. Curation applies\n\
                  business policy on top; profiling reports data quality before and after."
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
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the full pipeline: profile, normalize, curate and write outputs.
    Run(RunArgs),

    /// Profile the raw input dataset without cleaning it.
    Profile(RunArgs),
}

#[derive(Parser)]
pub struct RunArgs {
    /// Path to the pipeline configuration (JSON).
    #[arg(long = "config", value_name = "PATH")]
    pub config: PathBuf,

    /// Path to the profiling configuration (JSON). Defaults apply when omitted.
    #[arg(long = "profile-config", value_name = "PATH")]
    pub profile_config: Option<PathBuf>,
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
