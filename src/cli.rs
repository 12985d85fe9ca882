// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

use crate::types::OutputFormat;

/// Command-line arguments for `schedgraph`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "schedgraph",
    version,
    about = "Draw one dependency graph per root scheduler.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the scheduler config file (TOML).
    #[arg(value_name = "CONFIG")]
    pub config: String,

    /// Directory that receives one file per root graph.
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: String,

    /// JSON file mapping triggerable scheduler names to the builders that
    /// trigger them.
    #[arg(short, long, value_name = "PATH")]
    pub triggerables: Option<String>,

    /// Shorthand for `--log-level debug`.
    #[arg(short, long)]
    pub verbose: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `-v`, `SCHEDGRAPH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Output file format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Dot)]
    pub format: OutputFormat,

    /// Collapse identically wired shard builders (`"test 1/2"`, `"test 2/2"`)
    /// into one node. Overrides `[graph].coalesce`.
    #[arg(long)]
    pub coalesce: bool,

    /// Regex with a `basename` group recognising shard names. Implies
    /// `--coalesce`.
    #[arg(long, value_name = "REGEX")]
    pub coalesce_pattern: Option<String>,

    /// Emit schedulers that no root reaches as graphs of their own instead of
    /// dropping them.
    #[arg(long)]
    pub keep_orphans: bool,

    /// Load, build and merge, print a summary, but write no files.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
