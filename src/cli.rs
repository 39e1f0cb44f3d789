// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `dagmake`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "dagmake",
    version,
    about = "Rebuild stale files from a rule file, in parallel.",
    long_about = None
)]
pub struct CliArgs {
    /// Rule file (`target <- dep ...;` statements).
    ///
    /// Falls back to `[config].rules` from the settings file.
    #[arg(value_name = "RULES")]
    pub rules: Option<PathBuf>,

    /// Directory the file names in the rule file are relative to.
    ///
    /// Default: `[config].directory`, or the current directory.
    #[arg(short = 'd', long, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Path to the settings file (TOML). Only read if it exists.
    ///
    /// Default: `Dagmake.toml` in the current working directory.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Number of launcher tasks used to start workers.
    ///
    /// Default: `[config].launchers`, or the number of CPUs.
    #[arg(long, value_name = "N")]
    pub launchers: Option<usize>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `DAGMAKE_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the dependency graph, but don't build anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
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
