// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `proving-ground`.
///
/// Every option except `--log-level` and `--dry-run` can also come from the
/// `[run]` section of a config file; flags given here win.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "proving-ground",
    version,
    about = "Run `prove` with optional before/after hooks.",
    override_usage = "proving-ground [OPTIONS] [FILES]..."
)]
pub struct CliArgs {
    /// Files or directories passed to `prove`.
    #[arg(value_name = "FILES")]
    pub files: Vec<String>,

    /// The command to pass to prove as its `exec` parameter (default: node).
    #[arg(short = 'e', long, value_name = "CMD")]
    pub exec: Option<String>,

    /// The level of parallelism `prove` should employ (default: 1).
    #[arg(
        short = 'n',
        long = "num-processes",
        value_name = "N",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub num_processes: Option<u32>,

    /// A shell command to run before `prove`.
    #[arg(long, value_name = "CMD")]
    pub before: Option<String>,

    /// A shell command to run after `prove` exits.
    #[arg(long, value_name = "CMD")]
    pub after: Option<String>,

    /// Fail a hook that has not finished after this many seconds.
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub hook_timeout: Option<u64>,

    /// Path to the runner binary (default: `prove` from PATH).
    #[arg(long, value_name = "PATH")]
    pub prove: Option<String>,

    /// Path to a config file (TOML).
    ///
    /// Default: `ProvingGround.toml` in the current directory, if present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `PROVING_GROUND_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Resolve and print the `prove` invocation and hooks, but run nothing.
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
