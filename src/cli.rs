// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Command-line arguments for `flowdag`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "flowdag",
    version,
    about = "Resolve workflow specifications into dependency-ordered task graphs.",
    long_about = None
)]
pub struct CliArgs {
    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `FLOWDAG_LOG` or a default level will be used.
    #[arg(long, global = true, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Validate a workflow specification.
    Validate {
        /// Path to the specification (TOML). Default: `Workflow.toml`.
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Print a summary of the workflow as well.
        #[arg(short, long)]
        verbose: bool,
    },

    /// Resolve a specification and print its execution plan.
    ///
    /// Nothing is executed.
    Plan {
        /// Path to the specification (TOML). Default: `Workflow.toml`.
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// List supported operators.
    Operators,
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
