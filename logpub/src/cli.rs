// logpub/src/cli.rs
//! Command-line interface definition for the logpub binary.
//!
//! License: MIT OR Apache-2.0

use clap::{Parser, ValueEnum};
use logpub_core::Transport;
use std::path::PathBuf;

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "logpub",
    author,
    version = env!("CARGO_PKG_VERSION"),
    about = "Prepare a diagnostic log for public sharing",
    long_about = "Logpub redacts environment-specific and sensitive details from a raw \
diagnostic log, collapses runs of repeated lines, trims the result to a shareable size \
and assembles the final report. The upload itself is left to you."
)]
pub struct Cli {
    /// Path to the raw log file (reads from stdin if not provided).
    #[arg(value_name = "LOG_FILE")]
    pub input: Option<PathBuf>,

    /// Write the prepared report to this file instead of stdout.
    #[arg(long, short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Installation directory to redact. Defaults to the grandparent of the
    /// input file, matching the usual data-directory layout.
    #[arg(long, value_name = "DIR")]
    pub install_dir: Option<PathBuf>,

    /// Keep renderer/platform details in the report instead of redacting them.
    #[arg(long)]
    pub include_platform_info: bool,

    /// Skip the 10,000 line limit. Honored by the gist transport only.
    #[arg(long)]
    pub unlimited_size: bool,

    /// Mark the input as the log of the previous launch.
    #[arg(long)]
    pub previous_log: bool,

    /// Transport the report is destined for.
    #[arg(long, value_enum, default_value = "gist")]
    pub transport: TransportArg,

    /// File with a plugin/mod listing block to prepend verbatim.
    #[arg(long, value_name = "FILE")]
    pub mods_list: Option<PathBuf>,

    /// File with a patch listing block to prepend verbatim.
    #[arg(long, value_name = "FILE")]
    pub patches_list: Option<PathBuf>,

    /// Suppress the redaction summary and informational messages.
    #[arg(long, short = 'q')]
    pub quiet: bool,

    /// Enable debug logging.
    #[arg(long, short = 'd')]
    pub debug: bool,
}

/// Transport choices exposed on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TransportArg {
    /// GitHub gist; honors the unlimited-size option.
    Gist,
    /// Paste service; always enforces the line limit.
    Paste,
}

impl From<TransportArg> for Transport {
    fn from(value: TransportArg) -> Self {
        match value {
            TransportArg::Gist => Transport::Gist,
            TransportArg::Paste => Transport::Paste,
        }
    }
}
