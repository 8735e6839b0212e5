// logpub/src/main.rs
//! logpub entry point.
//!
//! Wires the CLI arguments to the core pipeline: resolves the host
//! environment, reads the raw log and the optional metadata blocks, and
//! hands everything to the publish command.

use anyhow::{Context, Result};
use clap::Parser;
use log::warn;
use std::io::Read;
use std::path::PathBuf;

use logpub::cli::Cli;
use logpub::commands::publish::{platform_detail, run_publish, PublishJob};
use logpub::logger;
use logpub_core::{HostEnvironment, PublishOptions, ReportSections};

fn main() -> Result<()> {
    let args = Cli::parse();

    if args.quiet {
        logger::init_logger(Some(log::LevelFilter::Off));
    } else if args.debug {
        logger::init_logger(Some(log::LevelFilter::Debug));
    } else {
        logger::init_logger(None);
    }

    let options = PublishOptions {
        include_platform_info: args.include_platform_info,
        allow_unlimited_log_size: args.unlimited_size,
        use_previous_log: args.previous_log,
        transport: args.transport.into(),
    };

    let host = resolve_host(&args)?;
    let raw = read_input(&args)?;

    let sections = ReportSections {
        mods: read_optional_block(args.mods_list.as_deref())?,
        patches: read_optional_block(args.patches_list.as_deref())?,
        platform_detail: Some(platform_detail()),
    };

    let job = PublishJob {
        raw,
        output: args.output.clone(),
        sections,
        quiet: args.quiet,
    };

    run_publish(job, &host, options)
}

/// Resolves the directories the path rules will redact. An explicit
/// `--install-dir` wins; otherwise the input file's directory is treated as
/// the data directory. With neither, install-path redaction is skipped.
fn resolve_host(args: &Cli) -> Result<HostEnvironment> {
    if let Some(dir) = &args.install_dir {
        return HostEnvironment::with_install_dir(dir.clone());
    }

    if let Some(input) = &args.input {
        if let Some(data_dir) = input.parent().filter(|p| !p.as_os_str().is_empty()) {
            if let Ok(host) = HostEnvironment::detect(data_dir) {
                return Ok(host);
            }
        }
    }

    warn!("No install directory available; install-path redaction will be skipped.");
    HostEnvironment::with_install_dir(PathBuf::new())
}

fn read_input(args: &Cli) -> Result<String> {
    match &args.input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read log file {}", path.display())),
        None => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .context("Failed to read the log from stdin")?;
            Ok(raw)
        }
    }
}

fn read_optional_block(path: Option<&std::path::Path>) -> Result<Option<String>> {
    path.map(|path| {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read listing file {}", path.display()))
    })
    .transpose()
}
