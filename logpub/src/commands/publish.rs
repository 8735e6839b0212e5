// logpub/src/commands/publish.rs
//! The report-preparation command: runs the core pipeline over the raw log
//! and writes the assembled report.
//!
//! License: MIT OR Apache-2.0

use anyhow::{Context, Result};
use chrono::Local;
use log::{debug, info};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use logpub_core::{prepare_report, HostEnvironment, PublishOptions, ReportSections, RunSummary};

/// Inputs for one preparation run.
pub struct PublishJob {
    /// Raw log contents, as read from the file or stdin.
    pub raw: String,
    /// Where to write the report; stdout when absent.
    pub output: Option<PathBuf>,
    /// Opaque metadata blocks to prepend.
    pub sections: ReportSections,
    /// Suppress the stderr summary.
    pub quiet: bool,
}

/// The main operation runner for the logpub CLI.
pub fn run_publish(job: PublishJob, host: &HostEnvironment, options: PublishOptions) -> Result<()> {
    info!("Starting log preparation.");

    let raw = prefix_body(&job.raw, &options);
    let (report, summary) = prepare_report(&raw, host, options, &job.sections, Local::now())
        .context("Log preparation failed")?;

    debug!(
        "Log prepared. Raw length: {}, report length: {}.",
        job.raw.len(),
        report.len()
    );

    write_report(job.output.as_deref(), &report)?;

    if !job.quiet {
        print_summary(&summary);
    }

    info!("Log preparation completed.");
    Ok(())
}

/// The processed body opens with a line naming which launch it came from.
fn prefix_body(raw: &str, options: &PublishOptions) -> String {
    if options.use_previous_log {
        format!("Log file contents from previous game launch:\n{raw}")
    } else {
        format!("Log file contents:\n{raw}")
    }
}

/// Platform details for the optional platform-information section.
pub fn platform_detail() -> String {
    format!(
        "OS: {}\nArch: {}",
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

fn write_report(output: Option<&std::path::Path>, report: &str) -> Result<()> {
    match output {
        Some(path) => {
            info!("Writing report to file: {}", path.display());
            let mut file = fs::File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            write_all(&mut file, report)
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            write_all(&mut writer, report)
        }
    }
}

fn write_all(writer: &mut impl Write, report: &str) -> Result<()> {
    writer.write_all(report.as_bytes())?;
    if !report.ends_with('\n') {
        writer.write_all(b"\n")?;
    }
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    if summary.rule_hits.is_empty() {
        eprintln!("No redactions were necessary.");
    } else {
        eprintln!("Redaction summary:");
        for hit in &summary.rule_hits {
            eprintln!("  {}: {} occurrence(s)", hit.rule_name, hit.occurrences);
        }
    }
    if summary.consolidation_degraded {
        eprintln!("Note: repeated-line consolidation was skipped after an internal error.");
    }
    if summary.truncated {
        eprintln!("Note: the log was trimmed to the line limit.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_prefix_names_the_launch() {
        let current = prefix_body("raw\n", &PublishOptions::default());
        assert!(current.starts_with("Log file contents:\n"));

        let options = PublishOptions {
            use_previous_log: true,
            ..Default::default()
        };
        let previous = prefix_body("raw\n", &options);
        assert!(previous.starts_with("Log file contents from previous game launch:\n"));
    }

    #[test]
    fn write_all_terminates_the_report_with_a_newline() {
        let mut buffer = Vec::new();
        write_all(&mut buffer, "no trailing newline").unwrap();
        assert!(buffer.ends_with(b"\n"));

        let mut buffer = Vec::new();
        write_all(&mut buffer, "already terminated\n").unwrap();
        assert_eq!(buffer, b"already terminated\n");
    }
}
