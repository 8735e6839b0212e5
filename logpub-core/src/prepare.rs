//! Convenience wrappers for one-shot, non-interactive use.
//!
//! These are the primary entry points for callers that do not need to hold
//! on to a pipeline: load the built-in rules, run every stage, and
//! optionally assemble the final report around the processed body.
//!
//! License: MIT OR Apache-2.0

use anyhow::Result;
use chrono::{DateTime, Local};

use crate::assemble::{assemble_report, ReportSections};
use crate::config::{PublishOptions, RedactionConfig};
use crate::engine::{LogPipeline, RunSummary};
use crate::host::HostEnvironment;

/// Runs the full pipeline over the raw log with the built-in rule set,
/// returning the redacted, deduplicated, size-bounded body and the run
/// summary.
pub fn prepare_log_body(
    raw: &str,
    host: &HostEnvironment,
    options: PublishOptions,
) -> Result<(String, RunSummary)> {
    let config = RedactionConfig::load_default_rules()?;
    let pipeline = LogPipeline::new(&config, host, options)?;
    pipeline.run(raw)
}

/// Prepares the body and assembles the final report payload around it.
pub fn prepare_report(
    raw: &str,
    host: &HostEnvironment,
    options: PublishOptions,
    sections: &ReportSections,
    now: DateTime<Local>,
) -> Result<(String, RunSummary)> {
    let (body, summary) = prepare_log_body(raw, host, options)?;
    Ok((assemble_report(now, sections, &options, &body), summary))
}
