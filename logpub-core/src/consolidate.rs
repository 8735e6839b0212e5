//! Repetition consolidation: collapses consecutive repeats of a block of
//! lines into one copy plus a summary marker.
//!
//! The scan favors short periods and bounded lookahead, making the worst
//! case O(lines x SEARCH_RANGE^2) local pattern matching rather than a
//! general longest-repeated-substring search. This keeps highly repetitive
//! spam small without losing how much was repeated.
//!
//! This stage must never be fatal to report generation: any internal failure
//! degrades to the unconsolidated text plus a diagnostic note.
//!
//! License: MIT OR Apache-2.0

use anyhow::{anyhow, Result};
use log::warn;
use std::borrow::Cow;

use crate::engine::{RunSummary, TextTransform};

/// Longest period (in lines) the scan will consider.
const SEARCH_RANGE: usize = 40;

/// A run must repeat at least this many times beyond the first period.
const MIN_REPETITIONS: usize = 2;

/// A run must cover at least this many lines in total to collapse.
const MIN_RUN_LENGTH: usize = 25;

/// Note appended when consolidation degrades to a passthrough.
const FAILURE_NOTE: &str = "[Failed to consolidate repeated log lines]";

/// Stage wrapper around [`consolidate_repeated_lines`].
pub struct RepetitionConsolidator;

impl TextTransform for RepetitionConsolidator {
    fn name(&self) -> &'static str {
        "consolidate"
    }

    fn apply(&self, input: &str, summary: &mut RunSummary) -> Result<String> {
        Ok(consolidate_repeated_lines(input, summary))
    }
}

/// Collapses runs of repeated lines, degrading to a best-effort passthrough
/// on any internal failure.
pub fn consolidate_repeated_lines(log: &str, summary: &mut RunSummary) -> String {
    match try_consolidate(log) {
        Ok(consolidated) => consolidated,
        Err(err) => {
            warn!("Failed to consolidate repeated log lines: {err}");
            summary.consolidation_degraded = true;
            format!("{log}\n{FAILURE_NOTE}")
        }
    }
}

fn line_at<'a>(lines: &[&'a str], index: usize) -> Result<&'a str> {
    lines
        .get(index)
        .copied()
        .ok_or_else(|| anyhow!("line index {index} out of bounds during consolidation"))
}

fn period_matches(lines: &[&str], start: usize, period: usize) -> Result<bool> {
    let first = lines
        .get(start..start + period)
        .ok_or_else(|| anyhow!("period window [{start}, {}) out of bounds", start + period))?;
    let second = lines
        .get(start + period..start + 2 * period)
        .ok_or_else(|| anyhow!("period window [{}, {}) out of bounds", start + period, start + 2 * period))?;
    Ok(first == second)
}

fn marker_line(line_count: usize, repetitions: usize) -> String {
    if line_count == 1 {
        format!("########## The preceding line was repeated {repetitions} times ##########")
    } else {
        format!(
            "########## The preceding {line_count} lines were repeated {repetitions} times ##########"
        )
    }
}

fn try_consolidate(log: &str) -> Result<String> {
    let lines: Vec<&str> = log.split('\n').collect();
    let mut out: Vec<Cow<'_, str>> = Vec::with_capacity(lines.len());

    let mut i = 0;
    while i < lines.len() {
        let anchor = line_at(&lines, i)?;
        out.push(Cow::Borrowed(anchor));

        let mut o = 1;
        while o < SEARCH_RANGE && i + 2 * o <= lines.len() {
            // Walk forward one period at a time, counting exact repeats of
            // the block [j, j+o) against [j+o, j+2o).
            let mut r = 0;
            let mut j = i;
            while j + 2 * o <= lines.len() && period_matches(&lines, j, o)? {
                j += o;
                r += 1;
            }

            if r >= MIN_REPETITIONS && (r + 1) * o >= MIN_RUN_LENGTH {
                // The marker counts the emitted lines of the first period.
                // An empty anchor and a trailing blank period line are not
                // counted; the trailing blank is not emitted either.
                let mut n = o;
                if anchor.is_empty() {
                    n -= 1;
                }
                for k in 1..o {
                    let line = line_at(&lines, i + k)?;
                    if k == o - 1 && line.is_empty() {
                        n -= 1;
                    } else {
                        out.push(Cow::Borrowed(line));
                    }
                }

                if n >= 1 {
                    out.push(Cow::Owned(marker_line(n, r)));
                }

                // Skip everything the run consumed beyond the current line.
                i += o * r + (o - 1);

                // Keep the marker visually separated from what follows.
                if n >= 1 && i + 1 < lines.len() && !line_at(&lines, i + 1)?.is_empty() {
                    out.push(Cow::Borrowed(""));
                }

                break;
            }

            o += 1;
        }

        i += 1;
    }

    Ok(out.join("\n"))
}
