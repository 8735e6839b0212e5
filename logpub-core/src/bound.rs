//! Size bounding: trims the log to the line budget and appends a notice.
//!
//! License: MIT OR Apache-2.0

use anyhow::Result;
use log::debug;

use crate::config::PublishOptions;
use crate::engine::{RunSummary, TextTransform};

/// Maximum number of lines a bounded report may carry.
pub const MAX_LOG_LINE_COUNT: usize = 10_000;

/// Trims everything past the configured line budget.
pub struct SizeBounder {
    enforce: bool,
    max_lines: usize,
}

impl SizeBounder {
    pub fn from_options(options: &PublishOptions) -> Self {
        Self {
            enforce: options.enforce_line_limit(),
            max_lines: MAX_LOG_LINE_COUNT,
        }
    }
}

impl TextTransform for SizeBounder {
    fn name(&self) -> &'static str {
        "bound"
    }

    fn apply(&self, input: &str, summary: &mut RunSummary) -> Result<String> {
        if !self.enforce {
            debug!("Size bound disabled for this run.");
            return Ok(input.to_string());
        }
        Ok(trim_excess_lines(input, self.max_lines, summary))
    }
}

/// Truncates the log after the `max_lines`-th terminator and appends a
/// human-readable notice. A no-op when the log fits the budget.
pub fn trim_excess_lines(log: &str, max_lines: usize, summary: &mut RunSummary) -> String {
    match newline_offset(log, max_lines) {
        Some(offset) if offset + 1 < log.len() => {
            summary.truncated = true;
            format!(
                "{}(log trimmed to {} lines. Use publishing options to upload the full log)",
                &log[..=offset],
                group_thousands(max_lines)
            )
        }
        _ => log.to_string(),
    }
}

/// Byte offset of the `occurrence`-th `\n`, if the log has that many.
fn newline_offset(log: &str, occurrence: usize) -> Option<usize> {
    if occurrence == 0 {
        return None;
    }
    let mut seen = 0;
    for (index, byte) in log.bytes().enumerate() {
        if byte == b'\n' {
            seen += 1;
            if seen == occurrence {
                return Some(index);
            }
        }
    }
    None
}

/// Formats a count with grouped thousands, e.g. `10000` -> `"10,000"`.
fn group_thousands(value: usize) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}
