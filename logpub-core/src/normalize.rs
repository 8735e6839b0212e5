//! Line-ending normalization, the first pipeline stage.
//!
//! License: MIT OR Apache-2.0

use anyhow::Result;

use crate::engine::{RunSummary, TextTransform};

/// Canonicalizes every CRLF terminator to a single LF.
pub fn normalize_line_endings(log: &str) -> String {
    log.replace("\r\n", "\n")
}

/// Stage wrapper around [`normalize_line_endings`].
pub struct LineEndingNormalizer;

impl TextTransform for LineEndingNormalizer {
    fn name(&self) -> &'static str {
        "normalize"
    }

    fn apply(&self, input: &str, _summary: &mut RunSummary) -> Result<String> {
        Ok(normalize_line_endings(input))
    }
}
