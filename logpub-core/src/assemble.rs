//! Report assembly: concatenates the timestamp, externally supplied metadata
//! blocks and the processed log body in a fixed order.
//!
//! The plugin and patch listings arrive as opaque text from the collaborator
//! that produced them; this module never formats them itself.
//!
//! License: MIT OR Apache-2.0

use chrono::{DateTime, Local};

use crate::config::PublishOptions;

const PLATFORM_SECTION_TITLE: &str = "Platform information: ";
const PLATFORM_HIDDEN_NOTE: &str = "(hidden, use publishing options to include)";

/// The metadata blocks prepended to the processed log body.
#[derive(Debug, Clone, Default)]
pub struct ReportSections {
    /// Plugin/mod listing block, verbatim.
    pub mods: Option<String>,
    /// Patch listing block, verbatim.
    pub patches: Option<String>,
    /// Platform details, included only when the options allow it.
    pub platform_detail: Option<String>,
}

/// The header line recording when the report was produced.
pub fn log_timestamp(now: DateTime<Local>) -> String {
    format!("Log uploaded on {}\n", now.format("%A, %d %B %Y, %H:%M:%S"))
}

/// The platform-information section, hidden unless the options opt in.
pub fn platform_info_section(options: &PublishOptions, detail: Option<&str>) -> String {
    match detail {
        Some(detail) if options.include_platform_info => {
            format!("{PLATFORM_SECTION_TITLE}\n{}\n", detail.trim_end())
        }
        _ => format!("{PLATFORM_SECTION_TITLE}{PLATFORM_HIDDEN_NOTE}\n"),
    }
}

fn push_block(report: &mut String, block: &str) {
    report.push_str(block);
    if !block.ends_with('\n') {
        report.push('\n');
    }
    report.push('\n');
}

/// Concatenates the final payload: timestamp, plugin listing, patch listing,
/// platform info, processed log body.
pub fn assemble_report(
    now: DateTime<Local>,
    sections: &ReportSections,
    options: &PublishOptions,
    body: &str,
) -> String {
    let mut report = String::with_capacity(body.len() + 256);
    report.push_str(&log_timestamp(now));

    if let Some(mods) = &sections.mods {
        push_block(&mut report, mods);
    }
    if let Some(patches) = &sections.patches {
        push_block(&mut report, patches);
    }
    push_block(
        &mut report,
        &platform_info_section(options, sections.platform_detail.as_deref()),
    );

    report.push_str(body);
    report
}
