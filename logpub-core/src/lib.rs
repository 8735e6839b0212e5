// logpub-core/src/lib.rs
//! # logpub Core Library
//!
//! `logpub-core` turns a raw, potentially multi-megabyte diagnostic log into
//! a redacted, size-bounded, human-readable report suitable for public
//! sharing. The library is pure and stateless: each pipeline stage is a
//! deterministic text-to-text transform, invoked in a fixed sequence, with
//! no I/O beyond loading the embedded rule file.
//!
//! ## Pipeline
//!
//! 1. **Line-ending normalization** - CRLF becomes LF everywhere.
//! 2. **Redaction rule set** - an ordered list of pattern and
//!    delimited-range rules (install directory, home directory, player
//!    connection block, renderer block, Steam id, known noise lines).
//! 3. **Repetition consolidation** - runs of repeated lines collapse into
//!    one copy plus a `########## The preceding N lines were repeated R
//!    times ##########` marker.
//! 4. **Size bounding** - the result is trimmed to at most 10,000 lines
//!    with a trailing notice, unless the options and transport permit more.
//!
//! Report assembly (timestamp, plugin/patch listings, platform info, body)
//! sits at the boundary: the listings arrive as opaque text blocks and are
//! concatenated in a fixed order.
//!
//! ## Modules
//!
//! * `config`: rule model, embedded default rule set, run options.
//! * `host`: the host-supplied directories used by the path rules.
//! * `sanitizers`: rule compilation and caching.
//! * `engine`: the `TextTransform` stage trait and `LogPipeline` runner.
//! * `normalize`, `redact`, `consolidate`, `bound`: the four stages.
//! * `assemble`: final report concatenation.
//! * `prepare`: one-shot convenience entry points.
//! * `errors`: the `PublishError` type.
//!
//! ## Usage Example
//!
//! ```rust
//! use logpub_core::{prepare_log_body, HostEnvironment, PublishOptions};
//! use std::path::PathBuf;
//!
//! fn main() -> anyhow::Result<()> {
//!     let host = HostEnvironment::new(
//!         PathBuf::from("/opt/game"),
//!         PathBuf::from("/home/player"),
//!     );
//!     let raw = "Log line one\r\nLog line two\r\n";
//!
//!     let (body, summary) = prepare_log_body(raw, &host, PublishOptions::default())?;
//!
//!     assert_eq!(body, "Log line one\nLog line two\n");
//!     assert_eq!(summary.total_redactions(), 0);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Recoverable stage trouble never escapes the pipeline: consolidation
//! failures degrade to the unconsolidated text plus a diagnostic note, and
//! the run summary records the degradation. Genuinely unexpected failures
//! surface as `anyhow::Error` / [`PublishError`] results, never as panics.
//!
//! ---
//! License: MIT OR Apache-2.0

pub mod assemble;
pub mod bound;
pub mod config;
pub mod consolidate;
pub mod engine;
pub mod errors;
pub mod host;
pub mod normalize;
pub mod prepare;
pub mod redact;
pub mod sanitizers;

/// Re-exports the rule model and run options.
pub use config::{
    validate_rules, PublishOptions, RedactionConfig, RedactionRule, RuleKind, Transport,
    MAX_PATTERN_LENGTH,
};

/// Re-exports the custom error type for clear error reporting.
pub use errors::PublishError;

/// Re-exports the host-environment record used by the path rules.
pub use host::HostEnvironment;

/// Re-exports the pipeline seam and the run summary.
pub use engine::{LogPipeline, RuleHit, RunSummary, TextTransform};

/// Re-exports the individual stages for isolated use.
pub use bound::{SizeBounder, MAX_LOG_LINE_COUNT};
pub use consolidate::{consolidate_repeated_lines, RepetitionConsolidator};
pub use normalize::{normalize_line_endings, LineEndingNormalizer};
pub use redact::{redact_between, Redactor};

/// Re-exports report assembly and the one-shot entry points.
pub use assemble::{assemble_report, log_timestamp, platform_info_section, ReportSections};
pub use prepare::{prepare_log_body, prepare_report};

/// Re-exports the rule compiler for advanced usage.
pub use sanitizers::compiler::{compile_rules, get_or_compile_rules, CompiledRule, CompiledRules};
