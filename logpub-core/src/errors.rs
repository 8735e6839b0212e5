//! errors.rs - Custom error types for the logpub-core library.
//!
//! License: MIT OR Apache-2.0

use thiserror::Error;

/// Errors raised while compiling the redaction rule set.
///
/// `#[non_exhaustive]` signals to consumers that new variants may be added in
/// future versions, so they should not match exhaustively.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum PublishError {
    #[error("Failed to compile redaction rule '{0}': {1}")]
    RuleCompilationError(String, regex::Error),

    #[error("Rule '{0}': pattern length ({1}) exceeds maximum allowed ({2})")]
    PatternLengthExceeded(String, usize, usize),
}
