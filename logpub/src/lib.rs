// logpub/src/lib.rs
//! # logpub CLI
//!
//! Command-line front end for `logpub-core`: reads a raw diagnostic log,
//! runs the redaction/consolidation pipeline and writes the assembled
//! report, ready for sharing.

pub mod cli;
pub mod commands;
pub mod logger;
