//! Rule compilation for the redaction engine.
//!
//! License: MIT OR Apache-2.0

pub mod compiler;
