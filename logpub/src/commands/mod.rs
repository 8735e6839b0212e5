// logpub/src/commands/mod.rs
//! Command implementations for the logpub CLI.

pub mod publish;
