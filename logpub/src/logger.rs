// logpub/src/logger.rs
//! Logger bootstrap for the CLI.

use log::LevelFilter;

/// Initializes env_logger, optionally overriding the level taken from the
/// environment. Safe to call more than once; later calls are ignored.
pub fn init_logger(level: Option<LevelFilter>) {
    let mut builder = env_logger::Builder::from_default_env();
    if let Some(level) = level {
        builder.filter_level(level);
    }
    builder.format_timestamp(None);
    let _ = builder.try_init();
}
