// logredact/src/logger.rs
//! Logger setup for the `logredact` binary.
//!
//! License: MIT OR APACHE 2.0

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Initializes `env_logger` on stderr.
///
/// With `Some(level)` the level applies to every module and overrides
/// `RUST_LOG`. With `None`, `RUST_LOG` decides and defaults to `warn`.
/// Calling this more than once is harmless.
pub fn init_logger(level: Option<LevelFilter>) {
    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));
    if let Some(level) = level {
        builder.filter_level(level);
    }
    builder.format_timestamp(None).try_init().ok();
}
