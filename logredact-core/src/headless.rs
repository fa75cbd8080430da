// File: logredact-core/src/headless.rs

//! `headless.rs`
//! Convenience wrapper for one-shot redaction without holding an engine.
//! Compiles the rule source, applies it to a single string and returns the
//! result. Callers redacting many messages should keep a `TriggerEngine`.

use anyhow::{Context, Result};

use crate::config::{CompileOptions, RuleSource};
use crate::engine::RedactionEngine;
use crate::engines::trigger_engine::TriggerEngine;

/// Fully redacts `content` with the rules from `source`.
///
/// # Arguments
///
/// * `source` - Where the rules come from (policy document or triples).
/// * `options` - Compile-time knobs such as field strictness.
/// * `content` - The string to be redacted.
pub fn headless_redact_string(source: &RuleSource, options: &CompileOptions, content: &str) -> Result<String> {
    let engine = TriggerEngine::with_options(source, options)
        .with_context(|| format!("Failed to load redaction rules from {}", source.origin()))?;
    Ok(engine.redact(content).into_owned())
}
