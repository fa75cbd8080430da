// logredact/src/commands/mod.rs
//! Subcommand implementations and the rule loading they share.

pub mod check;
pub mod redact;

use anyhow::{Context, Result};
use log::debug;
use std::path::Path;

use logredact_core::{CompileOptions, RuleSource, TriggerEngine};

use crate::cli::RulesArgs;

/// Resolves a `--rules` value. Inline JSON and anything shaped like
/// `trigger::regex::mask` is a configuration setting; every other value
/// names a file, so a mistyped path is reported as missing.
pub fn rule_source(value: &str) -> RuleSource {
    let path = Path::new(value);
    if path.is_file() {
        return RuleSource::from_path(path);
    }
    if value.trim_start().starts_with('{') || value.contains("::") {
        RuleSource::from_setting(value)
    } else {
        RuleSource::from_path(path)
    }
}

/// Compile options selected by the command-line flags.
pub fn compile_options(args: &RulesArgs) -> CompileOptions {
    CompileOptions {
        strict_fields: !args.lenient,
        case_sensitive_default: !args.case_insensitive,
        ..CompileOptions::default()
    }
}

/// Compiles the rule source named by `args`.
pub fn load_engine(args: &RulesArgs) -> Result<TriggerEngine> {
    let source = rule_source(&args.rules);
    debug!("Resolved rule source: {:?}", source);
    TriggerEngine::with_options(&source, &compile_options(args))
        .with_context(|| format!("Failed to load redaction rules from {}", source.origin()))
}
