// logredact-core/src/lib.rs
//! # logredact Core Library
//!
//! `logredact-core` rewrites log messages before they are written, replacing
//! sensitive substrings (card numbers, SSNs, passwords, emails, hostnames)
//! with masks. Rules are ordered `(trigger, regex, replacement)` entries: the
//! regex runs only when its trigger substring is present in the message, so
//! most messages never touch a regex at all.
//!
//! ## Modules
//!
//! * `config`: Rule sources, the versioned policy document and compile options.
//! * `rules`: The immutable, trigger-grouped `RuleTable` and its `Rule`s.
//! * `sanitizers`: Policy and triple front-ends, the compiler and replacement templates.
//! * `engine`: Defines the `RedactionEngine` trait.
//! * `engines`: The trigger-gated engine and its per-thread matcher cache.
//! * `headless`: One-shot redaction of a single string.
//! * `errors`: The `RedactorError` type returned by every load-time failure.
//!
//! ## Public API
//!
//! **Rule Sources**
//!
//! * [`RuleSource`]: A JSON/YAML policy document or a set of `trigger::regex::mask` triples.
//! * [`RuleSource::from_setting`]: Interprets a single configuration value as a path or inline rules.
//! * [`CompileOptions`]: Field strictness, default case sensitivity and regex size limits.
//!
//! **Compilation**
//!
//! * [`compile`]: Validates a source and builds a [`RuleTable`], failing on the first defect.
//!
//! **Redaction**
//!
//! * [`RedactionEngine`]: The thread-safe `redact` surface.
//! * [`TriggerEngine`]: The trigger-gated implementation.
//! * [`headless_redact_string`]: Compile and redact in one call.
//!
//! ## Usage Example
//!
//! ```rust
//! use logredact_core::{RedactionEngine, RuleSource, TriggerEngine};
//!
//! fn main() -> Result<(), logredact_core::RedactorError> {
//!     let policy = r#"{
//!         "version": 1,
//!         "rules": [
//!             { "trigger": "SSN", "search": "\\d{3}-\\d{2}-\\d{4}", "replace": "XXX-XX-XXXX" }
//!         ]
//!     }"#;
//!     let engine = TriggerEngine::compile(&RuleSource::json(policy))?;
//!
//!     assert_eq!(engine.redact("SSN 123-45-6789"), "SSN XXX-XX-XXXX");
//!     assert_eq!(engine.redact("nothing to see"), "nothing to see");
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Loading and compiling rules returns [`RedactorError`]. Once an engine
//! exists, `redact` cannot fail.
//!
//! ---
//! License: MIT OR APACHE 2.0

pub mod config;
pub mod engine;
pub mod engines;
pub mod errors;
pub mod headless;
pub mod rules;
pub mod sanitizers;

/// Re-exports rule source and policy configuration types.
pub use config::{
    CompileOptions,
    PolicyFormat,
    PolicyRule,
    RedactionPolicy,
    RuleSource,
    DEFAULT_REGEX_SIZE_LIMIT,
    SUPPORTED_POLICY_VERSION,
};

/// Re-exports the custom error type for clear error reporting.
pub use errors::RedactorError;

/// Re-exports the engine trait and its trigger-gated implementation.
pub use engine::RedactionEngine;
pub use engines::trigger_engine::TriggerEngine;

/// Re-exports the compiled rule model.
pub use rules::{Rule, RuleTable, TriggerProbe};

/// Re-exports the one-shot helper.
pub use headless::headless_redact_string;

pub use sanitizers::compiler::{compile, RuleSpec};
pub use sanitizers::template::ReplaceTemplate;
