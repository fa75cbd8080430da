// logredact-core/src/engine.rs
//! Defines the core RedactionEngine trait.
//!
//! The `RedactionEngine` trait is the collaborator-facing surface of this
//! library: logging adapters, CLIs and pipelines hold a `&dyn RedactionEngine`
//! and call [`RedactionEngine::redact`] once per message, from as many
//! threads as they like, without external synchronization.
//!
//! License: MIT OR APACHE 2.0

use std::borrow::Cow;

use crate::rules::RuleTable;

/// A synchronous, thread-safe message redactor.
pub trait RedactionEngine: Send + Sync {
    /// Applies every configured rule to `message` in declaration order.
    ///
    /// Returns `Cow::Borrowed(message)` when no rule matched, and the fully
    /// rewritten message otherwise. Never fails.
    fn redact<'a>(&self, message: &'a str) -> Cow<'a, str>;

    /// [`RedactionEngine::redact`] for an optional message; `None` passes through.
    fn redact_opt<'a>(&self, message: Option<&'a str>) -> Option<Cow<'a, str>> {
        message.map(|m| self.redact(m))
    }

    /// The immutable rule table this engine applies.
    fn rule_table(&self) -> &RuleTable;
}
