// logredact-core/src/engines/trigger_engine.rs
//! A `RedactionEngine` implementation that gates each regex rule behind a
//! cheap trigger-substring probe.
//!
//! For every trigger in declaration order, and every rule under it, the
//! engine checks whether the current message contains the trigger. Only then
//! does it run the rule's regex, replacing every non-overlapping match. Each
//! rule sees the output of the rule before it, so a later rule may act on
//! text an earlier replacement introduced.
//!
//! License: MIT OR APACHE 2.0

use std::borrow::Cow;
use std::path::Path;
use std::sync::Arc;

use crate::config::{CompileOptions, PolicyFormat, RuleSource};
use crate::engine::RedactionEngine;
use crate::engines::working_set::with_working_set;
use crate::errors::RedactorError;
use crate::rules::RuleTable;
use crate::sanitizers::compiler::compile;

/// Trigger-gated regex redaction over a shared, immutable `RuleTable`.
///
/// Cloning is cheap and clones share both the table and each thread's
/// cached working set.
#[derive(Debug, Clone)]
pub struct TriggerEngine {
    table: Arc<RuleTable>,
}

impl TriggerEngine {
    /// Wraps an already-compiled table.
    pub fn new(table: RuleTable) -> Self {
        Self { table: Arc::new(table) }
    }

    /// An engine with no rules; `redact` always returns its input.
    pub fn empty() -> Self {
        Self::new(RuleTable::empty())
    }

    /// Compiles `source` with default options.
    pub fn compile(source: &RuleSource) -> Result<Self, RedactorError> {
        Self::with_options(source, &CompileOptions::default())
    }

    pub fn with_options(source: &RuleSource, options: &CompileOptions) -> Result<Self, RedactorError> {
        compile(source, options).map(Self::new)
    }

    /// Loads a JSON or YAML policy document from disk.
    pub fn from_policy_file(path: impl AsRef<Path>) -> Result<Self, RedactorError> {
        Self::compile(&RuleSource::PolicyFile(path.as_ref().to_path_buf()))
    }

    /// Loads a policy from an optional file path. `None` yields an engine
    /// with no rules.
    pub fn from_optional_policy_file(path: Option<&Path>) -> Result<Self, RedactorError> {
        match path {
            Some(path) => Self::from_policy_file(path),
            None => Ok(Self::empty()),
        }
    }

    /// Compiles an in-memory JSON policy document.
    pub fn from_json_str(json: &str) -> Result<Self, RedactorError> {
        Self::compile(&RuleSource::PolicyStr {
            text: json.to_string(),
            format: PolicyFormat::Json,
        })
    }

    /// Compiles inline `trigger::regex::mask` rules.
    pub fn from_triples(text: &str) -> Result<Self, RedactorError> {
        Self::compile(&RuleSource::Triples(text.to_string()))
    }
}

impl RedactionEngine for TriggerEngine {
    fn redact<'a>(&self, message: &'a str) -> Cow<'a, str> {
        if self.table.is_empty() {
            return Cow::Borrowed(message);
        }
        with_working_set(&self.table, |set| set.apply(&self.table, message))
    }

    fn rule_table(&self) -> &RuleTable {
        &self.table
    }
}

impl Default for TriggerEngine {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::working_set::is_cached;

    const SSN_POLICY: &str = r#"{
        "version": 1,
        "rules": [
            { "description": "US SSN", "trigger": "SSN",
              "search": "\\d{3}-\\d{2}-\\d{4}", "replace": "XXX-XX-XXXX" }
        ]
    }"#;

    #[test]
    fn test_ssn_scenario() {
        let engine = TriggerEngine::from_json_str(SSN_POLICY).unwrap();
        assert_eq!(engine.redact("SSN 123-45-6789"), "SSN XXX-XX-XXXX");

        let untouched = engine.redact("no ssn here");
        assert!(matches!(untouched, Cow::Borrowed(_)));
        assert_eq!(untouched, "no ssn here");
    }

    #[test]
    fn test_trigger_gates_the_regex() {
        let engine = TriggerEngine::from_json_str(SSN_POLICY).unwrap();
        // The pattern is present but the trigger is not.
        assert_eq!(engine.redact("id 123-45-6789"), "id 123-45-6789");
    }

    #[test]
    fn test_none_passes_through() {
        let engine = TriggerEngine::from_json_str(SSN_POLICY).unwrap();
        assert!(engine.redact_opt(None).is_none());
        assert_eq!(engine.redact_opt(Some("SSN 000-00-0000")).unwrap(), "SSN XXX-XX-XXXX");
    }

    #[test]
    fn test_empty_engine_is_identity_and_builds_no_working_set() {
        let engine = TriggerEngine::from_json_str("").unwrap();
        assert!(matches!(engine.redact("anything"), Cow::Borrowed("anything")));
        assert!(!is_cached(engine.rule_table()));

        let engine = TriggerEngine::from_optional_policy_file(None).unwrap();
        assert_eq!(engine.redact("anything"), "anything");
    }

    #[test]
    fn test_rules_compose_in_declaration_order() {
        let engine = TriggerEngine::from_json_str(
            r#"{"version": 1, "rules": [
                {"search": "one", "replace": "two"},
                {"search": "two", "replace": "three"},
                {"search": "three", "replace": "four"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(engine.redact("one"), "four");
        assert_eq!(engine.redact("This one is a nice one"), "This four is a nice four");
    }

    #[test]
    fn test_later_trigger_sees_earlier_output() {
        // The first rule introduces the second rule's trigger.
        let engine = TriggerEngine::from_triples("ten::ten::eleven||eleven::eleven::twelve").unwrap();
        assert_eq!(engine.redact("Please help me: ten"), "Please help me: twelve");
    }

    #[test]
    fn test_trigger_buckets_apply_in_first_seen_order() {
        // Grouping puts both "a" rules before the "b" rule.
        let engine = TriggerEngine::from_triples("a::x::y||b::y::z||a::y::w").unwrap();
        assert_eq!(engine.redact("a x b"), "a w b");
    }

    #[test]
    fn test_case_insensitive_rule_ignores_case_in_trigger_and_pattern() {
        let engine = TriggerEngine::from_json_str(
            r#"{"version": 1, "rules": [
                {"trigger": "aaa", "search": "a", "replace": "b", "caseSensitive": false}
            ]}"#,
        )
        .unwrap();
        assert_eq!(engine.redact("Sing aAa! aaa! AAAAAA!"), "Sing bbb! bbb! bbbbbb!");
        assert_eq!(engine.redact("Hello, world"), "Hello, world");
    }

    #[test]
    fn test_case_sensitive_trigger_and_pattern() {
        let engine = TriggerEngine::from_json_str(
            r#"{"version": 1, "rules": [
                {"trigger": "Ddd", "search": "Ddd", "replace": "eEe"},
                {"trigger": "fFf", "search": "gGg", "replace": "hHh", "caseSensitive": true}
            ]}"#,
        )
        .unwrap();
        assert_eq!(engine.redact("I like dddogs. dDd"), "I like dddogs. dDd");
        assert_eq!(engine.redact("Cccats. Dddogs"), "Cccats. eEeogs");
        assert_eq!(engine.redact("Trigger fff gGg"), "Trigger fff gGg");
        assert_eq!(engine.redact("Trigger fFf Ggg"), "Trigger fFf Ggg");
        assert_eq!(engine.redact("Trigger fFf gGg"), "Trigger fFf hHh");
    }

    #[test]
    fn test_back_references() {
        let engine = TriggerEngine::from_json_str(
            r#"{"version": 1, "rules": [
                {"search": "\\d{4}-\\d{4}-\\d{4}-(\\d{4})", "replace": "XXXX-XXXX-XXXX-$1"},
                {"search": "(?:[\\w-]+\\.)+(?P<tld>[A-Za-z]{2,})\\b", "replace": "HOSTNAME.REDACTED.${tld}"},
                {"search": "(\\d{1,3})\\.(\\d{1,3})\\.(\\d{1,3})\\.(\\d{1,3})", "replace": "$3.$1.$4.$2"},
                {"search": "(Magic) (word)", "replace": "$2: $1 $2, $2"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(engine.redact("Hello, world"), "Hello, world");
        assert_eq!(engine.redact("1234-2345-3456-4576"), "XXXX-XXXX-XXXX-4576");
        assert_eq!(engine.redact("Words www.gmail.com is cool"), "Words HOSTNAME.REDACTED.com is cool");
        assert_eq!(engine.redact("short.org"), "HOSTNAME.REDACTED.org");
        assert_eq!(engine.redact("long.n4me.h-1.co.fr"), "HOSTNAME.REDACTED.fr");
        assert_eq!(engine.redact("Ping 192.168.0.1"), "Ping 0.192.1.168");
        assert_eq!(engine.redact("Magic word"), "word: Magic word, word");
    }

    #[test]
    fn test_multiline_message() {
        let engine = TriggerEngine::from_triples(r"::\d{4}-\d{4}-\d{4}-\d{4}::XXXX-XXXX-XXXX-XXXX||::\d{3}-\d{2}-\d{4}::XXX-XX-XXXX")
            .unwrap();
        assert_eq!(
            engine.redact("Multi 1234-2345-3456-4567\nLine 123-45-6789"),
            "Multi XXXX-XXXX-XXXX-XXXX\nLine XXX-XX-XXXX"
        );
    }

    #[test]
    fn test_clones_share_table() {
        let engine = TriggerEngine::from_json_str(SSN_POLICY).unwrap();
        let clone = engine.clone();
        assert_eq!(engine.rule_table().id(), clone.rule_table().id());
        assert_eq!(clone.redact("SSN 123-45-6789"), "SSN XXX-XX-XXXX");
    }
}
