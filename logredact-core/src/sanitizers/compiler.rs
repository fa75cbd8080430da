//! compiler.rs - Turns rule sources into a validated `RuleTable`.
//!
//! Every source shape (JSON or YAML policy documents, inline or file-backed
//! triples) is reduced to a list of [`RuleSpec`]s and compiled through the
//! same path. Regexes and replacement templates are compiled exactly once,
//! here. Nothing is deferred to match time.
//!
//! License: MIT OR APACHE 2.0

use log::{debug, info};
use regex::RegexBuilder;

use crate::config::{read_source_file, rule_label, CompileOptions, PolicyFormat, RedactionPolicy, RuleSource};
use crate::errors::RedactorError;
use crate::rules::{Rule, RuleTable, TriggerProbe};
use crate::sanitizers::template::ReplaceTemplate;
use crate::sanitizers::triples::{parse_triples, TripleRule};

/// A rule that has passed schema validation but not yet been compiled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSpec {
    /// Locates the rule in its source for error messages.
    pub label: String,
    pub description: Option<String>,
    pub trigger: String,
    pub search: String,
    pub replace: String,
    pub case_sensitive: bool,
}

impl RuleSpec {
    fn from_triple(triple: TripleRule, options: &CompileOptions) -> Self {
        Self {
            label: format!("line {}", triple.line),
            description: None,
            trigger: triple.trigger,
            search: triple.regex,
            replace: triple.mask,
            case_sensitive: options.case_sensitive_default,
        }
    }
}

/// Compiles any rule source into a `RuleTable`.
pub fn compile(source: &RuleSource, options: &CompileOptions) -> Result<RuleTable, RedactorError> {
    let origin = source.origin();
    debug!("Compiling rule source {}.", origin);

    let specs = match source {
        RuleSource::PolicyFile(path) => {
            let text = read_source_file(path)?;
            policy_specs(&text, PolicyFormat::from_path(path), &origin, options)?
        }
        RuleSource::PolicyStr { text, format } => policy_specs(text, *format, &origin, options)?,
        RuleSource::TriplesFile(path) => {
            let text = read_source_file(path)?;
            triple_specs(&text, &origin, options)?
        }
        RuleSource::Triples(text) => triple_specs(text, &origin, options)?,
    };

    let table = compile_specs(specs, &origin, options)?;
    info!(
        "Loaded {} redaction rule(s) under {} trigger(s) from {}.",
        table.len(),
        table.trigger_count(),
        origin
    );
    Ok(table)
}

/// Validates a policy document and lowers it to rule specs.
pub fn policy_specs(
    text: &str,
    format: PolicyFormat,
    origin: &str,
    options: &CompileOptions,
) -> Result<Vec<RuleSpec>, RedactorError> {
    let Some(policy) = RedactionPolicy::parse(text, format, origin)? else {
        return Ok(Vec::new());
    };
    policy.validate(origin, options)?;

    Ok(policy
        .rules
        .into_iter()
        .enumerate()
        .map(|(index, rule)| RuleSpec {
            label: rule_label(index, rule.description.as_deref()),
            description: rule.description,
            trigger: rule.trigger.unwrap_or_default(),
            search: rule.search.unwrap_or_default(),
            replace: rule.replace.unwrap_or_default(),
            case_sensitive: rule.case_sensitive.unwrap_or(options.case_sensitive_default),
        })
        .collect())
}

fn triple_specs(text: &str, origin: &str, options: &CompileOptions) -> Result<Vec<RuleSpec>, RedactorError> {
    Ok(parse_triples(text, origin)?
        .into_iter()
        .map(|triple| RuleSpec::from_triple(triple, options))
        .collect())
}

/// Compiles validated specs, in order, into a `RuleTable`. Fails on the first
/// invalid pattern or template.
pub fn compile_specs(specs: Vec<RuleSpec>, origin: &str, options: &CompileOptions) -> Result<RuleTable, RedactorError> {
    let mut rules = Vec::with_capacity(specs.len());
    for spec in specs {
        rules.push(compile_rule(spec, origin, options)?);
    }
    debug!("Finished compiling rules. Total compiled: {}.", rules.len());
    Ok(RuleTable::from_rules(rules))
}

fn compile_rule(spec: RuleSpec, origin: &str, options: &CompileOptions) -> Result<Rule, RedactorError> {
    debug!("Attempting to compile {} with pattern '{}'", spec.label, spec.search);

    let search = RegexBuilder::new(&spec.search)
        .case_insensitive(!spec.case_sensitive)
        .size_limit(options.size_limit)
        .build()
        .map_err(|source| RedactorError::InvalidRegex {
            origin: origin.to_string(),
            rule: spec.label.clone(),
            pattern: spec.search.clone(),
            source,
        })?;

    let replace = ReplaceTemplate::parse(&spec.replace, &search).map_err(|reason| RedactorError::InvalidTemplate {
        origin: origin.to_string(),
        rule: spec.label.clone(),
        template: spec.replace.clone(),
        reason,
    })?;

    let probe = TriggerProbe::new(&spec.trigger, spec.case_sensitive).map_err(|source| RedactorError::InvalidRegex {
        origin: origin.to_string(),
        rule: spec.label.clone(),
        pattern: spec.trigger.clone(),
        source,
    })?;

    Ok(Rule::new(
        spec.description,
        spec.trigger,
        search,
        replace,
        spec.case_sensitive,
        probe,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_json_policy() {
        let source = RuleSource::json(
            r#"{"version": 1, "rules": [
                {"trigger": "SSN", "search": "\\d{3}-\\d{2}-\\d{4}", "replace": "XXX-XX-XXXX"},
                {"search": "\\d{16}", "replace": "XXXXXXXXXXXXXXXX", "caseSensitive": false},
                {"trigger": "SSN", "search": "\\d{9}", "replace": "XXXXXXXXX"}
            ]}"#,
        );
        let table = compile(&source, &CompileOptions::default()).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.triggers().collect::<Vec<_>>(), vec!["SSN", ""]);
        assert_eq!(table.rules_for("SSN").unwrap().len(), 2);

        let always = &table.rules_for("").unwrap()[0];
        assert!(!always.case_sensitive());
        assert_eq!(always.replace().as_str(), "XXXXXXXXXXXXXXXX");
    }

    #[test]
    fn test_absent_trigger_normalizes_to_empty() {
        let specs = policy_specs(
            r#"{"version": 1, "rules": [{"description": "d", "search": "a", "replace": "b"}]}"#,
            PolicyFormat::Json,
            "<inline>",
            &CompileOptions::default(),
        )
        .unwrap();
        assert_eq!(specs[0].trigger, "");
        assert_eq!(specs[0].label, "rule #1 (\"d\")");
        assert!(specs[0].case_sensitive);
    }

    #[test]
    fn test_case_sensitive_default_applies_to_unstated_rules() {
        let options = CompileOptions {
            case_sensitive_default: false,
            ..CompileOptions::default()
        };
        let table = compile(&RuleSource::Triples("ssn::\\d{9}::X".to_string()), &options).unwrap();
        assert!(!table.rules().next().unwrap().case_sensitive());
    }

    #[test]
    fn test_invalid_regex_names_pattern_and_rule() {
        let source = RuleSource::json(r#"{"version": 1, "rules": [{"search": "[a-z", "replace": "x"}]}"#);
        let err = compile(&source, &CompileOptions::default()).unwrap_err();
        match &err {
            RedactorError::InvalidRegex { pattern, rule, .. } => {
                assert_eq!(pattern, "[a-z");
                assert_eq!(rule, "rule #1");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains("[a-z"));
    }

    #[test]
    fn test_invalid_template_is_load_time_error() {
        let source = RuleSource::Triples(r"::(\d+)::$2".to_string());
        let err = compile(&source, &CompileOptions::default()).unwrap_err();
        match err {
            RedactorError::InvalidTemplate { rule, template, .. } => {
                assert_eq!(rule, "line 1");
                assert_eq!(template, "$2");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_size_limit_is_enforced() {
        let options = CompileOptions {
            size_limit: 16,
            ..CompileOptions::default()
        };
        let err = compile(&RuleSource::Triples(r"::\w{50}::x".to_string()), &options).unwrap_err();
        assert!(matches!(err, RedactorError::InvalidRegex { .. }));
    }

    #[test]
    fn test_blank_sources_compile_to_empty_tables() {
        for source in [RuleSource::json(""), RuleSource::yaml("\n"), RuleSource::Triples(String::new())] {
            let table = compile(&source, &CompileOptions::default()).unwrap();
            assert!(table.is_empty());
        }
    }
}
