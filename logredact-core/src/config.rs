//! Configuration management for `logredact-core`.
//!
//! This module defines the structured policy document (version 1), the set of
//! rule source shapes the compiler accepts, and the load-time options that
//! govern compilation. It handles reading sources from disk, deserializing
//! JSON and YAML policies, and the schema-level validation that must pass
//! before any rule is compiled.
//!
//! License: MIT OR Apache-2.0

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::de::IgnoredAny;
use serde::Deserialize;

use crate::errors::RedactorError;

/// The only policy document version this library understands.
pub const SUPPORTED_POLICY_VERSION: i64 = 1;

/// Default cap on the compiled size of each regex (10 MB).
pub const DEFAULT_REGEX_SIZE_LIMIT: usize = 10 * (1 << 20);

/// Origin label used for in-memory rule sources.
pub const INLINE_ORIGIN: &str = "<inline>";

/// One rule record as written in a policy document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyRule {
    #[serde(default)]
    pub description: Option<String>,
    /// Substring gate. Absent means "always attempt".
    #[serde(default)]
    pub trigger: Option<String>,
    /// Regex to search for. Required.
    #[serde(default)]
    pub search: Option<String>,
    /// Replacement template. Required.
    #[serde(default)]
    pub replace: Option<String>,
    /// Falls back to `CompileOptions::case_sensitive_default` when absent.
    #[serde(default)]
    pub case_sensitive: Option<bool>,
    #[serde(flatten)]
    pub unknown: BTreeMap<String, IgnoredAny>,
}

/// A versioned policy document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RedactionPolicy {
    #[serde(default)]
    pub version: Option<i64>,
    #[serde(default)]
    pub rules: Vec<PolicyRule>,
    #[serde(flatten)]
    pub unknown: BTreeMap<String, IgnoredAny>,
}

/// Serialization format of a structured policy document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyFormat {
    Json,
    Yaml,
}

impl PolicyFormat {
    /// `.yaml` and `.yml` files are YAML; everything else is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                PolicyFormat::Yaml
            }
            _ => PolicyFormat::Json,
        }
    }
}

/// Where a rule set comes from. Every shape compiles to the same `RuleTable`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleSource {
    /// A structured policy document on disk, format chosen by extension.
    PolicyFile(PathBuf),
    /// A structured policy document held in memory.
    PolicyStr { text: String, format: PolicyFormat },
    /// A file of `trigger::regex::mask` lines.
    TriplesFile(PathBuf),
    /// Inline `trigger::regex::mask` rules, `||`-separated and/or one per line.
    Triples(String),
}

impl RuleSource {
    /// Shorthand for an in-memory JSON policy.
    pub fn json(text: impl Into<String>) -> Self {
        RuleSource::PolicyStr {
            text: text.into(),
            format: PolicyFormat::Json,
        }
    }

    /// Shorthand for an in-memory YAML policy.
    pub fn yaml(text: impl Into<String>) -> Self {
        RuleSource::PolicyStr {
            text: text.into(),
            format: PolicyFormat::Yaml,
        }
    }

    /// Picks the file-backed shape for `path` by extension: `.json`, `.yaml`
    /// and `.yml` are policy documents, anything else is a triples file.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let is_policy = matches!(
            path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase).as_deref(),
            Some("json" | "yaml" | "yml")
        );
        if is_policy {
            RuleSource::PolicyFile(path.to_path_buf())
        } else {
            RuleSource::TriplesFile(path.to_path_buf())
        }
    }

    /// Interprets a single configuration value naming a rule set.
    ///
    /// A value starting with `/` is an absolute file path (see [`RuleSource::from_path`]).
    /// A value whose first non-blank character is `{` is an inline JSON policy.
    /// Anything else is inline triples.
    pub fn from_setting(value: &str) -> Self {
        if value.starts_with('/') {
            Self::from_path(value)
        } else if value.trim_start().starts_with('{') {
            Self::json(value)
        } else {
            RuleSource::Triples(value.to_string())
        }
    }

    /// Human-readable origin used in error messages.
    pub fn origin(&self) -> String {
        match self {
            RuleSource::PolicyFile(path) | RuleSource::TriplesFile(path) => path.display().to_string(),
            RuleSource::PolicyStr { .. } | RuleSource::Triples(_) => INLINE_ORIGIN.to_string(),
        }
    }
}

/// Load-time knobs for rule compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    /// Reject unknown fields in policy documents. When false, they are
    /// logged and ignored.
    pub strict_fields: bool,
    /// Case sensitivity for rules that do not state one, including every
    /// triple-form rule.
    pub case_sensitive_default: bool,
    /// Upper bound on the compiled size of each regex, in bytes.
    pub size_limit: usize,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            strict_fields: true,
            case_sensitive_default: true,
            size_limit: DEFAULT_REGEX_SIZE_LIMIT,
        }
    }
}

impl CompileOptions {
    /// Options that ignore unknown policy fields instead of rejecting them.
    pub fn lenient() -> Self {
        Self {
            strict_fields: false,
            ..Self::default()
        }
    }
}

/// Reads a rule source file into memory, mapping the failure modes callers
/// care about (missing, directory) to dedicated errors. The handle is closed
/// before this returns.
pub fn read_source_file(path: &Path) -> Result<String, RedactorError> {
    if path.is_dir() {
        return Err(RedactorError::SourceIsDirectory(path.to_path_buf()));
    }
    if !path.exists() {
        return Err(RedactorError::SourceNotFound(path.to_path_buf()));
    }
    debug!("Reading rule source from: {}", path.display());
    std::fs::read_to_string(path).map_err(|source| RedactorError::SourceRead {
        path: path.to_path_buf(),
        source,
    })
}

impl RedactionPolicy {
    /// Parses a policy document. A blank document is valid and yields `None`
    /// (no rules); anything else must deserialize as a policy.
    pub fn parse(text: &str, format: PolicyFormat, origin: &str) -> Result<Option<Self>, RedactorError> {
        if text.trim().is_empty() {
            debug!("Policy document {} is empty; no rules loaded.", origin);
            return Ok(None);
        }
        let parsed = match format {
            PolicyFormat::Json => serde_json::from_str::<RedactionPolicy>(text).map_err(|e| e.to_string()),
            PolicyFormat::Yaml => serde_yml::from_str::<RedactionPolicy>(text).map_err(|e| e.to_string()),
        };
        parsed.map(Some).map_err(|message| RedactorError::PolicyParse {
            origin: origin.to_string(),
            message,
        })
    }

    /// Loads and parses a policy file. Missing files, directories and blank
    /// files are handled as in [`read_source_file`] and [`RedactionPolicy::parse`].
    pub fn load_from_file(path: &Path) -> Result<Option<Self>, RedactorError> {
        let text = read_source_file(path)?;
        Self::parse(&text, PolicyFormat::from_path(path), &path.display().to_string())
    }

    /// Schema-level validation: version, unknown fields, and required fields.
    /// Regex and template validity are checked by the compiler.
    pub fn validate(&self, origin: &str, options: &CompileOptions) -> Result<(), RedactorError> {
        match self.version {
            None => {
                return Err(RedactorError::MissingVersion {
                    origin: origin.to_string(),
                })
            }
            Some(v) if v != SUPPORTED_POLICY_VERSION => {
                return Err(RedactorError::UnknownVersion {
                    origin: origin.to_string(),
                    found: v,
                    supported: SUPPORTED_POLICY_VERSION,
                })
            }
            Some(_) => {}
        }

        check_unknown_fields(&self.unknown, origin, "document", options)?;

        for (index, rule) in self.rules.iter().enumerate() {
            let label = rule_label(index, rule.description.as_deref());
            check_unknown_fields(&rule.unknown, origin, &label, options)?;

            if rule.search.as_deref().map_or(true, str::is_empty) {
                return Err(RedactorError::EmptyField {
                    origin: origin.to_string(),
                    rule: label,
                    field: "search",
                });
            }
            if rule.replace.as_deref().map_or(true, str::is_empty) {
                return Err(RedactorError::EmptyField {
                    origin: origin.to_string(),
                    rule: label,
                    field: "replace",
                });
            }
        }
        Ok(())
    }
}

/// `rule #N` (1-based), with the description appended when present.
pub(crate) fn rule_label(index: usize, description: Option<&str>) -> String {
    match description {
        Some(desc) if !desc.is_empty() => format!("rule #{} (\"{}\")", index + 1, desc),
        _ => format!("rule #{}", index + 1),
    }
}

fn check_unknown_fields(
    unknown: &BTreeMap<String, IgnoredAny>,
    origin: &str,
    label: &str,
    options: &CompileOptions,
) -> Result<(), RedactorError> {
    let Some(field) = unknown.keys().next() else {
        return Ok(());
    };
    if options.strict_fields {
        return Err(RedactorError::UnknownField {
            origin: origin.to_string(),
            rule: label.to_string(),
            field: field.clone(),
        });
    }
    for field in unknown.keys() {
        warn!("{}: {}: ignoring unrecognized field '{}'", origin, label, field);
    }
    Ok(())
}
