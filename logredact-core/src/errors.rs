//! errors.rs - Custom error types for the logredact-core library.
//!
//! Every failure this library can report happens while a rule source is being
//! loaded and compiled. Redaction itself is infallible, so there is no error
//! variant for "nothing matched".
//!
//! License: MIT OR APACHE 2.0

use std::path::PathBuf;
use thiserror::Error;

/// All configuration errors raised while turning a rule source into a `RuleTable`.
///
/// Each variant carries the origin of the rule source (a file path, or
/// `<inline>` for in-memory sources) and, where a single rule is at fault, a
/// label such as `rule #3 ("Mask SSNs")` or `line 7`.
///
/// Marked `#[non_exhaustive]` so new load-time checks can be added without
/// breaking downstream matches.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum RedactorError {
    #[error("Rule source '{}' not found", .0.display())]
    SourceNotFound(PathBuf),

    #[error("Rule source '{}' is a directory, not a file", .0.display())]
    SourceIsDirectory(PathBuf),

    #[error("Failed to read rule source '{}': {source}", path.display())]
    SourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{origin}: failed to parse policy document: {message}")]
    PolicyParse { origin: String, message: String },

    #[error("{origin}: no version specified")]
    MissingVersion { origin: String },

    #[error("{origin}: unknown version {found} (supported version: {supported})")]
    UnknownVersion {
        origin: String,
        found: i64,
        supported: i64,
    },

    #[error("{origin}: {rule}: unrecognized field '{field}'")]
    UnknownField {
        origin: String,
        rule: String,
        field: String,
    },

    #[error("{origin}: {rule}: the `{field}` field cannot be empty")]
    EmptyField {
        origin: String,
        rule: String,
        field: &'static str,
    },

    #[error("{origin}: {rule}: invalid regex '{pattern}': {source}")]
    InvalidRegex {
        origin: String,
        rule: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("{origin}: {rule}: invalid replacement template '{template}': {reason}")]
    InvalidTemplate {
        origin: String,
        rule: String,
        template: String,
        reason: String,
    },

    #[error("{origin}: line {line}: expected `trigger::regex::mask`, found {parts} part(s)")]
    MalformedTriple {
        origin: String,
        line: usize,
        parts: usize,
    },

    #[error("{origin}: line {line}: the regex part of `trigger::regex::mask` cannot be empty")]
    EmptyTripleRegex { origin: String, line: usize },
}

impl RedactorError {
    /// The origin (path or `<inline>`) of the rule source that failed, if the
    /// error refers to one.
    pub fn origin(&self) -> String {
        match self {
            RedactorError::SourceNotFound(path)
            | RedactorError::SourceIsDirectory(path)
            | RedactorError::SourceRead { path, .. } => path.display().to_string(),
            RedactorError::PolicyParse { origin, .. }
            | RedactorError::MissingVersion { origin }
            | RedactorError::UnknownVersion { origin, .. }
            | RedactorError::UnknownField { origin, .. }
            | RedactorError::EmptyField { origin, .. }
            | RedactorError::InvalidRegex { origin, .. }
            | RedactorError::InvalidTemplate { origin, .. }
            | RedactorError::MalformedTriple { origin, .. }
            | RedactorError::EmptyTripleRegex { origin, .. } => origin.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_origin_and_rule() {
        let err = RedactorError::EmptyField {
            origin: "/etc/redact.json".to_string(),
            rule: "rule #2".to_string(),
            field: "search",
        };
        let msg = err.to_string();
        assert!(msg.contains("/etc/redact.json"));
        assert!(msg.contains("rule #2"));
        assert!(msg.contains("`search`"));
        assert!(msg.contains("cannot be empty"));
        assert_eq!(err.origin(), "/etc/redact.json");
    }

    #[test]
    fn test_version_messages() {
        let missing = RedactorError::MissingVersion { origin: "<inline>".to_string() };
        assert!(missing.to_string().contains("no version specified"));

        let unknown = RedactorError::UnknownVersion {
            origin: "<inline>".to_string(),
            found: 2,
            supported: 1,
        };
        assert!(unknown.to_string().contains("unknown version 2"));
    }

    #[test]
    fn test_not_found_names_path() {
        let err = RedactorError::SourceNotFound(PathBuf::from("missing-rules.json"));
        assert!(err.to_string().contains("missing-rules.json"));
        assert_eq!(err.origin(), "missing-rules.json");
    }
}
