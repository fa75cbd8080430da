//! triples.rs - The line-oriented `trigger::regex::mask` rule syntax.
//!
//! Each rule is three `::`-separated parts. Several rules may share a line
//! when separated by `||`. Blank lines and lines starting with `#` are
//! skipped. The trigger and mask may be empty; the regex may not.
//!
//! License: MIT OR APACHE 2.0

use log::debug;

use crate::errors::RedactorError;

const PART_SEPARATOR: &str = "::";
const RULE_SEPARATOR: &str = "||";

/// One rule as written in triple syntax, before compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripleRule {
    /// 1-based line number within the source.
    pub line: usize,
    pub trigger: String,
    pub regex: String,
    pub mask: String,
}

/// Parses every rule in `text`, in order of appearance.
pub fn parse_triples(text: &str, origin: &str) -> Result<Vec<TripleRule>, RedactorError> {
    let mut rules = Vec::new();

    for (index, raw_line) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = raw_line.trim_end_matches('\r');
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        for entry in line.split(RULE_SEPARATOR) {
            if entry.trim().is_empty() {
                continue;
            }
            let parts: Vec<&str> = entry.split(PART_SEPARATOR).collect();
            if parts.len() != 3 {
                return Err(RedactorError::MalformedTriple {
                    origin: origin.to_string(),
                    line: line_no,
                    parts: parts.len(),
                });
            }
            if parts[1].is_empty() {
                return Err(RedactorError::EmptyTripleRegex {
                    origin: origin.to_string(),
                    line: line_no,
                });
            }
            rules.push(TripleRule {
                line: line_no,
                trigger: parts[0].to_string(),
                regex: parts[1].to_string(),
                mask: parts[2].to_string(),
            });
        }
    }

    debug!("Parsed {} triple rule(s) from {}.", rules.len(), origin);
    Ok(rules)
}
