//! template.rs - Replacement templates with back-references.
//!
//! Replacement text follows the `regex` crate's interpolation syntax:
//! `$N` and `${N}` refer to a capture group by index, `$name` and `${name}`
//! refer to a named group, and `$$` is a literal dollar sign. `$name` takes
//! the longest run of `[_0-9A-Za-z]`, exactly as `regex::Captures::expand`
//! does.
//!
//! Unlike `expand`, which silently substitutes nothing for unknown groups,
//! templates here are parsed and resolved against the compiled pattern at
//! load time. Unknown groups, an unclosed `${`, an empty `${}` and a `$`
//! that starts no reference are all rejected before any message is seen.
//!
//! License: MIT OR APACHE 2.0

use regex::{Captures, Regex};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Literal(String),
    Group(usize),
}

/// A replacement template parsed once and resolved against its pattern's groups.
#[derive(Debug, Clone)]
pub struct ReplaceTemplate {
    source: String,
    pieces: Vec<Piece>,
    has_groups: bool,
}

impl ReplaceTemplate {
    /// Parses `template` and resolves every group reference against `regex`.
    ///
    /// On failure, returns a human-readable reason suitable for
    /// `RedactorError::InvalidTemplate`.
    pub fn parse(template: &str, regex: &Regex) -> Result<Self, String> {
        let mut pieces = Vec::new();
        let mut literal = String::new();
        let mut rest = template;

        while let Some(dollar) = rest.find('$') {
            literal.push_str(&rest[..dollar]);
            let after = &rest[dollar + 1..];

            if let Some(tail) = after.strip_prefix('$') {
                literal.push('$');
                rest = tail;
                continue;
            }

            let (name, tail) = if let Some(braced) = after.strip_prefix('{') {
                let end = braced
                    .find('}')
                    .ok_or_else(|| format!("unclosed '${{' at byte {}", template.len() - rest.len() + dollar))?;
                if end == 0 {
                    return Err("empty group reference '${}'".to_string());
                }
                (&braced[..end], &braced[end + 1..])
            } else {
                let len = after
                    .bytes()
                    .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_')
                    .count();
                if len == 0 {
                    return Err(format!(
                        "dangling '$' at byte {}; use '$$' for a literal dollar sign",
                        template.len() - rest.len() + dollar
                    ));
                }
                (&after[..len], &after[len..])
            };

            let index = resolve_group(name, regex)?;
            if !literal.is_empty() {
                pieces.push(Piece::Literal(std::mem::take(&mut literal)));
            }
            pieces.push(Piece::Group(index));
            rest = tail;
        }

        literal.push_str(rest);
        if !literal.is_empty() {
            pieces.push(Piece::Literal(literal));
        }

        let has_groups = pieces.iter().any(|p| matches!(p, Piece::Group(_)));
        Ok(Self {
            source: template.to_string(),
            pieces,
            has_groups,
        })
    }

    /// The template text as written in the rule source.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether the template refers to any capture group.
    pub fn has_groups(&self) -> bool {
        self.has_groups
    }

    /// Appends the expansion of this template for one match to `dst`.
    /// Groups that did not participate in the match expand to nothing.
    pub(crate) fn expand_into(&self, caps: &Captures<'_>, dst: &mut String) {
        for piece in &self.pieces {
            match piece {
                Piece::Literal(text) => dst.push_str(text),
                Piece::Group(index) => {
                    if let Some(m) = caps.get(*index) {
                        dst.push_str(m.as_str());
                    }
                }
            }
        }
    }

    /// Appends the literal expansion to `dst`. Only meaningful when
    /// `has_groups()` is false.
    pub(crate) fn push_literal(&self, dst: &mut String) {
        for piece in &self.pieces {
            if let Piece::Literal(text) = piece {
                dst.push_str(text);
            }
        }
    }
}

fn resolve_group(name: &str, regex: &Regex) -> Result<usize, String> {
    if let Ok(index) = name.parse::<usize>() {
        let groups = regex.captures_len();
        return if index < groups {
            Ok(index)
        } else {
            Err(format!(
                "group {} does not exist (pattern has {} capture group(s))",
                index,
                groups - 1
            ))
        };
    }
    regex
        .capture_names()
        .position(|n| n == Some(name))
        .ok_or_else(|| format!("no capture group named '{}'", name))
}
