//! Candidate token classification
//!
//! A candidate is two or more ASCII letters immediately followed by a colon
//! that is not itself followed by `/`, so `foaf:` in `foaf:name` qualifies but
//! `http:` in `<http://example.org/>` does not. Matching is line-local and
//! non-overlapping.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use super::table::PrefixTable;

static CANDIDATE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-zA-Z]{2,}:").expect("candidate pattern is valid"));

/// A `name:` token that may need a prefix declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateToken {
    /// Token text including the trailing colon (e.g. `foaf:`)
    pub name: String,
}

/// Lazy iterator over the candidate tokens of one line.
///
/// The regex engine has no lookahead, so matches whose colon is followed by
/// `/` are dropped here. No other match can start inside a rejected one, which
/// keeps the result identical to a lookahead pattern.
pub struct CandidateTokens<'a> {
    line: &'a str,
    matches: regex::Matches<'static, 'a>,
}

impl<'a> Iterator for CandidateTokens<'a> {
    type Item = CandidateToken;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let found = self.matches.next()?;
            if self.line[found.end()..].starts_with('/') {
                continue;
            }
            return Some(CandidateToken {
                name: found.as_str().to_string(),
            });
        }
    }
}

pub fn candidate_tokens(line: &str) -> CandidateTokens<'_> {
    CandidateTokens {
        line,
        matches: CANDIDATE_PATTERN.find_iter(line),
    }
}

/// Prefix names that need no declaration, owned by a single pipeline pass.
#[derive(Debug, Clone, Default)]
pub struct KnownPrefixes {
    names: HashSet<String>,
}

impl KnownPrefixes {
    pub fn from_table(table: &PrefixTable) -> Self {
        Self {
            names: table.names().map(str::to_string).collect(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Returns `true` if the name was not known before.
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.names.insert(name.into())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Returns the candidate tokens on `line` that are not yet known.
///
/// At most `cap` pattern matches are examined (known tokens count against the
/// cap). Repeated names on the same line are reported once, at their first
/// occurrence.
pub fn classify_line(line: &str, known: &KnownPrefixes, cap: usize) -> Vec<CandidateToken> {
    let mut seen = HashSet::new();
    candidate_tokens(line)
        .take(cap)
        .filter(|token| !known.contains(&token.name))
        .filter(|token| seen.insert(token.name.clone()))
        .collect()
}
