use crate::error::{AssetError, Result};
use regex::{Regex, RegexBuilder};
use std::collections::HashSet;

/// Minimum combined pattern length when no tag filter is given.
pub const MIN_QUERY_LEN: usize = 3;

/// Split a raw query on whitespace and commas, dropping case-insensitive
/// duplicates while keeping the first spelling seen. Patterns themselves are
/// never case-folded: `\S` and `\s` mean different things.
pub fn parse_query(raw: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|term| !term.is_empty())
        .filter(|term| seen.insert(term.to_lowercase()))
        .map(str::to_string)
        .collect()
}

/// Compile every pattern case-insensitively. One bad pattern fails the whole
/// query.
pub fn compile_patterns(patterns: &[String]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| {
            RegexBuilder::new(p)
                .case_insensitive(true)
                .build()
                .map_err(|e| AssetError::Validation(format!("invalid pattern '{}': {}", p, e)))
        })
        .collect()
}

/// Normalise a tag filter: comma-separated values are split, blanks dropped.
pub fn parse_tags<S: AsRef<str>>(tags: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    tags.iter()
        .flat_map(|t| t.as_ref().split(','))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .filter(|t| seen.insert(t.to_lowercase()))
        .map(str::to_string)
        .collect()
}

/// A validated, compiled query.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub(crate) patterns: Vec<Regex>,
    pub(crate) tags: Vec<String>,
}

impl SearchQuery {
    pub fn new<S: AsRef<str>>(raw: &str, tags: &[S]) -> Result<Self> {
        let terms = parse_query(raw);
        let tags = parse_tags(tags);

        if terms.is_empty() && tags.is_empty() {
            return Err(AssetError::Validation(
                "query must contain at least one term or tag".to_string(),
            ));
        }
        let total: usize = terms.iter().map(|t| t.chars().count()).sum();
        if tags.is_empty() && total < MIN_QUERY_LEN {
            return Err(AssetError::Validation(format!(
                "query too short: need at least {} characters",
                MIN_QUERY_LEN
            )));
        }

        Ok(Self {
            patterns: compile_patterns(&terms)?,
            tags,
        })
    }

    pub fn patterns(&self) -> &[Regex] {
        &self.patterns
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }
}
