//! Multi-term scoring search over catalog entries.
//!
//! Every pattern must hit at least one field of an entry (AND across terms).
//! Per pattern, a name hit is worth 3, a description hit 1 and any tag hit 1.
//! The optional tag filter is OR across tags and is combined with the
//! patterns by AND.

pub mod query;

pub use query::{compile_patterns, parse_query, parse_tags, SearchQuery, MIN_QUERY_LEN};

use crate::catalog::CatalogEntry;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

pub const NAME_SCORE: u32 = 3;
pub const DESCRIPTION_SCORE: u32 = 1;
pub const TAG_SCORE: u32 = 1;
/// Score given to entries selected by tags alone.
pub const TAG_ONLY_SCORE: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    #[serde(flatten)]
    pub entry: CatalogEntry,
    pub score: u32,
}

/// Score one entry. Zero when any pattern misses every field.
pub fn score(entry: &CatalogEntry, patterns: &[Regex]) -> u32 {
    let mut total = 0;
    for pattern in patterns {
        let mut hit = 0;
        if pattern.is_match(&entry.name) {
            hit += NAME_SCORE;
        }
        if pattern.is_match(&entry.description) {
            hit += DESCRIPTION_SCORE;
        }
        if entry.tags.iter().any(|t| pattern.is_match(t)) {
            hit += TAG_SCORE;
        }
        if hit == 0 {
            return 0;
        }
        total += hit;
    }
    total
}

/// True when any filter tag equals any entry tag, ignoring case.
pub fn matches_tags(entry: &CatalogEntry, tags: &[String]) -> bool {
    tags.iter().any(|wanted| {
        entry
            .tags
            .iter()
            .any(|t| t.to_lowercase() == wanted.to_lowercase())
    })
}

/// Score and filter `entries`, best first. Ties go to category order
/// (agent, role, context, task), then name.
pub fn search<'a, I>(entries: I, query: &SearchQuery) -> Vec<SearchResult>
where
    I: IntoIterator<Item = &'a CatalogEntry>,
{
    let mut results: Vec<SearchResult> = entries
        .into_iter()
        .filter_map(|entry| {
            if !query.tags.is_empty() && !matches_tags(entry, &query.tags) {
                return None;
            }
            let score = if query.patterns.is_empty() {
                TAG_ONLY_SCORE
            } else {
                score(entry, &query.patterns)
            };
            if score == 0 {
                return None;
            }
            Some(SearchResult {
                entry: entry.clone(),
                score,
            })
        })
        .collect();

    results.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.entry.category.cmp(&b.entry.category))
            .then_with(|| a.entry.name.cmp(&b.entry.name))
    });

    debug!(
        patterns = query.patterns.len(),
        tags = query.tags.len(),
        results = results.len(),
        "search complete"
    );
    results
}

/// Keep the best `limit` results; `None` keeps everything.
pub fn truncate(mut results: Vec<SearchResult>, limit: Option<usize>) -> Vec<SearchResult> {
    if let Some(limit) = limit {
        results.truncate(limit);
    }
    results
}
