//! Word-overlap relevance heuristics

use crate::backend::{CatalogItem, WebHit};

const CATALOG_CAP: f64 = 0.95;
const WEB_CAP: f64 = 0.9;

/// Fraction of query words (longer than two characters) found in `haystack`.
///
/// Case-insensitive substring test; 0 when the query has no such words.
pub fn string_match(haystack: &str, query: &str) -> f64 {
    let haystack = haystack.to_lowercase();
    let words: Vec<String> = query
        .to_lowercase()
        .split_whitespace()
        .filter(|w| w.chars().count() > 2)
        .map(String::from)
        .collect();

    if words.is_empty() {
        return 0.0;
    }

    let found = words.iter().filter(|w| haystack.contains(w.as_str())).count();
    found as f64 / words.len() as f64
}

/// 0.6 title + 0.4 path + kind boost, capped at 0.95
pub fn catalog_relevance(item: &CatalogItem, query: &str) -> f64 {
    let score = 0.6 * string_match(&item.title, query)
        + 0.4 * string_match(&item.path, query)
        + item.kind.relevance_boost();
    score.min(CATALOG_CAP)
}

/// 0.7 title + 0.3 summary, capped at 0.9
pub fn web_relevance(hit: &WebHit, query: &str) -> f64 {
    let score = 0.7 * string_match(&hit.title, query) + 0.3 * string_match(&hit.summary, query);
    score.min(WEB_CAP)
}
