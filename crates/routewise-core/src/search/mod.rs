//! Routed search
//!
//! Provides:
//! - Word-overlap relevance scoring for catalog and web hits
//! - Sequential step execution with early exit and fallback skipping
//! - Rule-based recommendations over the merged result set

mod orchestrator;
mod recommendations;
mod relevance;

pub use orchestrator::SearchOrchestrator;
pub use recommendations::generate_recommendations;
pub use relevance::{catalog_relevance, string_match, web_relevance};

use crate::intent::{SearchStrategy, StepKind};
use serde::Serialize;
use std::fmt;

/// Backend a result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultSource {
    Catalog,
    Web,
}

impl ResultSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultSource::Catalog => "catalog",
            ResultSource::Web => "web",
        }
    }
}

/// Kind tag carried by web results
pub const WEB_RESULT_KIND: &str = "web_result";

/// Ranked search result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub source: ResultSource,
    pub title: String,
    /// Truncated content preview
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub relevance_score: f64,
    /// Catalog resource kind, or `web_result`
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// One line of the search trace
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchPathEntry {
    pub action: StepKind,
    pub source: ResultSource,
    pub query: String,
    pub result_count: usize,
    pub duration_ms: u64,
    pub success: bool,
    pub skipped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl fmt::Display for SearchPathEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.source {
            ResultSource::Catalog => "Catalog search",
            ResultSource::Web => "Web search",
        };

        if self.skipped {
            write!(f, "- {} skipped", label)?;
        } else if self.success {
            write!(
                f,
                "+ {}: {} results ({}ms)",
                label, self.result_count, self.duration_ms
            )?;
        } else {
            write!(f, "x {} failed ({}ms)", label, self.duration_ms)?;
        }

        if let Some(note) = &self.note {
            write!(f, " - {}", note)?;
        }
        Ok(())
    }
}

/// Response of `SearchOrchestrator::search`
#[derive(Debug, Clone, Serialize)]
pub struct RouterSearchResponse {
    pub results: Vec<SearchResult>,
    pub strategy: SearchStrategy,
    pub search_path: Vec<SearchPathEntry>,
    pub recommendations: Vec<String>,
}

impl RouterSearchResponse {
    /// Human-readable trace, one line per step
    pub fn search_path_lines(&self) -> Vec<String> {
        self.search_path.iter().map(|e| e.to_string()).collect()
    }

    /// Whether any executed step failed
    pub fn has_failures(&self) -> bool {
        self.search_path.iter().any(|e| !e.success && !e.skipped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(success: bool, skipped: bool, note: Option<&str>) -> SearchPathEntry {
        SearchPathEntry {
            action: StepKind::WebSearch,
            source: ResultSource::Web,
            query: "q".to_string(),
            result_count: 4,
            duration_ms: 12,
            success,
            skipped,
            note: note.map(String::from),
        }
    }

    #[test]
    fn test_path_entry_display() {
        assert_eq!(entry(true, false, None).to_string(), "+ Web search: 4 results (12ms)");
        assert_eq!(
            entry(false, false, Some("timeout")).to_string(),
            "x Web search failed (12ms) - timeout"
        );
        assert_eq!(
            entry(true, true, Some("sufficient results found")).to_string(),
            "- Web search skipped - sufficient results found"
        );
    }

    #[test]
    fn test_result_serialization() {
        let result = SearchResult {
            source: ResultSource::Web,
            title: "t".to_string(),
            content: None,
            url: Some("https://example.com".to_string()),
            relevance_score: 0.5,
            kind: Some(WEB_RESULT_KIND.to_string()),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["source"], "web");
        assert_eq!(json["type"], "web_result");
        assert!(json.get("content").is_none());
    }
}
