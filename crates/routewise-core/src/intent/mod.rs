//! Query intent classification and search planning
//!
//! Provides:
//! - A data-driven pattern library (intent categories + technology vocabulary)
//! - Rule-based intent scoring and curated-vs-web routing
//! - Search strategy planning (ordered, prioritized steps)

mod classifier;
mod patterns;

pub use classifier::IntentClassifier;
pub use patterns::{default_technologies, IntentType, PatternLibrary};

use serde::{Deserialize, Serialize};

/// Classified intent of a query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryIntent {
    /// Winning intent category
    pub intent_type: IntentType,
    /// Confidence score (0.0 - 0.95)
    pub confidence: f64,
    /// Whether the curated catalog should be the primary source
    pub should_use_mcp: bool,
    /// Up to five search terms, insertion order preserved
    pub suggested_search_terms: Vec<String>,
    /// Human-readable routing rationale
    pub reasoning: String,
}

/// Backend a step runs against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    CatalogSearch,
    WebSearch,
}

impl StepKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepKind::CatalogSearch => "catalog_search",
            StepKind::WebSearch => "web_search",
        }
    }
}

/// Step priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepPriority {
    /// Primary source for the query
    High,
    /// Only runs when earlier steps did not produce enough results
    Fallback,
    /// Runs after the primary source to widen coverage
    Supplementary,
}

/// A single planned backend call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchStep {
    #[serde(rename = "type")]
    pub kind: StepKind,
    pub query: String,
    pub priority: StepPriority,
    pub reasoning: String,
}

/// Ordered plan for one query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchStrategy {
    pub intent: QueryIntent,
    pub steps: Vec<SearchStep>,
    pub explanation: String,
}
