//! Search backend abstraction
//!
//! The router consumes two capabilities supplied by the host:
//! - A curated catalog of vetted resources (instructions, prompts, chat modes)
//! - A general-purpose web search
//!
//! Implementations own transport concerns (HTTP, rate limits, timeouts).
//! Errors they return are recorded by the orchestrator and never propagated.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

mod memory;

pub use memory::MemoryCatalog;

/// Curated catalog capability
#[async_trait::async_trait]
pub trait CatalogSearch: Send + Sync {
    /// Find catalog items for a query
    async fn search(&self, query: &str) -> Result<Vec<CatalogItem>>;

    /// Fetch a content preview for one item
    async fn preview(&self, path: &str) -> Result<CatalogPreview>;
}

/// Web search capability
#[async_trait::async_trait]
pub trait WebSearch: Send + Sync {
    /// Return up to `max_results` hits for a query
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<WebHit>>;
}

/// Kind of curated resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Instruction,
    Prompt,
    ChatMode,
    Other,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Instruction => "instruction",
            ResourceKind::Prompt => "prompt",
            ResourceKind::ChatMode => "chatmode",
            ResourceKind::Other => "other",
        }
    }

    /// Relevance bonus for this kind of resource
    pub fn relevance_boost(&self) -> f64 {
        match self {
            ResourceKind::Instruction => 0.1,
            ResourceKind::Prompt => 0.05,
            _ => 0.0,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Item listed by the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub title: String,
    /// Path within the catalog, used for preview lookups
    pub path: String,
    pub raw_url: String,
    pub kind: ResourceKind,
}

impl CatalogItem {
    pub fn new(
        title: impl Into<String>,
        path: impl Into<String>,
        raw_url: impl Into<String>,
        kind: ResourceKind,
    ) -> Self {
        Self {
            title: title.into(),
            path: path.into(),
            raw_url: raw_url.into(),
            kind,
        }
    }
}

/// Content preview for a catalog item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogPreview {
    pub title: String,
    pub content: String,
    pub raw_url: String,
}

/// Hit returned by the web backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebHit {
    pub title: String,
    pub url: String,
    pub summary: String,
}

impl WebHit {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            summary: summary.into(),
        }
    }
}
