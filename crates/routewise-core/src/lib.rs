//! Routewise Core Library
//!
//! Routes free-text queries between a curated resource catalog and general
//! web search.
//!
//! # Features
//! - Regex-driven intent classification with technology-keyword boosting
//! - Prioritized search strategies with early exit and fallback skipping
//! - Word-overlap relevance scoring and source-aware result ranking
//! - Bounded in-memory telemetry with coverage-gap statistics

pub mod backend;
pub mod config;
pub mod error;
pub mod intent;
pub mod search;
pub mod telemetry;

pub use backend::{
    CatalogItem, CatalogPreview, CatalogSearch, MemoryCatalog, ResourceKind, WebHit, WebSearch,
};
pub use config::{Config, PreferencesUpdate, RouterPreferences, SearchConfig, TelemetryConfig};
pub use error::{Error, Result, RouteWiseError};
pub use intent::{
    IntentClassifier, IntentType, PatternLibrary, QueryIntent, SearchStep, SearchStrategy,
    StepKind, StepPriority,
};
pub use search::{
    RouterSearchResponse, ResultSource, SearchOrchestrator, SearchPathEntry, SearchResult,
};
pub use telemetry::{
    EventMetadata, EventSource, EventType, TelemetryAggregator, TelemetryEvent, TelemetrySink,
    TelemetryStats, TracingSink,
};

/// Default config directory name
pub const CONFIG_DIR_NAME: &str = "routewise";
