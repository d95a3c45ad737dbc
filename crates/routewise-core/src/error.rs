//! Error types for routewise

use thiserror::Error;

/// Result type alias using RouteWiseError
pub type Result<T> = std::result::Result<T, RouteWiseError>;

/// Error type alias for convenience
pub type Error = RouteWiseError;

/// Main error type for routewise
#[derive(Debug, Error)]
pub enum RouteWiseError {
    #[error("Catalog backend error: {0}")]
    Catalog(String),

    #[error("Web backend error: {0}")]
    Web(String),

    #[error("Preview fetch failed for {path}: {reason}")]
    Preview { path: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}
