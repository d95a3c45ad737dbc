//! Configuration management

mod preferences;

pub use preferences::{PreferencesUpdate, RouterPreferences};

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Routing preferences applied at orchestrator construction
    #[serde(default)]
    pub preferences: RouterPreferences,

    /// Telemetry configuration
    #[serde(default)]
    pub telemetry: TelemetryConfig,

    /// Search execution settings
    #[serde(default)]
    pub search: SearchConfig,
}

/// Telemetry configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TelemetryConfig {
    /// Record events at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Maximum number of retained events (oldest evicted first)
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Echo every event through `tracing`
    #[serde(default)]
    pub log_events: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            capacity: default_capacity(),
            log_events: false,
        }
    }
}

/// Search execution settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchConfig {
    /// Results converted per backend call
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Catalog results scoring above this get a content preview
    #[serde(default = "default_preview_threshold")]
    pub preview_threshold: f64,

    /// Preview length in characters
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,

    /// Accumulated results at which a fallback step is skipped
    #[serde(default = "default_sufficient_results")]
    pub sufficient_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
            preview_threshold: default_preview_threshold(),
            preview_chars: default_preview_chars(),
            sufficient_results: default_sufficient_results(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_capacity() -> usize {
    1000
}

fn default_max_results() -> usize {
    5
}

fn default_preview_threshold() -> f64 {
    0.7
}

fn default_preview_chars() -> usize {
    500
}

fn default_sufficient_results() -> usize {
    3
}

impl Config {
    /// Load config from the default path, then apply environment overrides
    pub fn load() -> Result<Self> {
        let config = Self::load_from(&Self::default_path())?;
        Ok(config.with_overrides(std::env::vars()))
    }

    /// Load config from a specific path (defaults when the file is absent)
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_yaml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(crate::CONFIG_DIR_NAME)
            .join("config.yml")
    }

    /// Apply `ROUTEWISE_*` overrides from a set of key/value pairs
    pub fn with_overrides<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in vars {
            let (key, value) = (key.as_ref(), value.as_ref().trim());
            match key {
                "ROUTEWISE_MCP_FIRST" => {
                    if let Some(v) = parse_override(key, value) {
                        self.preferences.mcp_first = v;
                    }
                }
                "ROUTEWISE_FALLBACK_TO_WEB" => {
                    if let Some(v) = parse_override(key, value) {
                        self.preferences.fallback_to_web = v;
                    }
                }
                "ROUTEWISE_MIN_CONFIDENCE" => {
                    if let Some(v) = parse_override(key, value) {
                        self.preferences.min_confidence_threshold = v;
                    }
                }
                "ROUTEWISE_TELEMETRY_ENABLED" => {
                    if let Some(v) = parse_override(key, value) {
                        self.telemetry.enabled = v;
                    }
                }
                _ => {}
            }
        }
        self
    }
}

fn parse_override<T: std::str::FromStr>(key: &str, value: &str) -> Option<T> {
    match value.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!("Ignoring unparseable override {}={}", key, value);
            None
        }
    }
}
