//! Routing preferences (live, caller-mutable)

use serde::{Deserialize, Serialize};

/// Preferences that steer the curated-vs-web routing decision.
///
/// Values are taken as-is: a `min_confidence_threshold` outside `[0, 1]`
/// makes the curated catalog always or never preferred, and that is the
/// caller's responsibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterPreferences {
    /// Route to the curated catalog first whenever confidence clears the threshold
    pub mcp_first: bool,
    /// Always consult the catalog for best-practices queries
    pub mcp_only_for_best_practices: bool,
    /// Plan a web search behind a curated search
    pub fallback_to_web: bool,
    /// Minimum intent confidence for `mcp_first` routing
    pub min_confidence_threshold: f64,
}

impl Default for RouterPreferences {
    fn default() -> Self {
        Self {
            mcp_first: true,
            mcp_only_for_best_practices: false,
            fallback_to_web: true,
            min_confidence_threshold: 0.3,
        }
    }
}

impl RouterPreferences {
    /// Return a copy with `update` merged in; unspecified fields are kept.
    pub fn merged(&self, update: &PreferencesUpdate) -> Self {
        Self {
            mcp_first: update.mcp_first.unwrap_or(self.mcp_first),
            mcp_only_for_best_practices: update
                .mcp_only_for_best_practices
                .unwrap_or(self.mcp_only_for_best_practices),
            fallback_to_web: update.fallback_to_web.unwrap_or(self.fallback_to_web),
            min_confidence_threshold: update
                .min_confidence_threshold
                .unwrap_or(self.min_confidence_threshold),
        }
    }
}

/// Partial preferences update
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreferencesUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mcp_first: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mcp_only_for_best_practices: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_to_web: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_confidence_threshold: Option<f64>,
}

impl PreferencesUpdate {
    pub fn mcp_first(mut self, value: bool) -> Self {
        self.mcp_first = Some(value);
        self
    }

    pub fn mcp_only_for_best_practices(mut self, value: bool) -> Self {
        self.mcp_only_for_best_practices = Some(value);
        self
    }

    pub fn fallback_to_web(mut self, value: bool) -> Self {
        self.fallback_to_web = Some(value);
        self
    }

    pub fn min_confidence_threshold(mut self, value: f64) -> Self {
        self.min_confidence_threshold = Some(value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let prefs = RouterPreferences::default();
        assert!(prefs.mcp_first);
        assert!(!prefs.mcp_only_for_best_practices);
        assert!(prefs.fallback_to_web);
        assert_eq!(prefs.min_confidence_threshold, 0.3);
    }

    #[test]
    fn test_merge_keeps_unspecified_fields() {
        let prefs = RouterPreferences::default();
        let merged = prefs.merged(&PreferencesUpdate::default().fallback_to_web(false));

        assert!(!merged.fallback_to_web);
        assert_eq!(merged.mcp_first, prefs.mcp_first);
        assert_eq!(merged.min_confidence_threshold, prefs.min_confidence_threshold);
    }

    #[test]
    fn test_out_of_range_threshold_accepted() {
        let merged = RouterPreferences::default()
            .merged(&PreferencesUpdate::default().min_confidence_threshold(1.7));
        assert_eq!(merged.min_confidence_threshold, 1.7);
    }

    #[test]
    fn test_partial_update_from_json() {
        let update: PreferencesUpdate =
            serde_json::from_str(r#"{"mcp_first": false}"#).unwrap();
        assert_eq!(update.mcp_first, Some(false));
        assert!(update.fallback_to_web.is_none());
    }
}
