//! Routing telemetry
//!
//! Records every catalog consultation and search outcome in a bounded,
//! process-lifetime event log and derives coverage statistics from it.

mod stats;

pub use stats::{QueryStat, ResourceGap, TelemetryStats};

use crate::config::TelemetryConfig;
use crate::intent::{default_technologies, IntentType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// Default number of retained events
pub const DEFAULT_CAPACITY: usize = 1000;

/// Kind of telemetry event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    McpConsulted,
    McpResourcesFound,
    McpResourcesNotFound,
    FallbackToWeb,
    SearchCompleted,
}

/// Component an event is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSource {
    Catalog,
    Web,
    Router,
}

/// Optional event details
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<IntentType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resource_types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub search_path: Vec<String>,
}

/// Immutable telemetry record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryEvent {
    pub timestamp: DateTime<Utc>,
    pub event_type: EventType,
    pub query: String,
    pub source: EventSource,
    pub result_count: usize,
    pub success: bool,
    pub duration_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<EventMetadata>,
}

impl TelemetryEvent {
    /// Create an event stamped with the current time
    pub fn new(event_type: EventType, query: impl Into<String>, source: EventSource) -> Self {
        Self {
            timestamp: Utc::now(),
            event_type,
            query: query.into(),
            source,
            result_count: 0,
            success: true,
            duration_ms: 0,
            metadata: None,
        }
    }

    pub fn with_results(mut self, count: usize) -> Self {
        self.result_count = count;
        self
    }

    pub fn with_success(mut self, success: bool) -> Self {
        self.success = success;
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration_ms = duration.as_millis() as u64;
        self
    }

    pub fn with_metadata(mut self, metadata: EventMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Observer notified of every recorded event
pub trait TelemetrySink: Send + Sync {
    fn on_event(&self, event: &TelemetryEvent);
}

/// Echoes events through `tracing`
#[derive(Debug, Default)]
pub struct TracingSink;

impl TelemetrySink for TracingSink {
    fn on_event(&self, event: &TelemetryEvent) {
        tracing::info!(
            event = ?event.event_type,
            source = ?event.source,
            results = event.result_count,
            success = event.success,
            duration_ms = event.duration_ms,
            "telemetry: {}",
            event.query
        );
    }
}

/// Bounded in-memory telemetry log with on-demand statistics
pub struct TelemetryAggregator {
    events: RwLock<VecDeque<TelemetryEvent>>,
    capacity: usize,
    enabled: AtomicBool,
    sinks: RwLock<Vec<Arc<dyn TelemetrySink>>>,
    technologies: Vec<String>,
}

impl TelemetryAggregator {
    /// Create an enabled aggregator holding up to 1000 events
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create an enabled aggregator with a custom bound
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: RwLock::new(VecDeque::with_capacity(capacity.min(DEFAULT_CAPACITY))),
            capacity,
            enabled: AtomicBool::new(true),
            sinks: RwLock::new(Vec::new()),
            technologies: default_technologies(),
        }
    }

    /// Create from configuration, attaching a `TracingSink` if requested
    pub fn from_config(config: &TelemetryConfig) -> Self {
        let aggregator = Self::with_capacity(config.capacity);
        aggregator.set_enabled(config.enabled);
        if config.log_events {
            aggregator.add_sink(Arc::new(TracingSink));
        }
        aggregator
    }

    /// Replace the vocabulary used to spot technology-flavored queries
    pub fn with_technologies(mut self, technologies: Vec<String>) -> Self {
        self.technologies = technologies;
        self
    }

    pub fn add_sink(&self, sink: Arc<dyn TelemetrySink>) {
        self.sinks
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(sink);
    }

    /// Append an event, evicting the oldest beyond capacity. No-op when disabled.
    pub fn track_event(&self, event: TelemetryEvent) {
        if !self.is_enabled() {
            return;
        }

        for sink in self.sinks.read().unwrap_or_else(|e| e.into_inner()).iter() {
            sink.on_event(&event);
        }

        let mut events = self.events.write().unwrap_or_else(|e| e.into_inner());
        events.push_back(event);
        while events.len() > self.capacity {
            events.pop_front();
        }
    }

    pub fn track_consulted(&self, query: &str, intent: IntentType, confidence: f64) {
        self.track_event(
            TelemetryEvent::new(EventType::McpConsulted, query, EventSource::Catalog)
                .with_metadata(EventMetadata {
                    intent: Some(intent),
                    confidence: Some(confidence),
                    ..Default::default()
                }),
        );
    }

    pub fn track_resources_found(
        &self,
        query: &str,
        count: usize,
        duration: Duration,
        resource_types: Vec<String>,
    ) {
        self.track_event(
            TelemetryEvent::new(EventType::McpResourcesFound, query, EventSource::Catalog)
                .with_results(count)
                .with_duration(duration)
                .with_metadata(EventMetadata {
                    resource_types,
                    ..Default::default()
                }),
        );
    }

    pub fn track_resources_not_found(
        &self,
        query: &str,
        duration: Duration,
        reason: Option<String>,
    ) {
        let mut event =
            TelemetryEvent::new(EventType::McpResourcesNotFound, query, EventSource::Catalog)
                .with_success(false)
                .with_duration(duration);
        if reason.is_some() {
            event = event.with_metadata(EventMetadata {
                fallback_reason: reason,
                ..Default::default()
            });
        }
        self.track_event(event);
    }

    pub fn track_fallback(&self, query: &str, reason: &str) {
        self.track_event(
            TelemetryEvent::new(EventType::FallbackToWeb, query, EventSource::Web).with_metadata(
                EventMetadata {
                    fallback_reason: Some(reason.to_string()),
                    ..Default::default()
                },
            ),
        );
    }

    pub fn track_search_completed(
        &self,
        query: &str,
        total_results: usize,
        duration: Duration,
        metadata: EventMetadata,
    ) {
        self.track_event(
            TelemetryEvent::new(EventType::SearchCompleted, query, EventSource::Router)
                .with_results(total_results)
                .with_success(total_results > 0)
                .with_duration(duration)
                .with_metadata(metadata),
        );
    }

    /// Aggregate statistics over the current log
    pub fn get_stats(&self) -> TelemetryStats {
        let events = self.events.read().unwrap_or_else(|e| e.into_inner());
        stats::compute_stats(events.iter(), &self.technologies)
    }

    /// The last `limit` events, oldest first
    pub fn get_recent_events(&self, limit: usize) -> Vec<TelemetryEvent> {
        let events = self.events.read().unwrap_or_else(|e| e.into_inner());
        let skip = events.len().saturating_sub(limit);
        events.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.events.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear_data(&self) {
        self.events
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }

    /// Toggle recording of future events; existing events are kept
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }
}

impl Default for TelemetryAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TelemetryAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelemetryAggregator")
            .field("events", &self.len())
            .field("capacity", &self.capacity)
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_capacity_evicts_oldest_first() {
        let telemetry = TelemetryAggregator::with_capacity(3);
        for i in 0..5 {
            telemetry.track_fallback(&format!("q{}", i), "test");
        }

        assert_eq!(telemetry.len(), 3);
        let queries: Vec<String> = telemetry
            .get_recent_events(10)
            .into_iter()
            .map(|e| e.query)
            .collect();
        assert_eq!(queries, vec!["q2", "q3", "q4"]);
    }

    #[test]
    fn test_default_capacity() {
        let telemetry = TelemetryAggregator::new();
        for i in 0..1005 {
            telemetry.track_consulted(&format!("q{}", i), IntentType::GeneralQuestion, 0.0);
        }
        assert_eq!(telemetry.len(), DEFAULT_CAPACITY);
        assert_eq!(telemetry.get_recent_events(1)[0].query, "q1004");
        assert_eq!(telemetry.get_recent_events(DEFAULT_CAPACITY)[0].query, "q5");
    }

    #[test]
    fn test_disabled_is_noop_and_keeps_existing() {
        let telemetry = TelemetryAggregator::new();
        telemetry.track_fallback("kept", "test");

        telemetry.set_enabled(false);
        assert!(!telemetry.is_enabled());
        telemetry.track_fallback("dropped", "test");
        assert_eq!(telemetry.len(), 1);

        telemetry.set_enabled(true);
        telemetry.track_fallback("recorded", "test");
        let queries: Vec<String> = telemetry
            .get_recent_events(5)
            .into_iter()
            .map(|e| e.query)
            .collect();
        assert_eq!(queries, vec!["kept", "recorded"]);
    }

    #[test]
    fn test_recent_events_chronological() {
        let telemetry = TelemetryAggregator::new();
        telemetry.track_fallback("a", "r");
        telemetry.track_fallback("b", "r");
        telemetry.track_fallback("c", "r");

        let recent = telemetry.get_recent_events(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].query, "b");
        assert_eq!(recent[1].query, "c");
        assert!(recent[0].timestamp <= recent[1].timestamp);
        assert!(telemetry.get_recent_events(0).is_empty());
    }

    #[test]
    fn test_clear_data() {
        let telemetry = TelemetryAggregator::new();
        telemetry.track_fallback("a", "r");
        telemetry.clear_data();
        assert!(telemetry.is_empty());
        assert!(telemetry.is_enabled());
    }

    #[test]
    fn test_convenience_trackers() {
        let telemetry = TelemetryAggregator::new();
        telemetry.track_resources_found(
            "q",
            3,
            Duration::from_millis(40),
            vec!["instruction".to_string()],
        );
        telemetry.track_resources_not_found("q", Duration::from_millis(10), None);

        let events = telemetry.get_recent_events(2);
        assert_eq!(events[0].event_type, EventType::McpResourcesFound);
        assert_eq!(events[0].result_count, 3);
        assert_eq!(events[0].duration_ms, 40);
        assert!(events[0].success);
        assert_eq!(events[1].event_type, EventType::McpResourcesNotFound);
        assert!(!events[1].success);
        assert!(events[1].metadata.is_none());
    }

    struct CountingSink(AtomicUsize);

    impl TelemetrySink for CountingSink {
        fn on_event(&self, _event: &TelemetryEvent) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_sinks_observe_recorded_events_only() {
        let telemetry = TelemetryAggregator::new();
        let sink = Arc::new(CountingSink(AtomicUsize::new(0)));
        telemetry.add_sink(sink.clone());

        telemetry.track_fallback("a", "r");
        telemetry.set_enabled(false);
        telemetry.track_fallback("b", "r");

        assert_eq!(sink.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_from_config() {
        let config = TelemetryConfig {
            enabled: false,
            capacity: 10,
            log_events: true,
        };
        let telemetry = TelemetryAggregator::from_config(&config);
        assert_eq!(telemetry.capacity(), 10);
        assert!(!telemetry.is_enabled());
    }

    #[test]
    fn test_event_serialization() {
        let event = TelemetryEvent::new(EventType::FallbackToWeb, "q", EventSource::Web);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event_type"], "fallback_to_web");
        assert_eq!(json["source"], "web");
        assert!(json.get("metadata").is_none());
    }
}
