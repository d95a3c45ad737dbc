//! Search orchestrator - executes routing strategies against the backends

use super::{
    catalog_relevance, generate_recommendations, web_relevance, ResultSource,
    RouterSearchResponse, SearchPathEntry, SearchResult, WEB_RESULT_KIND,
};
use crate::backend::{CatalogSearch, WebSearch};
use crate::config::{Config, PreferencesUpdate, RouterPreferences, SearchConfig};
use crate::intent::{
    IntentClassifier, QueryIntent, SearchStep, SearchStrategy, StepKind, StepPriority,
};
use crate::telemetry::{EventMetadata, TelemetryAggregator};
use std::cmp::Ordering;
use std::sync::{Arc, RwLock};
use tokio::time::Instant;

/// Routes queries between the curated catalog and web search.
///
/// Steps of one search run strictly in sequence because each step's
/// outcome decides whether the next one runs. Concurrent searches share
/// only the telemetry log and the live preferences.
pub struct SearchOrchestrator {
    classifier: IntentClassifier,
    catalog: Arc<dyn CatalogSearch>,
    web: Arc<dyn WebSearch>,
    telemetry: Arc<TelemetryAggregator>,
    preferences: RwLock<RouterPreferences>,
    settings: SearchConfig,
}

/// How the most recent catalog step ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CatalogOutcome {
    NotRun,
    Found(usize),
    Empty,
    Failed,
}

impl SearchOrchestrator {
    /// Create with default classifier, preferences and settings
    pub fn new(
        catalog: Arc<dyn CatalogSearch>,
        web: Arc<dyn WebSearch>,
        telemetry: Arc<TelemetryAggregator>,
    ) -> Self {
        Self {
            classifier: IntentClassifier::default(),
            catalog,
            web,
            telemetry,
            preferences: RwLock::new(RouterPreferences::default()),
            settings: SearchConfig::default(),
        }
    }

    /// Create from configuration with a fresh telemetry aggregator
    pub fn from_config(
        config: &Config,
        catalog: Arc<dyn CatalogSearch>,
        web: Arc<dyn WebSearch>,
    ) -> Self {
        let telemetry = Arc::new(TelemetryAggregator::from_config(&config.telemetry));
        Self::new(catalog, web, telemetry)
            .with_preferences(config.preferences.clone())
            .with_settings(config.search.clone())
    }

    pub fn with_classifier(mut self, classifier: IntentClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_preferences(self, preferences: RouterPreferences) -> Self {
        self.set_preferences(preferences);
        self
    }

    pub fn with_settings(mut self, settings: SearchConfig) -> Self {
        self.settings = settings;
        self
    }

    pub fn telemetry(&self) -> &Arc<TelemetryAggregator> {
        &self.telemetry
    }

    /// Snapshot of the live preferences
    pub fn preferences(&self) -> RouterPreferences {
        self.preferences
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Merge a partial update into the live preferences
    pub fn update_preferences(&self, update: &PreferencesUpdate) {
        let mut prefs = self.preferences.write().unwrap_or_else(|e| e.into_inner());
        *prefs = prefs.merged(update);
        tracing::debug!("Preferences updated: {:?}", *prefs);
    }

    /// Replace the live preferences wholesale
    pub fn set_preferences(&self, preferences: RouterPreferences) {
        *self.preferences.write().unwrap_or_else(|e| e.into_inner()) = preferences;
    }

    /// Classify a query (live preferences unless overridden)
    pub fn analyze_intent(
        &self,
        query: &str,
        preferences: Option<&RouterPreferences>,
    ) -> QueryIntent {
        match preferences {
            Some(prefs) => self.classifier.analyze_intent(query, prefs),
            None => self.classifier.analyze_intent(query, &self.preferences()),
        }
    }

    /// Plan a query (live preferences unless overridden)
    pub fn create_search_strategy(
        &self,
        query: &str,
        preferences: Option<&RouterPreferences>,
    ) -> SearchStrategy {
        match preferences {
            Some(prefs) => self.classifier.create_search_strategy(query, prefs),
            None => self
                .classifier
                .create_search_strategy(query, &self.preferences()),
        }
    }

    /// Route a query, run its steps, and rank the merged results.
    ///
    /// Never fails: backend errors become failed `search_path` entries.
    pub async fn search(&self, query: &str) -> RouterSearchResponse {
        let started = Instant::now();
        let preferences = self.preferences();
        let strategy = self.classifier.create_search_strategy(query, &preferences);

        tracing::info!(
            "Routing '{}': {} steps ({})",
            query,
            strategy.steps.len(),
            strategy.explanation
        );

        let mut results: Vec<SearchResult> = Vec::new();
        let mut search_path: Vec<SearchPathEntry> = Vec::new();
        let mut catalog_outcome = CatalogOutcome::NotRun;

        for step in &strategy.steps {
            if step.priority == StepPriority::Fallback
                && results.len() >= self.settings.sufficient_results
            {
                tracing::debug!(
                    "Skipping {} fallback: {} results already",
                    step.kind.as_str(),
                    results.len()
                );
                search_path.push(SearchPathEntry {
                    action: step.kind,
                    source: source_for(step.kind),
                    query: step.query.clone(),
                    result_count: 0,
                    duration_ms: 0,
                    success: true,
                    skipped: true,
                    note: Some("sufficient results found".to_string()),
                });
                continue;
            }

            match step.kind {
                StepKind::CatalogSearch => {
                    catalog_outcome = self
                        .run_catalog_step(query, step, &strategy.intent, &mut results, &mut search_path)
                        .await;

                    let produced = matches!(catalog_outcome, CatalogOutcome::Found(_));
                    if step.priority == StepPriority::High
                        && produced
                        && !preferences.fallback_to_web
                    {
                        tracing::debug!("Catalog satisfied the query, stopping early");
                        break;
                    }
                }
                StepKind::WebSearch => {
                    if step.priority == StepPriority::Fallback {
                        let reason = fallback_reason(catalog_outcome);
                        self.telemetry.track_fallback(query, &reason);
                    }
                    self.run_web_step(query, step, &mut results, &mut search_path)
                        .await;
                }
            }
        }

        rank_results(&mut results, preferences.mcp_first);
        let recommendations = generate_recommendations(&results, strategy.intent.intent_type);

        let response = RouterSearchResponse {
            results,
            strategy,
            search_path,
            recommendations,
        };

        let mut resource_types: Vec<String> = Vec::new();
        for kind in response.results.iter().filter_map(|r| r.kind.as_ref()) {
            if !resource_types.contains(kind) {
                resource_types.push(kind.clone());
            }
        }

        self.telemetry.track_search_completed(
            query,
            response.results.len(),
            started.elapsed(),
            EventMetadata {
                intent: Some(response.strategy.intent.intent_type),
                confidence: Some(response.strategy.intent.confidence),
                resource_types,
                search_path: response.search_path_lines(),
                ..Default::default()
            },
        );

        tracing::info!(
            "Search '{}' completed: {} results in {}ms",
            query,
            response.results.len(),
            started.elapsed().as_millis()
        );

        response
    }

    async fn run_catalog_step(
        &self,
        query: &str,
        step: &SearchStep,
        intent: &QueryIntent,
        results: &mut Vec<SearchResult>,
        search_path: &mut Vec<SearchPathEntry>,
    ) -> CatalogOutcome {
        self.telemetry
            .track_consulted(query, intent.intent_type, intent.confidence);

        let start = Instant::now();
        let outcome = self.catalog.search(&step.query).await;
        let elapsed = start.elapsed();

        let items = match outcome {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!("Catalog search failed for '{}': {}", step.query, e);
                self.telemetry.track_resources_not_found(
                    query,
                    elapsed,
                    Some(format!("catalog error: {}", e)),
                );
                search_path.push(failed_entry(step, elapsed.as_millis() as u64, e.to_string()));
                return CatalogOutcome::Failed;
            }
        };

        let mut converted = Vec::new();
        for item in items.into_iter().take(self.settings.max_results) {
            let score = catalog_relevance(&item, query);
            let content = if score > self.settings.preview_threshold {
                self.fetch_preview(&item.path).await
            } else {
                None
            };
            converted.push(SearchResult {
                source: ResultSource::Catalog,
                title: item.title,
                content,
                url: Some(item.raw_url),
                relevance_score: score,
                kind: Some(item.kind.as_str().to_string()),
            });
        }

        let count = converted.len();
        if count > 0 {
            let mut kinds: Vec<String> = Vec::new();
            for kind in converted.iter().filter_map(|r| r.kind.as_ref()) {
                if !kinds.contains(kind) {
                    kinds.push(kind.clone());
                }
            }
            self.telemetry
                .track_resources_found(query, count, elapsed, kinds);
        } else {
            self.telemetry.track_resources_not_found(
                query,
                elapsed,
                Some("no matching catalog resources".to_string()),
            );
        }

        search_path.push(SearchPathEntry {
            action: step.kind,
            source: ResultSource::Catalog,
            query: step.query.clone(),
            result_count: count,
            duration_ms: elapsed.as_millis() as u64,
            success: true,
            skipped: false,
            note: None,
        });
        results.extend(converted);

        if count > 0 {
            CatalogOutcome::Found(count)
        } else {
            CatalogOutcome::Empty
        }
    }

    async fn run_web_step(
        &self,
        query: &str,
        step: &SearchStep,
        results: &mut Vec<SearchResult>,
        search_path: &mut Vec<SearchPathEntry>,
    ) {
        let start = Instant::now();
        let outcome = self.web.search(&step.query, self.settings.max_results).await;
        let elapsed = start.elapsed();

        match outcome {
            Ok(hits) => {
                let converted: Vec<SearchResult> = hits
                    .into_iter()
                    .take(self.settings.max_results)
                    .map(|hit| {
                        let score = web_relevance(&hit, query);
                        let content = if hit.summary.is_empty() {
                            None
                        } else {
                            Some(truncate_content(&hit.summary, self.settings.preview_chars))
                        };
                        SearchResult {
                            source: ResultSource::Web,
                            title: hit.title,
                            content,
                            url: Some(hit.url),
                            relevance_score: score,
                            kind: Some(WEB_RESULT_KIND.to_string()),
                        }
                    })
                    .collect();

                search_path.push(SearchPathEntry {
                    action: step.kind,
                    source: ResultSource::Web,
                    query: step.query.clone(),
                    result_count: converted.len(),
                    duration_ms: elapsed.as_millis() as u64,
                    success: true,
                    skipped: false,
                    note: None,
                });
                results.extend(converted);
            }
            Err(e) => {
                tracing::warn!("Web search failed for '{}': {}", step.query, e);
                search_path.push(failed_entry(step, elapsed.as_millis() as u64, e.to_string()));
            }
        }
    }

    /// Preview failures are swallowed; the result keeps its metadata
    async fn fetch_preview(&self, path: &str) -> Option<String> {
        match self.catalog.preview(path).await {
            Ok(preview) => Some(truncate_content(&preview.content, self.settings.preview_chars)),
            Err(e) => {
                tracing::warn!("Preview fetch failed for {}: {}", path, e);
                None
            }
        }
    }
}

impl std::fmt::Debug for SearchOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchOrchestrator")
            .field("preferences", &self.preferences())
            .field("settings", &self.settings)
            .field("telemetry", &self.telemetry)
            .finish()
    }
}

fn source_for(kind: StepKind) -> ResultSource {
    match kind {
        StepKind::CatalogSearch => ResultSource::Catalog,
        StepKind::WebSearch => ResultSource::Web,
    }
}

fn failed_entry(step: &SearchStep, duration_ms: u64, error: String) -> SearchPathEntry {
    SearchPathEntry {
        action: step.kind,
        source: source_for(step.kind),
        query: step.query.clone(),
        result_count: 0,
        duration_ms,
        success: false,
        skipped: false,
        note: Some(error),
    }
}

fn fallback_reason(outcome: CatalogOutcome) -> String {
    match outcome {
        CatalogOutcome::Failed => "catalog search failed".to_string(),
        CatalogOutcome::Found(n) => format!("only {} curated results found", n),
        CatalogOutcome::Empty | CatalogOutcome::NotRun => "no curated results found".to_string(),
    }
}

/// Catalog results first when `catalog_first`, then by descending score.
/// `sort_by` is stable, so equal scores keep execution order.
fn rank_results(results: &mut [SearchResult], catalog_first: bool) {
    results.sort_by(|a, b| {
        let by_source = if catalog_first {
            source_rank(a.source).cmp(&source_rank(b.source))
        } else {
            Ordering::Equal
        };
        by_source.then_with(|| {
            b.relevance_score
                .partial_cmp(&a.relevance_score)
                .unwrap_or(Ordering::Equal)
        })
    });
}

fn source_rank(source: ResultSource) -> u8 {
    match source {
        ResultSource::Catalog => 0,
        ResultSource::Web => 1,
    }
}

/// Truncate to `max_chars` characters, appending "..." when cut
fn truncate_content(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((boundary, _)) => format!("{}...", &text[..boundary]),
        None => text.to_string(),
    }
}
