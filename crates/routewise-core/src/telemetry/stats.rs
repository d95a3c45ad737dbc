//! Aggregate statistics and improvement suggestions

use super::{EventType, TelemetryEvent};
use serde::Serialize;
use std::collections::HashMap;

const TOP_QUERIES: usize = 10;
const TOP_GAPS: usize = 5;
const SLOW_SEARCH_MS: f64 = 1000.0;

/// Per-query attempt statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryStat {
    pub query: String,
    pub count: usize,
    pub success_rate: f64,
}

/// A query repeatedly attempted against the catalog without success
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceGap {
    pub query: String,
    pub attempts: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TelemetryStats {
    pub total_events: usize,
    pub total_consultations: usize,
    pub successful_consultations: usize,
    pub unsuccessful_consultations: usize,
    pub fallback_count: usize,
    pub average_duration_ms: f64,
    pub top_queries: Vec<QueryStat>,
    pub resource_gaps: Vec<ResourceGap>,
    pub improvement_suggestions: Vec<String>,
}

impl TelemetryStats {
    /// Found / consulted, or `None` before any consultation
    pub fn success_ratio(&self) -> Option<f64> {
        if self.total_consultations == 0 {
            None
        } else {
            Some(self.successful_consultations as f64 / self.total_consultations as f64)
        }
    }
}

#[derive(Default)]
struct QueryAccumulator {
    query: String,
    count: usize,
    successes: usize,
}

/// Derive statistics from an event log in one pass
pub(crate) fn compute_stats<'a>(
    events: impl Iterator<Item = &'a TelemetryEvent>,
    technologies: &[String],
) -> TelemetryStats {
    let mut stats = TelemetryStats::default();
    let mut total_duration = 0u64;
    let mut timed_events = 0usize;

    // Insertion-ordered so equal counts keep first-seen order
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut queries: Vec<QueryAccumulator> = Vec::new();
    let mut bump = |query: &'a str, success: bool| {
        let idx = *index.entry(query).or_insert_with(|| {
            queries.push(QueryAccumulator {
                query: query.to_string(),
                ..Default::default()
            });
            queries.len() - 1
        });
        if success {
            queries[idx].successes += 1;
        } else {
            queries[idx].count += 1;
        }
    };

    for event in events {
        stats.total_events += 1;
        if event.duration_ms > 0 {
            total_duration += event.duration_ms;
            timed_events += 1;
        }

        match event.event_type {
            EventType::McpConsulted => {
                stats.total_consultations += 1;
                bump(&event.query, false);
            }
            EventType::McpResourcesFound => {
                stats.successful_consultations += 1;
                bump(&event.query, true);
            }
            EventType::McpResourcesNotFound => stats.unsuccessful_consultations += 1,
            EventType::FallbackToWeb => stats.fallback_count += 1,
            EventType::SearchCompleted => {}
        }
    }

    if timed_events > 0 {
        stats.average_duration_ms = total_duration as f64 / timed_events as f64;
    }

    let mut ranked: Vec<&QueryAccumulator> = queries.iter().filter(|q| q.count > 0).collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count));

    stats.top_queries = ranked
        .iter()
        .take(TOP_QUERIES)
        .map(|q| QueryStat {
            query: q.query.clone(),
            count: q.count,
            success_rate: (q.successes as f64 / q.count as f64).min(1.0),
        })
        .collect();

    stats.resource_gaps = ranked
        .iter()
        .filter(|q| q.count >= 2 && q.successes == 0)
        .take(TOP_GAPS)
        .map(|q| ResourceGap {
            query: q.query.clone(),
            attempts: q.count,
        })
        .collect();

    stats.improvement_suggestions = suggestions(&stats, technologies);
    stats
}

/// Each matching rule contributes one suggestion
fn suggestions(stats: &TelemetryStats, technologies: &[String]) -> Vec<String> {
    let mut suggestions = Vec::new();

    if stats.fallback_count > stats.successful_consultations {
        suggestions.push(format!(
            "Web fallbacks ({}) outnumber curated hits ({}) - consider expanding curated content",
            stats.fallback_count, stats.successful_consultations
        ));
    }

    if let Some(gap) = stats.resource_gaps.first() {
        suggestions.push(format!(
            "Resource gap: \"{}\" attempted {} times without curated results - consider adding content for it",
            gap.query, gap.attempts
        ));
    }

    if stats.average_duration_ms > SLOW_SEARCH_MS {
        suggestions.push(format!(
            "Average duration {:.0}ms exceeds 1s - review backend performance",
            stats.average_duration_ms
        ));
    }

    let weak_tech_query = stats.top_queries.iter().find(|q| {
        let lower = q.query.to_lowercase();
        q.success_rate < 0.5 && technologies.iter().any(|t| lower.contains(t.as_str()))
    });
    if let Some(q) = weak_tech_query {
        suggestions.push(format!(
            "Technology query \"{}\" succeeds only {:.0}% of the time - add curated resources for it",
            q.query,
            q.success_rate * 100.0
        ));
    }

    match stats.success_ratio() {
        Some(ratio) if ratio < 0.3 => suggestions.push(format!(
            "Low curated hit rate ({:.0}%) - broaden catalog coverage",
            ratio * 100.0
        )),
        Some(ratio) if ratio > 0.8 => suggestions.push(format!(
            "High curated relevance ({:.0}%) - catalog coverage is strong",
            ratio * 100.0
        )),
        _ => {}
    }

    suggestions
}
