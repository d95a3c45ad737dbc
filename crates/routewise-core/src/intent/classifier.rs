//! Rule-based intent classifier and search planner

use super::{
    IntentType, PatternLibrary, QueryIntent, SearchStep, SearchStrategy, StepKind, StepPriority,
};
use crate::config::RouterPreferences;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use std::sync::Arc;

lazy_static! {
    static ref QUALIFIED_RE: Regex = Regex::new(
        r"\b(best|good|recommended|proper|modern|common|clean|secure|efficient|effective)\s+(\w+)"
    )
    .unwrap();
    static ref PRACTICE_RE: Regex =
        Regex::new(r"\b(\w+)\s+(practices?|approach(es)?|patterns?)\b").unwrap();
    static ref ACTION_RE: Regex = Regex::new(
        r"\b(build|create|implement|setup|configure|design|structure|deploy|test|debug|optimize|secure)((?:\s+\w+){1,3})"
    )
    .unwrap();
    static ref PUNCTUATION_RE: Regex = Regex::new(r"[^\w\s#.+-]").unwrap();
}

/// Words never used as fallback search terms
const STOP_WORDS: &[&str] = &[
    "what", "when", "where", "which", "with", "that", "this", "there", "these", "those",
    "from", "have", "does", "should", "would", "could", "about", "into", "your", "mine",
    "some", "they", "them", "then", "than", "will", "just", "like", "want", "need",
];

const BASE_CONFIDENCE: f64 = 0.3;
const PER_MATCH: f64 = 0.2;
const CATEGORY_CAP: f64 = 0.9;
const TECH_BOOST: f64 = 0.1;
const CONFIDENCE_CAP: f64 = 0.95;
const MAX_TERMS: usize = 5;

/// Scores queries against a pattern library and plans searches.
///
/// Pure over its library: identical inputs always produce identical output.
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    library: Arc<PatternLibrary>,
}

impl IntentClassifier {
    pub fn new(library: Arc<PatternLibrary>) -> Self {
        Self { library }
    }

    pub fn library(&self) -> &PatternLibrary {
        &self.library
    }

    /// Classify `query` and decide whether the curated catalog should lead
    pub fn analyze_intent(&self, query: &str, preferences: &RouterPreferences) -> QueryIntent {
        let normalized = query.trim().to_lowercase();

        // Strictly-greater comparison keeps the first category on ties
        let mut intent_type = IntentType::GeneralQuestion;
        let mut confidence = 0.0_f64;
        for (intent, matches) in self.library.match_counts(&normalized) {
            if matches == 0 {
                continue;
            }
            let candidate = (BASE_CONFIDENCE + PER_MATCH * matches as f64).min(CATEGORY_CAP);
            if candidate > confidence {
                intent_type = intent;
                confidence = candidate;
            }
        }

        let technologies = self.library.matched_technologies(&normalized);
        if !technologies.is_empty() && confidence > BASE_CONFIDENCE {
            confidence =
                (confidence + TECH_BOOST * technologies.len() as f64).min(CONFIDENCE_CAP);
        }

        let (should_use_mcp, reasoning) =
            route(intent_type, confidence, &technologies, preferences);

        let suggested_search_terms = generate_search_terms(&normalized, &technologies);

        tracing::debug!(
            "Intent for '{}': {} ({:.2}), use_mcp={}",
            query,
            intent_type,
            confidence,
            should_use_mcp
        );

        QueryIntent {
            intent_type,
            confidence,
            should_use_mcp,
            suggested_search_terms,
            reasoning,
        }
    }

    /// Build the ordered step plan for `query`
    pub fn create_search_strategy(
        &self,
        query: &str,
        preferences: &RouterPreferences,
    ) -> SearchStrategy {
        let intent = self.analyze_intent(query, preferences);
        let mut steps = Vec::new();

        let catalog_query = if intent.suggested_search_terms.is_empty() {
            query.trim().to_string()
        } else {
            intent.suggested_search_terms.join(" ")
        };

        let explanation = if intent.should_use_mcp {
            steps.push(SearchStep {
                kind: StepKind::CatalogSearch,
                query: catalog_query,
                priority: StepPriority::High,
                reasoning: "Curated catalog likely holds vetted guidance".to_string(),
            });
            if preferences.fallback_to_web {
                steps.push(SearchStep {
                    kind: StepKind::WebSearch,
                    query: query.trim().to_string(),
                    priority: StepPriority::Fallback,
                    reasoning: "Web search if curated results are insufficient".to_string(),
                });
            }
            format!(
                "Primary source: curated catalog (intent: {})",
                intent.intent_type
            )
        } else {
            steps.push(SearchStep {
                kind: StepKind::WebSearch,
                query: query.trim().to_string(),
                priority: StepPriority::High,
                reasoning: "General query better served by web search".to_string(),
            });
            if intent.confidence > BASE_CONFIDENCE {
                steps.push(SearchStep {
                    kind: StepKind::CatalogSearch,
                    query: catalog_query,
                    priority: StepPriority::Supplementary,
                    reasoning: "Catalog may still hold related resources".to_string(),
                });
            }
            format!("Primary source: web search (intent: {})", intent.intent_type)
        };

        SearchStrategy {
            intent,
            steps,
            explanation,
        }
    }
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new(Arc::new(PatternLibrary::default()))
    }
}

/// Routing rules, first match wins
fn route(
    intent_type: IntentType,
    confidence: f64,
    technologies: &[&str],
    preferences: &RouterPreferences,
) -> (bool, String) {
    if preferences.mcp_first && confidence >= preferences.min_confidence_threshold {
        return (
            true,
            format!(
                "{} query with {:.0}% confidence - curated content likely available",
                intent_type,
                confidence * 100.0
            ),
        );
    }

    if preferences.mcp_only_for_best_practices && intent_type == IntentType::BestPractices {
        return (
            true,
            "Best practices query - consulting curated catalog".to_string(),
        );
    }

    if !technologies.is_empty() && confidence > 0.4 {
        return (
            true,
            format!(
                "Technology-specific query ({}) - curated resources likely available",
                technologies.join(", ")
            ),
        );
    }

    (
        false,
        format!(
            "Confidence too low ({:.0}%) for curated catalog - using web search",
            confidence * 100.0
        ),
    )
}

/// Extract up to five search terms from a normalized query
fn generate_search_terms(normalized: &str, technologies: &[&str]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut terms = Vec::new();

    for tech in technologies {
        push_unique(&mut terms, &mut seen, tech.to_string());
    }

    for re in [&*QUALIFIED_RE, &*PRACTICE_RE, &*ACTION_RE] {
        for m in re.find_iter(normalized) {
            push_unique(&mut terms, &mut seen, clean_phrase(m.as_str()));
        }
    }

    if terms.is_empty() {
        let fallback = normalized
            .split_whitespace()
            .map(|w| PUNCTUATION_RE.replace_all(w, "").trim_matches('.').to_string())
            .filter(|w| w.chars().count() > 3 && !STOP_WORDS.contains(&w.as_str()))
            .take(3);
        for word in fallback {
            push_unique(&mut terms, &mut seen, word);
        }
    }

    terms.truncate(MAX_TERMS);
    terms
}

fn push_unique(terms: &mut Vec<String>, seen: &mut HashSet<String>, term: String) {
    if !term.is_empty() && seen.insert(term.clone()) {
        terms.push(term);
    }
}

fn clean_phrase(phrase: &str) -> String {
    let stripped = PUNCTUATION_RE.replace_all(phrase, "");
    stripped
        .split_whitespace()
        .map(|w| w.trim_matches('.'))
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> IntentClassifier {
        IntentClassifier::default()
    }

    #[test]
    fn test_spring_boot_best_practices() {
        let prefs = RouterPreferences::default();
        let strategy =
            classifier().create_search_strategy("Spring Boot best practices for microservices", &prefs);

        assert_eq!(strategy.intent.intent_type, IntentType::BestPractices);
        assert!(strategy.intent.should_use_mcp);
        // Tied with architecture at 0.5, then +0.1 for "spring" and "spring boot"
        assert!((strategy.intent.confidence - 0.7).abs() < 1e-9);

        assert_eq!(strategy.steps.len(), 2);
        assert_eq!(strategy.steps[0].kind, StepKind::CatalogSearch);
        assert_eq!(strategy.steps[0].priority, StepPriority::High);
        assert_eq!(strategy.steps[1].kind, StepKind::WebSearch);
        assert_eq!(strategy.steps[1].priority, StepPriority::Fallback);
        assert!(strategy.explanation.contains("curated catalog"));
        assert!(strategy.explanation.contains("best_practices"));
    }

    #[test]
    fn test_debugging_below_threshold_goes_to_web() {
        let prefs = RouterPreferences {
            min_confidence_threshold: 0.6,
            ..Default::default()
        };
        let strategy = classifier().create_search_strategy("why is my app crashing", &prefs);

        assert_eq!(strategy.intent.intent_type, IntentType::DebuggingHelp);
        assert!((strategy.intent.confidence - 0.5).abs() < 1e-9);
        assert!(!strategy.intent.should_use_mcp);
        assert!(strategy.intent.reasoning.contains("too low"));
        assert_eq!(strategy.steps[0].kind, StepKind::WebSearch);
        assert_eq!(strategy.steps[0].priority, StepPriority::High);
        // 0.5 > 0.3, so the catalog is still consulted as a supplement
        assert_eq!(strategy.steps[1].kind, StepKind::CatalogSearch);
        assert_eq!(strategy.steps[1].priority, StepPriority::Supplementary);
    }

    #[test]
    fn test_unmatched_query_is_general_question() {
        let prefs = RouterPreferences::default();
        let intent = classifier().analyze_intent("weather tomorrow in lisbon", &prefs);

        assert_eq!(intent.intent_type, IntentType::GeneralQuestion);
        assert_eq!(intent.confidence, 0.0);
        assert!(!intent.should_use_mcp);

        let strategy = classifier().create_search_strategy("weather tomorrow in lisbon", &prefs);
        assert_eq!(strategy.steps.len(), 1);
        assert_eq!(strategy.steps[0].kind, StepKind::WebSearch);
    }

    #[test]
    fn test_technology_without_category_gets_no_boost() {
        let prefs = RouterPreferences::default();
        let intent = classifier().analyze_intent("kubernetes", &prefs);
        assert_eq!(intent.confidence, 0.0);
        assert_eq!(intent.suggested_search_terms, vec!["kubernetes".to_string()]);
    }

    #[test]
    fn test_confidence_capped() {
        let prefs = RouterPreferences::default();
        let intent = classifier().analyze_intent(
            "best practices conventions idiomatic recommended approach: how should i use react typescript docker azure",
            &prefs,
        );
        assert_eq!(intent.intent_type, IntentType::BestPractices);
        assert!((intent.confidence - 0.95).abs() < 1e-9);
    }

    #[test]
    fn test_best_practices_only_rule() {
        let prefs = RouterPreferences {
            mcp_first: false,
            mcp_only_for_best_practices: true,
            ..Default::default()
        };
        let intent = classifier().analyze_intent("coding conventions", &prefs);
        assert_eq!(intent.intent_type, IntentType::BestPractices);
        assert!(intent.should_use_mcp);
        assert!(intent.reasoning.starts_with("Best practices"));
    }

    #[test]
    fn test_technology_rule_names_technologies() {
        let prefs = RouterPreferences {
            mcp_first: false,
            ..Default::default()
        };
        let intent = classifier().analyze_intent("debugging python errors", &prefs);
        // two debugging patterns (0.7) + python (0.1)
        assert!((intent.confidence - 0.8).abs() < 1e-9);
        assert!(intent.should_use_mcp);
        assert!(intent.reasoning.contains("python"));
    }

    #[test]
    fn test_no_fallback_step_when_disabled() {
        let prefs = RouterPreferences {
            fallback_to_web: false,
            ..Default::default()
        };
        let strategy = classifier().create_search_strategy("react best practices", &prefs);
        assert_eq!(strategy.steps.len(), 1);
        assert_eq!(strategy.steps[0].kind, StepKind::CatalogSearch);
    }

    #[test]
    fn test_catalog_step_uses_suggested_terms() {
        let prefs = RouterPreferences::default();
        let strategy = classifier().create_search_strategy("React best practices", &prefs);
        assert_eq!(strategy.steps[0].query, "react best practices");
        assert_eq!(strategy.steps[1].query, "React best practices");
    }

    #[test]
    fn test_search_terms_shapes() {
        let terms = generate_search_terms("how do i implement secure authentication flow, quickly?", &[]);
        assert!(terms.contains(&"implement secure authentication flow".to_string()));
        assert!(terms.contains(&"secure authentication".to_string()));
    }

    #[test]
    fn test_search_terms_fallback_words() {
        let terms = generate_search_terms("what about these weird compiler messages today", &[]);
        assert_eq!(
            terms,
            vec!["weird".to_string(), "compiler".to_string(), "messages".to_string()]
        );
    }

    #[test]
    fn test_search_terms_capped_and_deduplicated() {
        let techs = ["react", "redux", "jest", "docker"];
        let terms = generate_search_terms(
            "best testing practices and modern tooling, build a react app",
            &techs,
        );
        assert_eq!(terms.len(), 5);
        assert_eq!(&terms[..4], &["react", "redux", "jest", "docker"]);
        let unique: HashSet<&String> = terms.iter().collect();
        assert_eq!(unique.len(), terms.len());
    }

    #[test]
    fn test_custom_library() {
        let library = PatternLibrary::new(
            vec![(IntentType::FrameworkSetup, vec![r"\bbootstrap\b"])],
            vec!["deno".to_string()],
        )
        .unwrap();
        let classifier = IntentClassifier::new(Arc::new(library));
        let intent = classifier.analyze_intent("bootstrap a deno service", &RouterPreferences::default());

        assert_eq!(intent.intent_type, IntentType::FrameworkSetup);
        assert!((intent.confidence - 0.6).abs() < 1e-9);
    }
}
