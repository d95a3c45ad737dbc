//! Rule-based recommendations for a finished search

use super::{ResultSource, SearchResult};
use crate::backend::ResourceKind;
use crate::intent::IntentType;
use std::collections::HashMap;

/// Evaluate every recommendation rule against the merged results
pub fn generate_recommendations(results: &[SearchResult], intent: IntentType) -> Vec<String> {
    let mut by_kind: HashMap<&str, usize> = HashMap::new();
    let mut catalog_count = 0;
    let mut web_count = 0;

    for result in results {
        match result.source {
            ResultSource::Catalog => {
                catalog_count += 1;
                if let Some(kind) = result.kind.as_deref() {
                    *by_kind.entry(kind).or_default() += 1;
                }
            }
            ResultSource::Web => web_count += 1,
        }
    }

    let mut recommendations = Vec::new();

    if let Some(&n) = by_kind.get(ResourceKind::Instruction.as_str()) {
        recommendations.push(format!(
            "Found {} community-vetted instruction file(s) - apply them for consistent results",
            n
        ));
    }

    if let Some(&n) = by_kind.get(ResourceKind::Prompt.as_str()) {
        recommendations.push(format!(
            "Found {} specialized prompt(s) tailored to this task",
            n
        ));
    }

    if intent == IntentType::BestPractices && catalog_count == 0 {
        recommendations.push(
            "No curated best practices found for this topic - consider contributing a solution to the catalog"
                .to_string(),
        );
    }

    if catalog_count > 0 && web_count > 0 {
        recommendations.push(
            "Review both curated resources and web results for complete coverage".to_string(),
        );
    }

    recommendations
}
