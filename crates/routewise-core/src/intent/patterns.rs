//! Static pattern tables for intent classification

use crate::error::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Intent categories, in evaluation order.
///
/// When two categories reach the same confidence, the one declared first
/// wins; `PatternLibrary` keeps its families sorted in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentType {
    BestPractices,
    HowToBuild,
    ArchitectureGuidance,
    CodePatterns,
    FrameworkSetup,
    DebuggingHelp,
    /// Catch-all when nothing matched
    GeneralQuestion,
}

impl IntentType {
    pub const ALL: [IntentType; 7] = [
        IntentType::BestPractices,
        IntentType::HowToBuild,
        IntentType::ArchitectureGuidance,
        IntentType::CodePatterns,
        IntentType::FrameworkSetup,
        IntentType::DebuggingHelp,
        IntentType::GeneralQuestion,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IntentType::BestPractices => "best_practices",
            IntentType::HowToBuild => "how_to_build",
            IntentType::ArchitectureGuidance => "architecture_guidance",
            IntentType::CodePatterns => "code_patterns",
            IntentType::FrameworkSetup => "framework_setup",
            IntentType::DebuggingHelp => "debugging_help",
            IntentType::GeneralQuestion => "general_question",
        }
    }
}

impl fmt::Display for IntentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Patterns for one intent category
#[derive(Debug, Clone)]
struct PatternFamily {
    intent: IntentType,
    patterns: Vec<Regex>,
}

/// Immutable table of intent pattern families and technology keywords
#[derive(Debug, Clone)]
pub struct PatternLibrary {
    families: Vec<PatternFamily>,
    technologies: Vec<String>,
}

impl PatternLibrary {
    /// Compile a library from raw pattern sources.
    ///
    /// Families are reordered to `IntentType` declaration order so the
    /// first-declared category wins ties regardless of input order.
    pub fn new<S: AsRef<str>>(
        categories: Vec<(IntentType, Vec<S>)>,
        technologies: Vec<String>,
    ) -> Result<Self> {
        let mut families = Vec::with_capacity(categories.len());
        for (intent, sources) in categories {
            let patterns = sources
                .iter()
                .map(|s| Regex::new(s.as_ref()))
                .collect::<std::result::Result<Vec<_>, _>>()?;
            families.push(PatternFamily { intent, patterns });
        }
        families.sort_by_key(|f| f.intent);

        let technologies = technologies
            .into_iter()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();

        Ok(Self {
            families,
            technologies,
        })
    }

    /// Number of patterns in `intent`'s family that match `normalized`
    pub fn count_matches(&self, intent: IntentType, normalized: &str) -> usize {
        self.families
            .iter()
            .filter(|f| f.intent == intent)
            .flat_map(|f| f.patterns.iter())
            .filter(|re| re.is_match(normalized))
            .count()
    }

    /// Per-category match counts, in evaluation order
    pub fn match_counts(&self, normalized: &str) -> Vec<(IntentType, usize)> {
        self.families
            .iter()
            .map(|f| {
                let matches = f.patterns.iter().filter(|re| re.is_match(normalized)).count();
                (f.intent, matches)
            })
            .collect()
    }

    /// Technology keywords present (as substrings) in `normalized`
    pub fn matched_technologies(&self, normalized: &str) -> Vec<&str> {
        self.technologies
            .iter()
            .filter(|t| normalized.contains(t.as_str()))
            .map(|t| t.as_str())
            .collect()
    }

    pub fn technologies(&self) -> &[String] {
        &self.technologies
    }
}

impl Default for PatternLibrary {
    fn default() -> Self {
        Self::new(default_categories(), default_technologies())
            .expect("built-in intent patterns are valid")
    }
}

fn default_categories() -> Vec<(IntentType, Vec<&'static str>)> {
    vec![
        (
            IntentType::BestPractices,
            vec![
                r"\bbest\s+practices?\b",
                r"\b(recommended|preferred|proper|right)\s+(way|approach|method)s?\b",
                r"\b(conventions?|guidelines?|standards?)\b",
                r"\b(idiomatic|clean\s+code)\b",
                r"\bhow\s+should\s+i\b",
            ],
        ),
        (
            IntentType::HowToBuild,
            vec![
                r"\bhow\s+(do|can|to)\s+(i\s+)?(build|create|make|implement|write)\b",
                r"\b(build|create|implement|develop)\s+(an?|my|the)\s+\w+",
                r"\b(step[\s-]by[\s-]step|tutorial|walkthrough)\b",
                r"\bgetting\s+started\b",
            ],
        ),
        (
            IntentType::ArchitectureGuidance,
            vec![
                r"\barchitect(ure|ural|ing)?\b",
                r"\b(microservices?|monolith|event[\s-]driven|serverless)\b",
                r"\b(scalab(le|ility)|system\s+design)\b",
                r"\b(structure|organi[sz]e)\s+(my|the|a|an)\s+(project|app|application|codebase|solution)\b",
            ],
        ),
        (
            IntentType::CodePatterns,
            vec![
                r"\b(design\s+)?patterns?\b",
                r"\banti[\s-]?patterns?\b",
                r"\b(examples?\s+of|code\s+samples?|snippets?)\b",
                r"\brefactor(ing)?\b",
            ],
        ),
        (
            IntentType::FrameworkSetup,
            vec![
                r"\b(set\s*up|setup|setting\s+up)\b",
                r"\b(configure|configuration|configuring)\b",
                r"\b(install|installation|installing)\b",
                r"\b(boilerplate|scaffold(ing)?|starter\s+template)\b",
            ],
        ),
        (
            IntentType::DebuggingHelp,
            vec![
                r"\b(debug|debugging|troubleshoot(ing)?|diagnos(e|is|ing))\b",
                r"\b(errors?|exceptions?|crash(es|ed|ing)?|bugs?|fail(s|ed|ing|ure)?)\b|not\s+working",
                r"\b(fix|resolve|solve)\b.*\b(issues?|problems?|errors?|bugs?)\b",
            ],
        ),
    ]
}

/// Built-in technology vocabulary (languages, frameworks, platforms)
pub fn default_technologies() -> Vec<String> {
    [
        // Languages
        "javascript", "typescript", "python", "java", "csharp", "c#", "rust", "golang",
        "kotlin", "swift", "php", "ruby", "scala",
        // Frameworks
        "react", "angular", "vue", "svelte", "next.js", "nextjs", "node.js", "nodejs",
        "express", "django", "flask", "fastapi", "spring", "spring boot", "blazor",
        "asp.net", ".net", "dotnet", "tailwind", "playwright", "jest", "pytest",
        // Platforms and tooling
        "azure", "aws", "gcp", "docker", "kubernetes", "terraform", "bicep", "graphql",
        "postgres", "mongodb", "redis", "github actions", "copilot", "power platform",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
