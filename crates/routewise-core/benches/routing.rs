//! Routing performance benchmarks
//!
//! Measures performance of:
//! - Intent classification and strategy planning
//! - Relevance scoring
//! - Telemetry statistics over a full log

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use routewise_core::search::{catalog_relevance, web_relevance};
use routewise_core::{
    CatalogItem, IntentClassifier, IntentType, ResourceKind, RouterPreferences,
    TelemetryAggregator, WebHit,
};
use std::time::Duration;

const QUERIES: &[(&str, &str)] = &[
    ("best_practices", "Spring Boot best practices for microservices"),
    ("debugging", "why is my app crashing"),
    ("how_to_build", "how do I build a REST API with fastapi step by step"),
    ("general", "weather tomorrow"),
];

fn bench_analyze_intent(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze_intent");
    let classifier = IntentClassifier::default();
    let prefs = RouterPreferences::default();

    for (name, query) in QUERIES {
        group.bench_with_input(BenchmarkId::from_parameter(name), query, |b, query| {
            b.iter(|| classifier.analyze_intent(black_box(query), black_box(&prefs)));
        });
    }

    group.finish();
}

fn bench_create_strategy(c: &mut Criterion) {
    let classifier = IntentClassifier::default();
    let prefs = RouterPreferences::default();

    c.bench_function("create_search_strategy", |b| {
        b.iter(|| {
            classifier.create_search_strategy(
                black_box("Spring Boot best practices for microservices"),
                black_box(&prefs),
            )
        })
    });
}

fn bench_relevance(c: &mut Criterion) {
    let item = CatalogItem::new(
        "Spring Boot Best Practices",
        "instructions/spring-boot.instructions.md",
        "https://raw.example.com/spring-boot.md",
        ResourceKind::Instruction,
    );
    let hit = WebHit::new(
        "Microservices with Spring Boot",
        "https://blog.example.com/spring",
        "A guide to structuring Spring Boot microservices",
    );
    let query = "Spring Boot best practices for microservices";

    c.bench_function("catalog_relevance", |b| {
        b.iter(|| catalog_relevance(black_box(&item), black_box(query)))
    });
    c.bench_function("web_relevance", |b| {
        b.iter(|| web_relevance(black_box(&hit), black_box(query)))
    });
}

fn bench_telemetry_stats(c: &mut Criterion) {
    let mut group = c.benchmark_group("telemetry_stats");

    for size in [100, 500, 1000] {
        let telemetry = TelemetryAggregator::new();
        for i in 0..size {
            let query = format!("react query {}", i % 25);
            telemetry.track_consulted(&query, IntentType::BestPractices, 0.7);
            if i % 3 == 0 {
                telemetry.track_resources_found(&query, 2, Duration::from_millis(40), vec![]);
            } else {
                telemetry.track_fallback(&query, "no curated results found");
            }
        }

        group.bench_with_input(BenchmarkId::from_parameter(size), &telemetry, |b, t| {
            b.iter(|| t.get_stats());
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_analyze_intent,
    bench_create_strategy,
    bench_relevance,
    bench_telemetry_stats
);
criterion_main!(benches);
