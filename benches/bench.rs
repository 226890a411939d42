// Criterion benchmarks for the Atelier search core

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use atelier_search::core::{
    distance::haversine_distance, filters::matches_class, CatalogSnapshot, SearchEngine,
};
use atelier_search::models::{
    ClassCategory, ClassSession, Coordinate, DifficultyLevel, SearchFilters, SearchParameters,
    SortStrategy,
};
use chrono::{DateTime, TimeZone, Utc};

fn bench_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 12, 10, 0, 0).unwrap()
}

fn create_class(id: usize, lat: f64, lon: f64) -> ClassSession {
    let start = bench_now() + chrono::Duration::hours((id % 240) as i64);
    ClassSession {
        id: id.to_string(),
        title: format!("Class {}", id),
        description: String::new(),
        category: if id % 2 == 0 { ClassCategory::Arts } else { ClassCategory::Cooking },
        difficulty: DifficultyLevel::AllLevels,
        price: (id % 12) as f64 * 10.0,
        start_date: start,
        end_date: start + chrono::Duration::minutes(90),
        duration_minutes: 60 + (id % 4) as u32 * 30,
        max_participants: 8 + (id % 16) as u32,
        enrolled_count: (id % 8) as u32,
        average_rating: 3.5 + (id % 3) as f64 * 0.5,
        total_reviews: (id % 40) as u32,
        instructor_id: format!("i{}", id % 10),
        instructor_name: format!("Instructor {}", id % 10),
        venue_id: format!("v{}", id % 20),
        venue_name: format!("Venue {}", id % 20),
        neighborhood: None,
        latitude: lat,
        longitude: lon,
        is_online: id % 7 == 0,
        tags: vec![],
    }
}

fn create_snapshot(class_count: usize) -> CatalogSnapshot {
    let classes = (0..class_count)
        .map(|i| {
            let lat_offset = (i as f64 * 0.001) % 0.5;
            let lon_offset = (i as f64 * 0.001) % 0.5;
            create_class(i, 49.2827 + lat_offset, -123.1207 + lon_offset)
        })
        .collect();

    CatalogSnapshot {
        classes,
        instructors: vec![],
        venues: vec![],
    }
}

fn create_filters() -> SearchFilters {
    SearchFilters::default()
        .in_category(ClassCategory::Arts)
        .at_least_rated(4.0)
        .nearby()
        .upcoming_only()
}

fn bench_haversine_distance(c: &mut Criterion) {
    c.bench_function("haversine_distance", |b| {
        b.iter(|| {
            haversine_distance(
                black_box(49.2827),
                black_box(-123.1207),
                black_box(49.2636),
                black_box(-123.1002),
            )
        });
    });
}

fn bench_facet_evaluation(c: &mut Criterion) {
    let filters = create_filters();
    let class = create_class(4, 49.29, -123.12);
    let origin = Coordinate::new(49.2827, -123.1207);
    let now = bench_now();

    c.bench_function("matches_class_full_facets", |b| {
        b.iter(|| {
            matches_class(
                black_box(&filters),
                black_box(&class),
                black_box(Some(origin)),
                black_box(now),
            )
        });
    });
}

fn bench_search(c: &mut Criterion) {
    let engine = SearchEngine::new();
    let now = bench_now();

    let mut group = c.benchmark_group("search");

    for class_count in [10, 50, 100, 500, 1000].iter() {
        let snapshot = create_snapshot(*class_count);
        let params = SearchParameters {
            query: "class".to_string(),
            location: Some(Coordinate::new(49.2827, -123.1207)),
            limit: 20,
            filters: Some(create_filters()),
            sort_by: SortStrategy::Distance,
            ..Default::default()
        };

        group.bench_with_input(
            BenchmarkId::new("filter_rank_paginate", class_count),
            class_count,
            |b, _| {
                b.iter(|| engine.search_at(black_box(&params), black_box(&snapshot), black_box(now)));
            },
        );
    }

    group.finish();
}

fn bench_ranking_only(c: &mut Criterion) {
    let engine = SearchEngine::new();
    let snapshot = create_snapshot(500);
    let now = bench_now();

    let params = SearchParameters {
        sort_by: SortStrategy::PriceAsc,
        limit: 100,
        ..Default::default()
    };

    c.bench_function("search_500_classes_price_sort", |b| {
        b.iter(|| engine.search_at(black_box(&params), black_box(&snapshot), black_box(now)));
    });
}

criterion_group!(
    benches,
    bench_haversine_distance,
    bench_facet_evaluation,
    bench_search,
    bench_ranking_only
);

criterion_main!(benches);
