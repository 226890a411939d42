// Unit tests for the Atelier search core

use atelier_search::core::{
    distance::{calculate_bounding_box, haversine_distance, is_within_bounding_box},
    filters::{matches_class, matches_instructor, matches_venue},
    ranking::rank,
    results::{text_matches, SearchResult},
};
use atelier_search::models::{
    ClassCategory, ClassSession, Coordinate, DifficultyLevel, Instructor, SearchFilters,
    SortStrategy, Venue,
};
use chrono::{DateTime, TimeZone, Utc};

fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 12, 10, 0, 0).unwrap()
}

fn create_class(id: &str, price: f64, rating: f64, lat: f64, lon: f64) -> ClassSession {
    let start = test_now() + chrono::Duration::days(3);
    ClassSession {
        id: id.to_string(),
        title: format!("Class {}", id),
        description: String::new(),
        category: ClassCategory::Arts,
        difficulty: DifficultyLevel::Beginner,
        price,
        start_date: start,
        end_date: start + chrono::Duration::minutes(90),
        duration_minutes: 90,
        max_participants: 12,
        enrolled_count: 4,
        average_rating: rating,
        total_reviews: 20,
        instructor_id: "i1".to_string(),
        instructor_name: "Sarah Chen".to_string(),
        venue_id: "v1".to_string(),
        venue_name: "Creative Studio".to_string(),
        neighborhood: Some("Mount Pleasant".to_string()),
        latitude: lat,
        longitude: lon,
        is_online: false,
        tags: vec![],
    }
}

fn create_instructor(id: &str, rating: f64) -> Instructor {
    Instructor {
        id: id.to_string(),
        name: format!("Instructor {}", id),
        bio: None,
        specialties: vec!["Arts & Crafts workshops".to_string()],
        rating,
        total_reviews: 30,
        years_of_experience: 5,
    }
}

fn create_venue(id: &str, rating: f64) -> Venue {
    Venue {
        id: id.to_string(),
        name: format!("Venue {}", id),
        address: "12 Main St".to_string(),
        city: "Vancouver".to_string(),
        neighborhood: Some("Gastown".to_string()),
        latitude: 49.2827,
        longitude: -123.1207,
        amenities: vec![],
        parking_info: Some("Underground lot".to_string()),
        accessibility_info: None,
        average_rating: rating,
        total_reviews: 12,
    }
}

#[test]
fn test_haversine_distance_zero() {
    let distance = haversine_distance(49.2827, -123.1207, 49.2827, -123.1207);
    assert!(distance < 0.01);
}

#[test]
fn test_haversine_distance_downtown_to_kitsilano() {
    // Downtown Vancouver to Kitsilano is roughly 3-5 km
    let distance = haversine_distance(49.2827, -123.1207, 49.2683, -123.1553);
    assert!(distance > 1.0 && distance < 6.0, "Expected a few km, got {}", distance);
}

#[test]
fn test_bounding_box_contains_center() {
    let bbox = calculate_bounding_box(49.2827, -123.1207, 10.0);

    assert!(is_within_bounding_box(49.2827, -123.1207, &bbox));
    assert!(!is_within_bounding_box(50.5, -120.0, &bbox));
}

#[test]
fn test_empty_filters_pass_every_variant() {
    let filters = SearchFilters::default();

    assert!(matches_class(&filters, &create_class("c", 40.0, 4.2, 49.28, -123.12), None, test_now()));
    assert!(matches_instructor(&filters, &create_instructor("i", 4.0)));
    assert!(matches_venue(&filters, &create_venue("v", 4.0), None));
}

#[test]
fn test_min_rating_applies_to_every_variant() {
    let filters = SearchFilters::default().at_least_rated(4.5);

    assert!(!matches_class(&filters, &create_class("c", 40.0, 4.2, 49.28, -123.12), None, test_now()));
    assert!(matches_class(&filters, &create_class("c", 40.0, 4.8, 49.28, -123.12), None, test_now()));

    assert!(!matches_instructor(&filters, &create_instructor("i", 4.2)));
    assert!(matches_instructor(&filters, &create_instructor("i", 4.8)));

    assert!(!matches_venue(&filters, &create_venue("v", 4.2), None));
    assert!(matches_venue(&filters, &create_venue("v", 4.8), None));
}

#[test]
fn test_instructor_category_facet_reads_specialties() {
    let instructor = create_instructor("i", 4.0);

    let arts = SearchFilters::default().in_category(ClassCategory::Arts);
    assert!(matches_instructor(&arts, &instructor));

    let cooking = SearchFilters::default().in_category(ClassCategory::Cooking);
    assert!(!matches_instructor(&cooking, &instructor));
}

#[test]
fn test_venue_parking_facet() {
    let mut filters = SearchFilters::default();
    filters.has_parking = true;

    assert!(matches_venue(&filters, &create_venue("v", 4.0), None));

    let mut without_parking = create_venue("v2", 4.0);
    without_parking.parking_info = None;
    assert!(!matches_venue(&filters, &without_parking, None));
}

#[test]
fn test_adding_a_facet_never_grows_the_match_set() {
    let classes: Vec<ClassSession> = (0..30)
        .map(|i| {
            let mut class = create_class(&i.to_string(), (i as f64) * 10.0, 3.5 + (i % 3) as f64 * 0.5, 49.28, -123.12);
            class.category = if i % 2 == 0 { ClassCategory::Arts } else { ClassCategory::Music };
            class
        })
        .collect();

    let base = SearchFilters::default().at_least_rated(4.0);
    let narrowed = base.clone().in_category(ClassCategory::Arts);

    let base_count = classes.iter().filter(|c| matches_class(&base, c, None, test_now())).count();
    let narrowed_count = classes.iter().filter(|c| matches_class(&narrowed, c, None, test_now())).count();

    assert!(narrowed_count <= base_count);

    // And every narrowed survivor also passes the broader specification.
    for class in &classes {
        if matches_class(&narrowed, class, None, test_now()) {
            assert!(matches_class(&base, class, None, test_now()));
        }
    }
}

#[test]
fn test_text_match_against_derived_fields_only() {
    let item = SearchResult::Class(create_class("c1", 40.0, 4.5, 49.28, -123.12));

    assert!(text_matches("", &item));
    assert!(text_matches("class c1", &item));
    assert!(text_matches("SARAH", &item)); // instructor name via subtitle
    assert!(!text_matches("nonexistent", &item));
}

#[test]
fn test_rank_price_handles_missing_values() {
    let items = vec![
        SearchResult::Class(create_class("expensive", 90.0, 4.0, 49.28, -123.12)),
        SearchResult::Instructor(create_instructor("i", 4.0)),
        SearchResult::Class(create_class("cheap", 15.0, 4.0, 49.28, -123.12)),
    ];

    let ranked = rank(items, SortStrategy::PriceAsc, None);

    // The instructor's missing price compares as zero and sorts first.
    assert_eq!(ranked[0].price(), None);
    assert_eq!(ranked[1].price(), Some(15.0));
    assert_eq!(ranked[2].price(), Some(90.0));
}

#[test]
fn test_rank_distance_requires_location() {
    let items = vec![
        SearchResult::Class(create_class("b", 20.0, 4.0, 49.05, -122.30)),
        SearchResult::Class(create_class("a", 20.0, 4.0, 49.28, -123.12)),
    ];
    let original: Vec<String> = items.iter().map(|i| i.id()).collect();

    let unchanged = rank(items.clone(), SortStrategy::Distance, None);
    let unchanged_ids: Vec<String> = unchanged.iter().map(|i| i.id()).collect();
    assert_eq!(original, unchanged_ids);

    let origin = Coordinate::new(49.2827, -123.1207);
    let sorted = rank(items, SortStrategy::Distance, Some(origin));
    assert_eq!(sorted[0].id(), "class:a");
}
