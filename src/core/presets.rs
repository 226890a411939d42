use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{ClassCategory, ClassSession, DifficultyLevel, SearchFilters, SortStrategy};

/// A named filter template representing a common search intent.
///
/// Presets are data, not behavior: applying one replaces the caller's filter
/// specification wholesale. Every preset is assembled from the pure
/// `SearchFilters` mutators.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterPreset {
    pub key: String,
    pub name: String,
    pub description: String,
    pub filters: SearchFilters,
}

impl FilterPreset {
    fn new(key: &str, name: &str, description: &str, filters: SearchFilters) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            filters,
        }
    }

    /// The built-in preset table.
    pub fn builtin() -> Vec<FilterPreset> {
        vec![
            FilterPreset::new(
                "free-classes",
                "Free Classes",
                "Sessions that cost nothing to attend",
                SearchFilters::default()
                    .free_only()
                    .sorted_by(SortStrategy::DateAsc),
            ),
            FilterPreset::new(
                "this-weekend",
                "This Weekend",
                "Saturday and Sunday of the current week",
                SearchFilters::default()
                    .this_weekend()
                    .sorted_by(SortStrategy::DateAsc),
            ),
            FilterPreset::new(
                "near-me",
                "Near Me",
                "Within five kilometers of your location",
                SearchFilters::default()
                    .nearby()
                    .sorted_by(SortStrategy::Distance),
            ),
            FilterPreset::new(
                "beginner-friendly",
                "Beginner Friendly",
                "No experience required",
                SearchFilters::default()
                    .for_difficulties([DifficultyLevel::Beginner, DifficultyLevel::AllLevels]),
            ),
            FilterPreset::new(
                "top-rated",
                "Top Rated",
                "Rated 4.5 stars and up",
                SearchFilters::default()
                    .at_least_rated(4.5)
                    .sorted_by(SortStrategy::Rating),
            ),
            FilterPreset::new(
                "in-person",
                "In Person",
                "Upcoming sessions held at a venue",
                SearchFilters::default().in_person_only().upcoming_only(),
            ),
        ]
    }

    /// Look up a built-in preset by key.
    pub fn find(key: &str) -> Option<FilterPreset> {
        Self::builtin().into_iter().find(|preset| preset.key == key)
    }
}

/// A per-category activity summary derived from the class list
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingCategory {
    pub category: ClassCategory,
    pub name: String,
    pub class_count: usize,
    /// Mean enrolled/capacity ratio over the counted sessions
    pub average_fill: f64,
    pub trending_score: f64,
}

/// Summarize which categories are trending: upcoming session count blended
/// with how full those sessions are. Deterministic for a fixed `now`.
pub fn trending_categories(
    classes: &[ClassSession],
    now: DateTime<Utc>,
    limit: usize,
) -> Vec<TrendingCategory> {
    let mut per_category: BTreeMap<ClassCategory, (usize, f64)> = BTreeMap::new();

    for class in classes.iter().filter(|class| class.start_date > now) {
        let fill = if class.max_participants > 0 {
            f64::from(class.enrolled_count) / f64::from(class.max_participants)
        } else {
            0.0
        };
        let entry = per_category.entry(class.category).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += fill;
    }

    let mut trending: Vec<TrendingCategory> = per_category
        .into_iter()
        .map(|(category, (class_count, fill_sum))| {
            let average_fill = fill_sum / class_count as f64;
            TrendingCategory {
                category,
                name: category.label().to_string(),
                class_count,
                average_fill,
                trending_score: class_count as f64 * (0.5 + average_fill),
            }
        })
        .collect();

    trending.sort_by(|a, b| {
        b.trending_score
            .partial_cmp(&a.trending_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.category.cmp(&b.category))
    });
    trending.truncate(limit);
    trending
}
