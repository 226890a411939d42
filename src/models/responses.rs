use serde::{Deserialize, Serialize};

use crate::core::presets::{FilterPreset, TrendingCategory};
use crate::core::results::SearchResult;

/// One adapted hit with its derived display fields alongside the raw entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub id: String,
    pub type_label: String,
    pub type_icon: String,
    pub title: String,
    pub subtitle: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    pub entity: SearchResult,
}

impl From<&SearchResult> for SearchHit {
    fn from(result: &SearchResult) -> Self {
        Self {
            id: result.id(),
            type_label: result.type_label().to_string(),
            type_icon: result.type_icon().to_string(),
            title: result.title().to_string(),
            subtitle: result.subtitle(),
            price: result.price(),
            rating: result.rating(),
            entity: result.clone(),
        }
    }
}

/// Response for the search endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub results: Vec<SearchHit>,
    pub total_matched: usize,
    pub offset: usize,
    pub limit: usize,
    pub has_more: bool,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Response listing the built-in filter presets
#[derive(Debug, Clone, Serialize)]
pub struct PresetsResponse {
    pub presets: Vec<FilterPreset>,
}

/// Response with the trending-category summary
#[derive(Debug, Clone, Serialize)]
pub struct TrendingResponse {
    pub categories: Vec<TrendingCategory>,
}

/// Response with autocomplete suggestions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestResponse {
    pub suggestions: Vec<String>,
}

/// Response after saving a named search
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveSearchResponse {
    pub success: bool,
    pub id: uuid::Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClassCategory, ClassSession, DifficultyLevel};

    #[test]
    fn test_hit_carries_derived_fields() {
        let start = chrono::Utc::now();
        let result = SearchResult::Class(ClassSession {
            id: "c9".to_string(),
            title: "Knife Skills".to_string(),
            description: String::new(),
            category: ClassCategory::Cooking,
            difficulty: DifficultyLevel::Beginner,
            price: 35.0,
            start_date: start,
            end_date: start,
            duration_minutes: 90,
            max_participants: 8,
            enrolled_count: 2,
            average_rating: 4.7,
            total_reviews: 11,
            instructor_id: "i1".to_string(),
            instructor_name: "David Kim".to_string(),
            venue_id: "v1".to_string(),
            venue_name: "Community Kitchen".to_string(),
            neighborhood: None,
            latitude: 49.28,
            longitude: -123.12,
            is_online: false,
            tags: vec![],
        });

        let hit = SearchHit::from(&result);
        assert_eq!(hit.id, "class:c9");
        assert_eq!(hit.type_label, "Class");
        assert_eq!(hit.title, "Knife Skills");
        assert_eq!(hit.price, Some(35.0));
    }
}
