use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::Coordinate;
use crate::models::filters::{SearchFilters, SearchParameters, SearchScope, SortStrategy};

/// Request to run a search
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub scope: SearchScope,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[validate(range(min = 0.1, max = 500.0))]
    #[serde(default)]
    pub radius_km: Option<f64>,
    #[serde(default)]
    pub offset: u32,
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100))]
    pub limit: u32,
    #[serde(default)]
    pub filters: Option<SearchFilters>,
    #[serde(default)]
    pub sort_by: Option<SortStrategy>,
    /// When present, the executed search lands in this user's history
    #[serde(default)]
    pub user_id: Option<String>,
}

fn default_limit() -> u32 {
    20
}

impl SearchRequest {
    /// Lower the request into core search parameters.
    ///
    /// A location requires both coordinates. An explicit `sortBy` wins over
    /// the strategy carried inside the filter specification.
    pub fn into_parameters(self) -> SearchParameters {
        let location = match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinate::new(latitude, longitude)),
            _ => None,
        };

        let sort_by = self
            .sort_by
            .or_else(|| self.filters.as_ref().map(|filters| filters.sort_by))
            .unwrap_or_default();

        SearchParameters {
            query: self.query,
            scope: self.scope,
            location,
            radius_km: self.radius_km,
            offset: self.offset as usize,
            limit: self.limit as usize,
            filters: self.filters,
            sort_by,
        }
    }
}

/// Query parameters for listing a user's recent searches
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    #[validate(length(min = 1))]
    pub user_id: String,
    #[serde(default = "default_history_limit")]
    #[validate(range(min = 1, max = 50))]
    pub limit: u32,
}

fn default_history_limit() -> u32 {
    10
}

/// Query parameters for removing history entries: one query when given,
/// otherwise the whole history
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ClearHistoryQuery {
    #[validate(length(min = 1))]
    pub user_id: String,
    #[serde(default)]
    pub query: Option<String>,
}

/// Query parameters identifying the owner of a stored resource
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OwnerQuery {
    #[validate(length(min = 1))]
    pub user_id: String,
}

/// Request to save a named search for later reuse
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SaveSearchRequest {
    #[validate(length(min = 1))]
    pub user_id: String,
    #[validate(length(min = 1, max = 80))]
    pub name: String,
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub filters: SearchFilters,
}

/// Query parameters for autocomplete suggestions
#[derive(Debug, Clone, Deserialize)]
pub struct SuggestQuery {
    pub q: String,
}

/// Query parameters for the trending-categories summary
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TrendingQuery {
    #[serde(default = "default_trending_limit")]
    #[validate(range(min = 1, max = 10))]
    pub limit: u32,
}

fn default_trending_limit() -> u32 {
    5
}
