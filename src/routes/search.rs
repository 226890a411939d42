use actix_web::{web, HttpResponse, Responder};
use std::collections::BTreeSet;
use std::sync::Arc;
use validator::Validate;

use crate::core::presets::{trending_categories, FilterPreset};
use crate::core::SearchEngine;
use crate::models::{
    ClassCategory, ClearHistoryQuery, ErrorResponse, HealthResponse, HistoryQuery, OwnerQuery,
    PresetsResponse, SaveSearchRequest, SaveSearchResponse, SearchHit, SearchRequest,
    SearchResponse, SuggestQuery, SuggestResponse, TrendingQuery, TrendingResponse,
};
use crate::services::{CacheKey, CatalogClient, HistoryStore, SearchCache};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogClient>,
    pub cache: Arc<SearchCache>,
    pub history: Arc<HistoryStore>,
    pub engine: SearchEngine,
    /// Bounding-box radius for location-scoped prefetch when the caller
    /// supplies a location but no radius
    pub default_radius_km: Option<f64>,
}

/// Configure all search-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/search", web::post().to(run_search))
        .route("/search/presets", web::get().to(list_presets))
        .route("/search/trending", web::get().to(trending))
        .route("/search/suggest", web::get().to(suggest))
        .service(
            web::resource("/search/history")
                .route(web::get().to(recent_history))
                .route(web::delete().to(clear_history)),
        )
        .service(
            web::resource("/search/saved")
                .route(web::post().to(save_search))
                .route(web::get().to(list_saved)),
        )
        .route("/search/saved/{id}", web::delete().to(remove_saved));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let db_healthy = state.history.health_check().await.unwrap_or(false);

    let status = if db_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Search endpoint
///
/// POST /api/v1/search
///
/// Request body:
/// ```json
/// {
///   "query": "pottery",
///   "scope": "all",
///   "latitude": 49.2827,
///   "longitude": -123.1207,
///   "offset": 0,
///   "limit": 20,
///   "filters": { "categories": ["arts"], "minRating": 4.0 },
///   "sortBy": "rating",
///   "userId": "optional, records the search in history"
/// }
/// ```
async fn run_search(
    state: web::Data<AppState>,
    request: web::Json<SearchRequest>,
) -> impl Responder {
    if let Err(errors) = request.validate() {
        tracing::info!("Validation failed for search request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let request = request.into_inner();
    let user_id = request.user_id.clone();
    let params = request.into_parameters();

    tracing::info!(
        "Searching: query={:?}, scope={:?}, offset={}, limit={}",
        params.query,
        params.scope,
        params.offset,
        params.limit
    );

    let cache_key = CacheKey::search(&params);

    if let Ok(cached) = state.cache.get::<SearchResponse>(&cache_key).await {
        tracing::debug!("Serving search from cache: {}", cache_key);
        record_history(&state, user_id.as_deref(), &params.query, cached.total_matched).await;
        return HttpResponse::Ok().json(cached);
    }

    let radius_km = params.radius_km.or(state.default_radius_km);
    let snapshot = match state.catalog.fetch_snapshot(params.location, radius_km).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::error!("Failed to fetch catalog snapshot: {}", e);
            return HttpResponse::BadGateway().json(ErrorResponse {
                error: "Catalog unavailable".to_string(),
                message: e.to_string(),
                status_code: 502,
            });
        }
    };

    let outcome = state.engine.search(&params, &snapshot);

    let response = SearchResponse {
        results: outcome.hits.iter().map(SearchHit::from).collect(),
        total_matched: outcome.total_matched,
        offset: params.offset,
        limit: params.limit,
        has_more: params.offset + outcome.hits.len() < outcome.total_matched,
    };

    if let Err(e) = state.cache.set(&cache_key, &response).await {
        tracing::warn!("Failed to cache search response: {}", e);
    }

    record_history(&state, user_id.as_deref(), &params.query, outcome.total_matched).await;

    tracing::info!(
        "Returning {} of {} hits",
        response.results.len(),
        response.total_matched
    );

    HttpResponse::Ok().json(response)
}

/// Best-effort history recording; a store failure degrades, never fails a search.
async fn record_history(
    state: &web::Data<AppState>,
    user_id: Option<&str>,
    query: &str,
    result_count: usize,
) {
    let Some(user_id) = user_id else {
        return;
    };
    if query.trim().is_empty() {
        return;
    }

    if let Err(e) = state
        .history
        .record_search(user_id, query, result_count as i64)
        .await
    {
        tracing::warn!("Failed to record search history for {}: {}", user_id, e);
    }
}

/// List the built-in filter presets
///
/// GET /api/v1/search/presets
async fn list_presets() -> impl Responder {
    HttpResponse::Ok().json(PresetsResponse {
        presets: FilterPreset::builtin(),
    })
}

/// Trending category summary derived from the upcoming class list
///
/// GET /api/v1/search/trending?limit=5
async fn trending(state: web::Data<AppState>, query: web::Query<TrendingQuery>) -> impl Responder {
    if let Err(errors) = query.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let classes = match state.catalog.fetch_classes().await {
        Ok(classes) => classes,
        Err(e) => {
            tracing::error!("Failed to fetch classes for trending: {}", e);
            return HttpResponse::BadGateway().json(ErrorResponse {
                error: "Catalog unavailable".to_string(),
                message: e.to_string(),
                status_code: 502,
            });
        }
    };

    let categories = trending_categories(&classes, chrono::Utc::now(), query.limit as usize);

    HttpResponse::Ok().json(TrendingResponse { categories })
}

/// Autocomplete suggestions
///
/// GET /api/v1/search/suggest?q=po
async fn suggest(state: web::Data<AppState>, query: web::Query<SuggestQuery>) -> impl Responder {
    // Nothing useful to suggest below two characters
    if query.q.trim().len() < 2 {
        return HttpResponse::Ok().json(SuggestResponse {
            suggestions: vec![],
        });
    }

    let neighborhoods: Vec<String> = match state.catalog.fetch_venues().await {
        Ok(venues) => venues
            .into_iter()
            .filter_map(|venue| venue.neighborhood)
            .collect(),
        Err(e) => {
            tracing::warn!("Suggest proceeding without neighborhoods: {}", e);
            vec![]
        }
    };

    let popular: Vec<String> = match state.history.popular_searches(20).await {
        Ok(popular) => popular.into_iter().map(|p| p.query).collect(),
        Err(e) => {
            tracing::warn!("Suggest proceeding without popular searches: {}", e);
            vec![]
        }
    };

    let suggestions = collect_suggestions(&query.q, &neighborhoods, &popular);

    HttpResponse::Ok().json(SuggestResponse { suggestions })
}

/// Literal containment over category labels, neighborhoods, and popular
/// queries; deduplicated, sorted, capped at 8.
fn collect_suggestions(query: &str, neighborhoods: &[String], popular: &[String]) -> Vec<String> {
    let needle = query.trim().to_lowercase();
    let mut suggestions: BTreeSet<String> = BTreeSet::new();

    for category in ClassCategory::ALL {
        if category.label().to_lowercase().contains(&needle) {
            suggestions.insert(category.label().to_string());
        }
    }

    for neighborhood in neighborhoods {
        if neighborhood.to_lowercase().contains(&needle) {
            suggestions.insert(neighborhood.clone());
        }
    }

    for popular_query in popular {
        if popular_query.to_lowercase().contains(&needle) {
            suggestions.insert(popular_query.clone());
        }
    }

    suggestions.into_iter().take(8).collect()
}

/// Recent searches for a user
///
/// GET /api/v1/search/history?userId={userId}&limit=10
async fn recent_history(
    state: web::Data<AppState>,
    query: web::Query<HistoryQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    match state
        .history
        .recent_searches(&query.user_id, query.limit as usize)
        .await
    {
        Ok(searches) => HttpResponse::Ok().json(serde_json::json!({
            "userId": query.user_id,
            "searches": searches,
            "count": searches.len(),
        })),
        Err(e) => {
            tracing::error!("Failed to fetch history for {}: {}", query.user_id, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to fetch search history".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Remove one remembered query, or the whole history when no query is given
///
/// DELETE /api/v1/search/history?userId={userId}[&query={query}]
async fn clear_history(
    state: web::Data<AppState>,
    query: web::Query<ClearHistoryQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let removed = match &query.query {
        Some(single) => state
            .history
            .remove_search(&query.user_id, single)
            .await
            .map(|removed| u64::from(removed)),
        None => state.history.clear_history(&query.user_id).await,
    };

    match removed {
        Ok(count) => HttpResponse::Ok().json(serde_json::json!({
            "userId": query.user_id,
            "removed": count,
        })),
        Err(e) => {
            tracing::error!("Failed to clear history for {}: {}", query.user_id, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to clear search history".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Save a named search
///
/// POST /api/v1/search/saved
async fn save_search(
    state: web::Data<AppState>,
    request: web::Json<SaveSearchRequest>,
) -> impl Responder {
    if let Err(errors) = request.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    match state
        .history
        .save_search(&request.user_id, &request.name, &request.query, &request.filters)
        .await
    {
        Ok(id) => HttpResponse::Ok().json(SaveSearchResponse { success: true, id }),
        Err(e) => {
            tracing::error!("Failed to save search for {}: {}", request.user_id, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to save search".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// List a user's saved searches
///
/// GET /api/v1/search/saved?userId={userId}
async fn list_saved(state: web::Data<AppState>, query: web::Query<OwnerQuery>) -> impl Responder {
    if let Err(errors) = query.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    match state.history.saved_searches(&query.user_id).await {
        Ok(saved) => HttpResponse::Ok().json(serde_json::json!({
            "userId": query.user_id,
            "savedSearches": saved,
            "count": saved.len(),
        })),
        Err(e) => {
            tracing::error!("Failed to list saved searches for {}: {}", query.user_id, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to list saved searches".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Delete one saved search
///
/// DELETE /api/v1/search/saved/{id}?userId={userId}
async fn remove_saved(
    state: web::Data<AppState>,
    path: web::Path<uuid::Uuid>,
    query: web::Query<OwnerQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let id = path.into_inner();

    match state.history.remove_saved(&query.user_id, id).await {
        Ok(true) => HttpResponse::Ok().json(serde_json::json!({ "removed": true })),
        Ok(false) => HttpResponse::NotFound().json(ErrorResponse {
            error: "Saved search not found".to_string(),
            message: format!("No saved search {} for this user", id),
            status_code: 404,
        }),
        Err(e) => {
            tracing::error!("Failed to remove saved search {}: {}", id, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to remove saved search".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggestions_cover_all_sources() {
        let neighborhoods = vec!["Mount Pleasant".to_string(), "Kitsilano".to_string()];
        let popular = vec!["pleasant evening pottery".to_string()];

        let suggestions = collect_suggestions("pleasant", &neighborhoods, &popular);
        assert_eq!(
            suggestions,
            vec![
                "Mount Pleasant".to_string(),
                "pleasant evening pottery".to_string()
            ]
        );
    }

    #[test]
    fn test_suggestions_include_category_labels() {
        let suggestions = collect_suggestions("cook", &[], &[]);
        assert_eq!(suggestions, vec!["Cooking & Baking".to_string()]);
    }

    #[test]
    fn test_suggestions_are_deduplicated_and_capped() {
        let neighborhoods: Vec<String> = (0..20).map(|i| format!("Area {}", i)).collect();
        let popular = vec!["Area 1".to_string()];

        let suggestions = collect_suggestions("area", &neighborhoods, &popular);
        assert_eq!(suggestions.len(), 8);
    }
}
