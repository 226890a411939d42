use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::filters::{matches_class, matches_instructor, matches_venue};
use crate::core::ranking::rank;
use crate::core::results::{text_matches, SearchResult};
use crate::models::{ClassSession, Instructor, SearchFilters, SearchParameters, SearchScope, Venue};

/// The seam to the entity provider.
///
/// Implementations hand the engine immutable snapshots; the engine never
/// fetches, caches, retries, or pages upstream.
pub trait EntityCatalog {
    fn classes(&self) -> &[ClassSession];
    fn instructors(&self) -> &[Instructor];
    fn venues(&self) -> &[Venue];
}

/// An in-memory working set of catalog entities
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub classes: Vec<ClassSession>,
    pub instructors: Vec<Instructor>,
    pub venues: Vec<Venue>,
}

impl EntityCatalog for CatalogSnapshot {
    fn classes(&self) -> &[ClassSession] {
        &self.classes
    }

    fn instructors(&self) -> &[Instructor] {
        &self.instructors
    }

    fn venues(&self) -> &[Venue] {
        &self.venues
    }
}

/// Result of one search invocation
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// The requested page of ranked hits
    pub hits: Vec<SearchResult>,
    /// How many hits matched before pagination
    pub total_matched: usize,
}

/// Search orchestrator.
///
/// Runs the fixed pipeline: collect entities for the requested scope, apply
/// the facet evaluator to the raw entities, adapt survivors into tagged
/// results, apply the query matcher against the adapter-derived text, rank,
/// then slice the requested page. Filtering precedes adaptation so derived
/// fields are never computed for discarded entities; query matching follows
/// adaptation because title and subtitle only exist on the adapted result.
#[derive(Debug, Clone, Default)]
pub struct SearchEngine;

impl SearchEngine {
    pub fn new() -> Self {
        Self
    }

    /// Run a search with calendar facets resolved against the current instant.
    pub fn search(&self, params: &SearchParameters, catalog: &impl EntityCatalog) -> SearchOutcome {
        self.search_at(params, catalog, Utc::now())
    }

    /// Run a search against an explicit "now".
    ///
    /// Pure over its inputs: fixed inputs produce an identical ordered page.
    pub fn search_at(
        &self,
        params: &SearchParameters,
        catalog: &impl EntityCatalog,
        now: DateTime<Utc>,
    ) -> SearchOutcome {
        let default_filters = SearchFilters::default();
        let filters = params.filters.as_ref().unwrap_or(&default_filters);

        let mut results: Vec<SearchResult> = Vec::new();

        if matches!(params.scope, SearchScope::All | SearchScope::Classes) {
            results.extend(
                catalog
                    .classes()
                    .iter()
                    .filter(|class| matches_class(filters, class, params.location, now))
                    .cloned()
                    .map(SearchResult::Class),
            );
        }

        if matches!(params.scope, SearchScope::All | SearchScope::Instructors) {
            results.extend(
                catalog
                    .instructors()
                    .iter()
                    .filter(|instructor| matches_instructor(filters, instructor))
                    .cloned()
                    .map(SearchResult::Instructor),
            );
        }

        if matches!(params.scope, SearchScope::All | SearchScope::Venues) {
            results.extend(
                catalog
                    .venues()
                    .iter()
                    .filter(|venue| matches_venue(filters, venue, params.location))
                    .cloned()
                    .map(SearchResult::Venue),
            );
        }

        results.retain(|item| text_matches(&params.query, item));

        let ranked = rank(results, params.sort_by, params.location);
        let total_matched = ranked.len();

        // Clamp the page to the array bounds; an out-of-range offset yields an
        // empty page rather than an error.
        let start = params.offset.min(total_matched);
        let end = params.offset.saturating_add(params.limit).min(total_matched);
        let hits = ranked[start..end].to_vec();

        SearchOutcome { hits, total_matched }
    }
}
