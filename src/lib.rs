//! Atelier Search - search and ranking service for the Atelier class marketplace
//!
//! This library implements the search core: a pure, synchronous pipeline of
//! facet filtering, result adaptation, query matching, ranking, and
//! pagination over class/instructor/venue snapshots, plus the service
//! collaborators (catalog client, response cache, history store) around it.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{
    haversine_distance, CatalogSnapshot, EntityCatalog, FilterPreset, SearchEngine, SearchResult,
};
pub use crate::models::{
    ClassSession, Coordinate, Instructor, SearchFilters, SearchParameters, SearchScope,
    SortStrategy, Venue,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Verify that the library exports work correctly
        let outcome = SearchEngine::new().search(&SearchParameters::default(), &CatalogSnapshot::default());
        assert_eq!(outcome.total_matched, 0);
    }
}
