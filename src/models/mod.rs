// Model exports
pub mod domain;
pub mod filters;
pub mod requests;
pub mod responses;

pub use domain::{ClassCategory, ClassSession, Coordinate, DifficultyLevel, Instructor, Venue};
pub use filters::{
    ClassSizeRange, DateRange, DayOfWeek, DistanceRange, DurationRange, SearchFilters,
    SearchParameters, SearchScope, SortStrategy, TimeOfDay, DEFAULT_MAX_PRICE,
};
pub use requests::{
    ClearHistoryQuery, HistoryQuery, OwnerQuery, SaveSearchRequest, SearchRequest, SuggestQuery,
    TrendingQuery,
};
pub use responses::{
    ErrorResponse, HealthResponse, PresetsResponse, SaveSearchResponse, SearchHit, SearchResponse,
    SuggestResponse, TrendingResponse,
};
