use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{ClassSession, Coordinate, Instructor, Venue};

/// A search hit over one of the three entity kinds.
///
/// The enum is the closed set of result variants; every derived field below is
/// a total mapping so adding a variant forces every accessor to be revisited.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SearchResult {
    Class(ClassSession),
    Instructor(Instructor),
    Venue(Venue),
}

impl SearchResult {
    /// Stable identity key, unique across entity kinds even when the raw
    /// identifiers collide.
    pub fn id(&self) -> String {
        match self {
            SearchResult::Class(class) => format!("class:{}", class.id),
            SearchResult::Instructor(instructor) => format!("instructor:{}", instructor.id),
            SearchResult::Venue(venue) => format!("venue:{}", venue.id),
        }
    }

    pub fn title(&self) -> &str {
        match self {
            SearchResult::Class(class) => &class.title,
            SearchResult::Instructor(instructor) => &instructor.name,
            SearchResult::Venue(venue) => &venue.name,
        }
    }

    pub fn subtitle(&self) -> String {
        match self {
            SearchResult::Class(class) => format!(
                "{} with {} at {}",
                class.category.label(),
                class.instructor_name,
                class.venue_name
            ),
            SearchResult::Instructor(instructor) => {
                if instructor.specialties.is_empty() {
                    instructor.bio.clone().unwrap_or_default()
                } else {
                    instructor.specialties.join(", ")
                }
            }
            SearchResult::Venue(venue) => format!("{}, {}", venue.address, venue.city),
        }
    }

    /// Derived price; instructors and venues have none.
    pub fn price(&self) -> Option<f64> {
        match self {
            SearchResult::Class(class) => Some(class.price),
            SearchResult::Instructor(_) | SearchResult::Venue(_) => None,
        }
    }

    pub fn rating(&self) -> Option<f64> {
        match self {
            SearchResult::Class(class) => Some(class.average_rating),
            SearchResult::Instructor(instructor) => Some(instructor.rating),
            SearchResult::Venue(venue) => Some(venue.average_rating),
        }
    }

    /// Venue coordinate of the hit; instructors have no fixed location.
    pub fn coordinate(&self) -> Option<Coordinate> {
        match self {
            SearchResult::Class(class) => Some(class.coordinate()),
            SearchResult::Instructor(_) => None,
            SearchResult::Venue(venue) => Some(venue.coordinate()),
        }
    }

    /// Session start timestamp; only classes are scheduled.
    pub fn start_date(&self) -> Option<DateTime<Utc>> {
        match self {
            SearchResult::Class(class) => Some(class.start_date),
            SearchResult::Instructor(_) | SearchResult::Venue(_) => None,
        }
    }

    pub fn type_label(&self) -> &'static str {
        match self {
            SearchResult::Class(_) => "Class",
            SearchResult::Instructor(_) => "Instructor",
            SearchResult::Venue(_) => "Venue",
        }
    }

    pub fn type_icon(&self) -> &'static str {
        match self {
            SearchResult::Class(_) => "book",
            SearchResult::Instructor(_) => "person",
            SearchResult::Venue(_) => "map-pin",
        }
    }

    /// Whether the hit is an exact match for the active query.
    ///
    /// Nothing in the current model ever marks a hit exact, so this is
    /// permanently false and the relevance ordering built on it is a no-op.
    /// Kept as-is rather than replaced with an invented scoring function.
    pub fn is_exact_match(&self) -> bool {
        false
    }
}

/// Literal substring containment of `query` against a hit's derived title and
/// subtitle. Case-insensitive; an empty or whitespace-only query matches.
///
/// Not a relevance engine: no tokenization, stemming, or scoring.
pub fn text_matches(query: &str, item: &SearchResult) -> bool {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return true;
    }

    let needle = trimmed.to_lowercase();
    item.title().to_lowercase().contains(&needle)
        || item.subtitle().to_lowercase().contains(&needle)
}
