use chrono::{DateTime, Datelike, Timelike, Utc};

use crate::core::distance::distance_km;
use crate::models::{ClassSession, Coordinate, DayOfWeek, Instructor, SearchFilters, Venue};

/// Decide whether a class session passes the full filter specification.
///
/// Pure and total: facets are evaluated independently and combined with a
/// logical AND, so no facet may depend on another's outcome. Inactive facets
/// (at their unconstrained defaults) always pass. Degenerate ranges such as
/// `min_price > max_price` simply exclude everything; that is documented
/// behavior, not a fault.
#[inline]
pub fn matches_class(
    filters: &SearchFilters,
    class: &ClassSession,
    user_location: Option<Coordinate>,
    now: DateTime<Utc>,
) -> bool {
    // Category
    if !filters.categories.is_empty() && !filters.categories.contains(&class.category) {
        return false;
    }

    // Price. Free classes are governed solely by the include_free flag; the
    // numeric range only applies to priced classes.
    if class.price == 0.0 {
        if !filters.include_free {
            return false;
        }
    } else if class.price < filters.min_price || class.price > filters.max_price {
        return false;
    }

    // Difficulty
    if !filters.difficulties.is_empty() && !filters.difficulties.contains(&class.difficulty) {
        return false;
    }

    // Minimum rating
    if filters.min_rating > 0.0 && class.average_rating < filters.min_rating {
        return false;
    }

    // Duration bucket
    if let Some((min, max)) = filters.duration.minutes() {
        if class.duration_minutes < min || class.duration_minutes >= max {
            return false;
        }
    }

    // Group-size bucket
    if let Some((min, max)) = filters.class_size.capacity() {
        if class.max_participants < min || class.max_participants >= max {
            return false;
        }
    }

    // Distance: only evaluated when both a user location and a finite limit exist
    if let (Some(location), Some(limit_km)) = (user_location, filters.distance.limit_km()) {
        if distance_km(location, class.coordinate()) > limit_km {
            return false;
        }
    }

    // Date bucket; buckets with no resolved interval always pass
    if let Some((start, end)) = filters.date_range.interval(now) {
        if class.start_date < start || class.start_date >= end {
            return false;
        }
    }

    // Time of day: the start hour must fall in at least one selected bucket
    if !filters.time_of_day.is_empty() {
        let hour = class.start_date.hour();
        if !filters.time_of_day.iter().any(|bucket| bucket.contains_hour(hour)) {
            return false;
        }
    }

    // Day of week
    if !filters.days_of_week.is_empty() {
        let day = DayOfWeek::from_weekday(class.start_date.weekday());
        if !filters.days_of_week.contains(&day) {
            return false;
        }
    }

    if filters.only_upcoming && class.start_date <= now {
        return false;
    }

    if filters.only_available && class.enrolled_count >= class.max_participants {
        return false;
    }

    if !filters.allows_online && class.is_online {
        return false;
    }

    // Neighborhood: an active set requires a present, matching value
    if !filters.neighborhoods.is_empty() {
        match &class.neighborhood {
            Some(neighborhood) => {
                if !filters
                    .neighborhoods
                    .iter()
                    .any(|selected| selected.eq_ignore_ascii_case(neighborhood))
                {
                    return false;
                }
            }
            None => return false,
        }
    }

    true
}

/// Facet subset for instructors: rating, plus the category facet matched
/// against specialties by case-insensitive containment of the category label.
/// Every other facet is vacuously true for this variant.
#[inline]
pub fn matches_instructor(filters: &SearchFilters, instructor: &Instructor) -> bool {
    if filters.min_rating > 0.0 && instructor.rating < filters.min_rating {
        return false;
    }

    if !filters.categories.is_empty() {
        let teaches_selected = instructor.specialties.iter().any(|specialty| {
            let specialty = specialty.to_lowercase();
            filters
                .categories
                .iter()
                .any(|category| specialty.contains(&category.label().to_lowercase()))
        });
        if !teaches_selected {
            return false;
        }
    }

    true
}

/// Facet subset for venues: rating, distance, parking, accessibility, and
/// neighborhood. Every other facet is vacuously true for this variant.
#[inline]
pub fn matches_venue(
    filters: &SearchFilters,
    venue: &Venue,
    user_location: Option<Coordinate>,
) -> bool {
    if filters.min_rating > 0.0 && venue.average_rating < filters.min_rating {
        return false;
    }

    if let (Some(location), Some(limit_km)) = (user_location, filters.distance.limit_km()) {
        if distance_km(location, venue.coordinate()) > limit_km {
            return false;
        }
    }

    if filters.has_parking && venue.parking_info.is_none() {
        return false;
    }

    if filters.is_accessible && venue.accessibility_info.is_none() {
        return false;
    }

    if !filters.neighborhoods.is_empty() {
        match &venue.neighborhood {
            Some(neighborhood) => {
                if !filters
                    .neighborhoods
                    .iter()
                    .any(|selected| selected.eq_ignore_ascii_case(neighborhood))
                {
                    return false;
                }
            }
            None => return false,
        }
    }

    true
}
