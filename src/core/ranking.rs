use std::cmp::{Ordering, Reverse};

use chrono::{DateTime, Utc};

use crate::core::distance::distance_km;
use crate::core::results::SearchResult;
use crate::models::{Coordinate, SortStrategy};

/// Order search hits according to the chosen strategy.
///
/// Sorting is stable; ties keep a consistent order but callers must not assume
/// the original order survives for tied elements across strategies. Missing
/// values follow fixed sentinels: absent price compares as 0, absent rating as
/// 0, absent coordinate as +infinity, absent start date as the far future.
pub fn rank(
    mut items: Vec<SearchResult>,
    strategy: SortStrategy,
    user_location: Option<Coordinate>,
) -> Vec<SearchResult> {
    match strategy {
        SortStrategy::Relevance => {
            // Exact matches sort first. The exact-match flag is never set in
            // the current model, so this ordering is a stable no-op.
            items.sort_by_key(|item| !item.is_exact_match());
        }
        SortStrategy::PriceAsc => {
            items.sort_by(|a, b| cmp_f64(price_key(a), price_key(b)));
        }
        SortStrategy::PriceDesc => {
            items.sort_by(|a, b| cmp_f64(price_key(b), price_key(a)));
        }
        // Popularity has no independent signal and proxies to rating.
        SortStrategy::Rating | SortStrategy::Popularity => {
            items.sort_by(|a, b| cmp_f64(rating_key(b), rating_key(a)));
        }
        SortStrategy::Distance => {
            // Without a user location there is nothing to measure from; the
            // input order is returned unchanged.
            let Some(origin) = user_location else {
                return items;
            };
            items.sort_by(|a, b| cmp_f64(distance_key(a, origin), distance_key(b, origin)));
        }
        SortStrategy::DateAsc => {
            items.sort_by_key(date_key);
        }
        SortStrategy::DateDesc | SortStrategy::Newest => {
            items.sort_by_key(|item| Reverse(date_key(item)));
        }
    }

    items
}

#[inline]
fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

#[inline]
fn price_key(item: &SearchResult) -> f64 {
    item.price().unwrap_or(0.0)
}

#[inline]
fn rating_key(item: &SearchResult) -> f64 {
    item.rating().unwrap_or(0.0)
}

#[inline]
fn distance_key(item: &SearchResult, origin: Coordinate) -> f64 {
    item.coordinate()
        .map(|coordinate| distance_km(origin, coordinate))
        .unwrap_or(f64::INFINITY)
}

#[inline]
fn date_key(item: &SearchResult) -> DateTime<Utc> {
    item.start_date().unwrap_or(DateTime::<Utc>::MAX_UTC)
}
