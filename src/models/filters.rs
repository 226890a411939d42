use std::collections::BTreeSet;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::{ClassCategory, DifficultyLevel};

/// Upper bound of the price slider; the facet is inactive at [0, MAX].
pub const DEFAULT_MAX_PRICE: f64 = 500.0;

/// Which entity kinds a search considers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchScope {
    #[default]
    All,
    Classes,
    Instructors,
    Venues,
}

/// Result ordering strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortStrategy {
    #[default]
    Relevance,
    PriceAsc,
    PriceDesc,
    Rating,
    Distance,
    DateAsc,
    DateDesc,
    Popularity,
    Newest,
}

/// Calendar buckets for the date facet, resolved relative to "now"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DateRange {
    #[default]
    Any,
    Today,
    ThisWeek,
    NextWeek,
    ThisMonth,
    NextMonth,
    /// Has no resolved interval and therefore always passes.
    Custom,
}

impl DateRange {
    /// Resolve the bucket to a half-open UTC interval.
    ///
    /// `Any` and `Custom` resolve to nothing; the evaluator treats a missing
    /// interval as a pass. Weeks are ISO weeks (Monday-based).
    pub fn interval(&self, now: DateTime<Utc>) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let today = now.date_naive();
        match self {
            DateRange::Any | DateRange::Custom => None,
            DateRange::Today => Some((day_start(today), day_start(today + Duration::days(1)))),
            DateRange::ThisWeek => {
                let monday = week_start(today);
                Some((day_start(monday), day_start(monday + Duration::days(7))))
            }
            DateRange::NextWeek => {
                let monday = week_start(today) + Duration::days(7);
                Some((day_start(monday), day_start(monday + Duration::days(7))))
            }
            DateRange::ThisMonth => {
                let first = month_start(today)?;
                Some((day_start(first), day_start(next_month_start(today)?)))
            }
            DateRange::NextMonth => {
                let first = next_month_start(today)?;
                let after = next_month_start(first)?;
                Some((day_start(first), day_start(after)))
            }
        }
    }
}

fn day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

fn month_start(date: NaiveDate) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
}

fn next_month_start(date: NaiveDate) -> Option<NaiveDate> {
    if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
    }
}

/// Time-of-day buckets tested against a session's start hour
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
}

impl TimeOfDay {
    /// Half-open [start, end) hour range of the bucket
    pub fn hour_range(&self) -> (u32, u32) {
        match self {
            TimeOfDay::Morning => (6, 12),
            TimeOfDay::Afternoon => (12, 18),
            TimeOfDay::Evening => (18, 23),
        }
    }

    pub fn contains_hour(&self, hour: u32) -> bool {
        let (start, end) = self.hour_range();
        hour >= start && hour < end
    }
}

/// Days of the week, indexed 1 = Sunday .. 7 = Saturday
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl DayOfWeek {
    pub fn index(&self) -> u32 {
        match self {
            DayOfWeek::Sunday => 1,
            DayOfWeek::Monday => 2,
            DayOfWeek::Tuesday => 3,
            DayOfWeek::Wednesday => 4,
            DayOfWeek::Thursday => 5,
            DayOfWeek::Friday => 6,
            DayOfWeek::Saturday => 7,
        }
    }

    pub fn from_weekday(weekday: chrono::Weekday) -> Self {
        match weekday {
            chrono::Weekday::Sun => DayOfWeek::Sunday,
            chrono::Weekday::Mon => DayOfWeek::Monday,
            chrono::Weekday::Tue => DayOfWeek::Tuesday,
            chrono::Weekday::Wed => DayOfWeek::Wednesday,
            chrono::Weekday::Thu => DayOfWeek::Thursday,
            chrono::Weekday::Fri => DayOfWeek::Friday,
            chrono::Weekday::Sat => DayOfWeek::Saturday,
        }
    }
}

/// Duration buckets in minutes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DurationRange {
    #[default]
    Any,
    /// Under an hour
    Short,
    /// One to two hours
    Standard,
    /// Two to three hours
    Long,
    /// Three hours or more
    Extended,
}

impl DurationRange {
    /// Half-open [min, max) minute interval; `Any` has none.
    pub fn minutes(&self) -> Option<(u32, u32)> {
        match self {
            DurationRange::Any => None,
            DurationRange::Short => Some((0, 60)),
            DurationRange::Standard => Some((60, 120)),
            DurationRange::Long => Some((120, 180)),
            DurationRange::Extended => Some((180, u32::MAX)),
        }
    }
}

/// Group-size buckets tested against a session's capacity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ClassSizeRange {
    #[default]
    Any,
    /// Up to 5 participants
    Intimate,
    /// 6 to 11 participants
    Small,
    /// 12 to 23 participants
    Medium,
    /// 24 or more
    Large,
}

impl ClassSizeRange {
    pub fn capacity(&self) -> Option<(u32, u32)> {
        match self {
            ClassSizeRange::Any => None,
            ClassSizeRange::Intimate => Some((1, 6)),
            ClassSizeRange::Small => Some((6, 12)),
            ClassSizeRange::Medium => Some((12, 24)),
            ClassSizeRange::Large => Some((24, u32::MAX)),
        }
    }
}

/// Distance buckets from the user's location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DistanceRange {
    #[default]
    Anywhere,
    Walkable,
    Nearby,
    AcrossTown,
    DayTrip,
}

impl DistanceRange {
    /// Maximum distance in kilometers; `Anywhere` imposes no limit.
    pub fn limit_km(&self) -> Option<f64> {
        match self {
            DistanceRange::Anywhere => None,
            DistanceRange::Walkable => Some(2.0),
            DistanceRange::Nearby => Some(5.0),
            DistanceRange::AcrossTown => Some(15.0),
            DistanceRange::DayTrip => Some(50.0),
        }
    }
}

/// The full multi-facet filter specification.
///
/// Every facet defaults to "unconstrained", so `SearchFilters::default()`
/// matches every entity. The struct is a value object: callers derive new
/// specifications through the pure `with`-style mutators rather than in-place
/// mutation, which keeps the evaluator and the ranking engine side-effect free.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchFilters {
    pub categories: BTreeSet<ClassCategory>,
    pub min_price: f64,
    pub max_price: f64,
    pub include_free: bool,
    pub difficulties: BTreeSet<DifficultyLevel>,
    pub date_range: DateRange,
    pub time_of_day: BTreeSet<TimeOfDay>,
    pub days_of_week: BTreeSet<DayOfWeek>,
    pub duration: DurationRange,
    pub class_size: ClassSizeRange,
    pub distance: DistanceRange,
    pub only_upcoming: bool,
    pub only_available: bool,
    pub has_parking: bool,
    pub is_accessible: bool,
    pub allows_online: bool,
    pub min_rating: f64,
    pub neighborhoods: BTreeSet<String>,
    pub sort_by: SortStrategy,
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            categories: BTreeSet::new(),
            min_price: 0.0,
            max_price: DEFAULT_MAX_PRICE,
            include_free: true,
            difficulties: BTreeSet::new(),
            date_range: DateRange::Any,
            time_of_day: BTreeSet::new(),
            days_of_week: BTreeSet::new(),
            duration: DurationRange::Any,
            class_size: ClassSizeRange::Any,
            distance: DistanceRange::Anywhere,
            only_upcoming: false,
            only_available: false,
            has_parking: false,
            is_accessible: false,
            allows_online: true,
            min_rating: 0.0,
            neighborhoods: BTreeSet::new(),
            sort_by: SortStrategy::Relevance,
        }
    }
}

impl SearchFilters {
    /// Whether the price facet deviates from its unconstrained default
    fn price_facet_active(&self) -> bool {
        self.min_price > 0.0 || self.max_price < DEFAULT_MAX_PRICE || !self.include_free
    }

    /// Number of active facets.
    ///
    /// Each facet contributes at most one unit no matter how many values are
    /// selected inside it; the sort strategy is not a facet.
    pub fn active_filter_count(&self) -> usize {
        let facets = [
            !self.categories.is_empty(),
            self.price_facet_active(),
            !self.difficulties.is_empty(),
            self.date_range != DateRange::Any,
            !self.time_of_day.is_empty(),
            !self.days_of_week.is_empty(),
            self.duration != DurationRange::Any,
            self.class_size != ClassSizeRange::Any,
            self.distance != DistanceRange::Anywhere,
            self.only_upcoming,
            self.only_available,
            self.has_parking,
            self.is_accessible,
            !self.allows_online,
            self.min_rating > 0.0,
            !self.neighborhoods.is_empty(),
        ];
        facets.iter().filter(|active| **active).count()
    }

    pub fn has_active_filters(&self) -> bool {
        self.active_filter_count() > 0
    }

    /// Restrict to free classes: the price ceiling is zeroed and free entries
    /// are forced in.
    pub fn free_only(mut self) -> Self {
        self.min_price = 0.0;
        self.max_price = 0.0;
        self.include_free = true;
        self
    }

    /// Restrict to the coming Saturday and Sunday of the current ISO week.
    pub fn this_weekend(mut self) -> Self {
        self.date_range = DateRange::ThisWeek;
        self.days_of_week = BTreeSet::from([DayOfWeek::Saturday, DayOfWeek::Sunday]);
        self
    }

    /// Restrict to venues within the nearby distance bucket.
    pub fn nearby(mut self) -> Self {
        self.distance = DistanceRange::Nearby;
        self
    }

    pub fn in_category(mut self, category: ClassCategory) -> Self {
        self.categories.insert(category);
        self
    }

    pub fn for_difficulties<I: IntoIterator<Item = DifficultyLevel>>(mut self, levels: I) -> Self {
        self.difficulties = levels.into_iter().collect();
        self
    }

    pub fn at_least_rated(mut self, min_rating: f64) -> Self {
        self.min_rating = min_rating;
        self
    }

    pub fn upcoming_only(mut self) -> Self {
        self.only_upcoming = true;
        self
    }

    pub fn in_person_only(mut self) -> Self {
        self.allows_online = false;
        self
    }

    pub fn sorted_by(mut self, strategy: SortStrategy) -> Self {
        self.sort_by = strategy;
        self
    }
}

/// Immutable parameters of one search invocation
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParameters {
    pub query: String,
    pub scope: SearchScope,
    pub location: Option<crate::models::domain::Coordinate>,
    pub radius_km: Option<f64>,
    pub offset: usize,
    pub limit: usize,
    pub filters: Option<SearchFilters>,
    pub sort_by: SortStrategy,
}

impl Default for SearchParameters {
    fn default() -> Self {
        Self {
            query: String::new(),
            scope: SearchScope::All,
            location: None,
            radius_km: None,
            offset: 0,
            limit: 20,
            filters: None,
            sort_by: SortStrategy::Relevance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_default_filters_are_inactive() {
        let filters = SearchFilters::default();
        assert!(!filters.has_active_filters());
        assert_eq!(filters.active_filter_count(), 0);
    }

    #[test]
    fn test_facets_count_one_unit_each() {
        let filters = SearchFilters::default()
            .in_category(ClassCategory::Arts)
            .in_category(ClassCategory::Cooking)
            .in_category(ClassCategory::Music)
            .at_least_rated(4.0);

        // Three selected categories are still a single facet.
        assert_eq!(filters.active_filter_count(), 2);
    }

    #[test]
    fn test_free_only_zeroes_price_ceiling() {
        let filters = SearchFilters::default().free_only();
        assert_eq!(filters.max_price, 0.0);
        assert!(filters.include_free);
        assert!(filters.has_active_filters());
    }

    #[test]
    fn test_this_weekend_selects_saturday_and_sunday() {
        let filters = SearchFilters::default().this_weekend();
        assert_eq!(filters.date_range, DateRange::ThisWeek);
        assert_eq!(
            filters.days_of_week,
            BTreeSet::from([DayOfWeek::Saturday, DayOfWeek::Sunday])
        );
    }

    #[test]
    fn test_excluding_online_counts_as_active() {
        let mut filters = SearchFilters::default();
        filters.allows_online = false;
        assert_eq!(filters.active_filter_count(), 1);
    }

    #[test]
    fn test_date_range_today_brackets_the_day() {
        let now = Utc.with_ymd_and_hms(2024, 6, 12, 15, 30, 0).unwrap();
        let (start, end) = DateRange::Today.interval(now).unwrap();

        assert_eq!(start, Utc.with_ymd_and_hms(2024, 6, 12, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2024, 6, 13, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_date_range_this_week_starts_monday() {
        // 2024-06-12 is a Wednesday; the ISO week starts Monday 2024-06-10.
        let now = Utc.with_ymd_and_hms(2024, 6, 12, 15, 30, 0).unwrap();
        let (start, end) = DateRange::ThisWeek.interval(now).unwrap();

        assert_eq!(start, Utc.with_ymd_and_hms(2024, 6, 10, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2024, 6, 17, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_date_range_next_month_rolls_over_december() {
        let now = Utc.with_ymd_and_hms(2024, 12, 3, 9, 0, 0).unwrap();
        let (start, end) = DateRange::NextMonth.interval(now).unwrap();

        assert_eq!(start, Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_custom_date_range_has_no_interval() {
        let now = Utc::now();
        assert!(DateRange::Custom.interval(now).is_none());
    }

    #[test]
    fn test_filters_roundtrip_through_json() {
        let filters = SearchFilters::default()
            .in_category(ClassCategory::Photography)
            .this_weekend()
            .at_least_rated(4.5);

        let json = serde_json::to_string(&filters).unwrap();
        let back: SearchFilters = serde_json::from_str(&json).unwrap();
        assert_eq!(filters, back);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let filters: SearchFilters = serde_json::from_str(r#"{"minRating": 4.0}"#).unwrap();
        assert_eq!(filters.min_rating, 4.0);
        assert!(filters.include_free);
        assert_eq!(filters.max_price, DEFAULT_MAX_PRICE);
    }
}
