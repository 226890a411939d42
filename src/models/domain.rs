use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in degrees.
///
/// Deliberately a plain value type so the search core never depends on a
/// platform location framework.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// Class categories offered on the marketplace
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassCategory {
    Arts,
    Cooking,
    Fitness,
    Music,
    Photography,
    Technology,
    Language,
    Business,
    Outdoor,
    Other,
}

impl ClassCategory {
    pub const ALL: [ClassCategory; 10] = [
        ClassCategory::Arts,
        ClassCategory::Cooking,
        ClassCategory::Fitness,
        ClassCategory::Music,
        ClassCategory::Photography,
        ClassCategory::Technology,
        ClassCategory::Language,
        ClassCategory::Business,
        ClassCategory::Outdoor,
        ClassCategory::Other,
    ];

    /// Human-readable label shown in result subtitles and suggestions
    pub fn label(&self) -> &'static str {
        match self {
            ClassCategory::Arts => "Arts & Crafts",
            ClassCategory::Cooking => "Cooking & Baking",
            ClassCategory::Fitness => "Fitness & Wellness",
            ClassCategory::Music => "Music & Performance",
            ClassCategory::Photography => "Photography",
            ClassCategory::Technology => "Technology",
            ClassCategory::Language => "Language",
            ClassCategory::Business => "Business & Professional",
            ClassCategory::Outdoor => "Outdoor & Adventure",
            ClassCategory::Other => "Other",
        }
    }
}

/// Difficulty levels a class can be taught at
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyLevel {
    Beginner,
    Intermediate,
    Advanced,
    AllLevels,
}

impl DifficultyLevel {
    pub fn label(&self) -> &'static str {
        match self {
            DifficultyLevel::Beginner => "Beginner",
            DifficultyLevel::Intermediate => "Intermediate",
            DifficultyLevel::Advanced => "Advanced",
            DifficultyLevel::AllLevels => "All Levels",
        }
    }
}

/// A scheduled class session at a venue
///
/// Snapshots are produced by the catalog service and are read-only to the
/// search core: the core filters, wraps, and orders them but never mutates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassSession {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: ClassCategory,
    pub difficulty: DifficultyLevel,
    pub price: f64,
    pub start_date: chrono::DateTime<chrono::Utc>,
    pub end_date: chrono::DateTime<chrono::Utc>,
    pub duration_minutes: u32,
    pub max_participants: u32,
    pub enrolled_count: u32,
    #[serde(default)]
    pub average_rating: f64,
    #[serde(default)]
    pub total_reviews: u32,
    pub instructor_id: String,
    pub instructor_name: String,
    pub venue_id: String,
    pub venue_name: String,
    #[serde(default)]
    pub neighborhood: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub is_online: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ClassSession {
    /// Location of the venue the session is held at
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    /// Remaining bookable spots
    pub fn spots_available(&self) -> u32 {
        self.max_participants.saturating_sub(self.enrolled_count)
    }
}

/// An instructor teaching on the marketplace
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instructor {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub specialties: Vec<String>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub total_reviews: u32,
    #[serde(default)]
    pub years_of_experience: u32,
}

/// A venue hosting class sessions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Venue {
    pub id: String,
    pub name: String,
    pub address: String,
    pub city: String,
    #[serde(default)]
    pub neighborhood: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub parking_info: Option<String>,
    #[serde(default)]
    pub accessibility_info: Option<String>,
    #[serde(default)]
    pub average_rating: f64,
    #[serde(default)]
    pub total_reviews: u32,
}

impl Venue {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_labels_are_unique() {
        let labels: std::collections::BTreeSet<_> =
            ClassCategory::ALL.iter().map(|c| c.label()).collect();
        assert_eq!(labels.len(), ClassCategory::ALL.len());
    }

    #[test]
    fn test_spots_available_never_underflows() {
        let class = ClassSession {
            id: "c1".to_string(),
            title: "Overbooked".to_string(),
            description: String::new(),
            category: ClassCategory::Arts,
            difficulty: DifficultyLevel::Beginner,
            price: 25.0,
            start_date: chrono::Utc::now(),
            end_date: chrono::Utc::now(),
            duration_minutes: 90,
            max_participants: 10,
            enrolled_count: 12,
            average_rating: 4.5,
            total_reviews: 8,
            instructor_id: "i1".to_string(),
            instructor_name: "Sarah Chen".to_string(),
            venue_id: "v1".to_string(),
            venue_name: "Creative Studio".to_string(),
            neighborhood: None,
            latitude: 49.2827,
            longitude: -123.1207,
            is_online: false,
            tags: vec![],
        };

        assert_eq!(class.spots_available(), 0);
    }
}
