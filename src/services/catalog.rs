use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::core::distance::calculate_bounding_box;
use crate::core::engine::CatalogSnapshot;
use crate::models::{ClassSession, Coordinate, Instructor, Venue};

/// Errors that can occur when talking to the catalog API
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Table names exposed by the catalog API
#[derive(Debug, Clone)]
pub struct CatalogTables {
    pub classes: String,
    pub instructors: String,
    pub venues: String,
}

/// Entity catalog client.
///
/// Fetches immutable snapshots of classes, instructors, and venues from the
/// marketplace backend (a PostgREST-style REST API). The search core never
/// talks to this client directly; handlers fetch a snapshot and hand it over.
pub struct CatalogClient {
    base_url: String,
    api_key: String,
    client: Client,
    tables: CatalogTables,
}

impl CatalogClient {
    pub fn new(base_url: String, api_key: String, tables: CatalogTables) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url,
            api_key,
            client,
            tables,
        }
    }

    async fn fetch_rows(&self, table: &str, filter: &str) -> Result<Vec<Value>, CatalogError> {
        let url = format!(
            "{}/rest/v1/{}?select=*{}",
            self.base_url.trim_end_matches('/'),
            table,
            filter
        );

        tracing::debug!("Fetching catalog rows from: {}", url);

        let response = self
            .client
            .get(&url)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(CatalogError::ApiError(format!(
                "Failed to fetch {}: {}",
                table,
                response.status()
            )));
        }

        let json: Value = response.json().await?;

        json.as_array()
            .cloned()
            .ok_or_else(|| CatalogError::InvalidResponse("Expected a JSON array".into()))
    }

    /// Fetch every class session
    pub async fn fetch_classes(&self) -> Result<Vec<ClassSession>, CatalogError> {
        let rows = self.fetch_rows(&self.tables.classes, "").await?;
        Ok(decode_rows(rows, "class"))
    }

    /// Fetch classes whose venue lies inside a bounding box around a location.
    ///
    /// The box is a cheap prefilter; exact great-circle checks happen in the
    /// search core's distance facet.
    pub async fn fetch_classes_near(
        &self,
        location: Coordinate,
        radius_km: f64,
    ) -> Result<Vec<ClassSession>, CatalogError> {
        let bbox = calculate_bounding_box(location.latitude, location.longitude, radius_km);
        let filter = format!(
            "&latitude=gte.{}&latitude=lte.{}&longitude=gte.{}&longitude=lte.{}",
            bbox.min_lat, bbox.max_lat, bbox.min_lon, bbox.max_lon
        );

        let rows = self.fetch_rows(&self.tables.classes, &filter).await?;
        Ok(decode_rows(rows, "class"))
    }

    /// Fetch every instructor profile
    pub async fn fetch_instructors(&self) -> Result<Vec<Instructor>, CatalogError> {
        let rows = self.fetch_rows(&self.tables.instructors, "").await?;
        Ok(decode_rows(rows, "instructor"))
    }

    /// Fetch every venue
    pub async fn fetch_venues(&self) -> Result<Vec<Venue>, CatalogError> {
        let rows = self.fetch_rows(&self.tables.venues, "").await?;
        Ok(decode_rows(rows, "venue"))
    }

    /// Fetch the full working set for one search invocation.
    ///
    /// With a location and radius the class list is prefiltered upstream;
    /// instructors and venues are small enough to fetch whole.
    pub async fn fetch_snapshot(
        &self,
        location: Option<Coordinate>,
        radius_km: Option<f64>,
    ) -> Result<CatalogSnapshot, CatalogError> {
        let classes = match (location, radius_km) {
            (Some(location), Some(radius_km)) => {
                self.fetch_classes_near(location, radius_km).await?
            }
            _ => self.fetch_classes().await?,
        };

        let instructors = self.fetch_instructors().await?;
        let venues = self.fetch_venues().await?;

        tracing::debug!(
            "Catalog snapshot: {} classes, {} instructors, {} venues",
            classes.len(),
            instructors.len(),
            venues.len()
        );

        Ok(CatalogSnapshot {
            classes,
            instructors,
            venues,
        })
    }
}

/// Decode rows leniently: a malformed row is logged and skipped rather than
/// failing the whole snapshot.
fn decode_rows<T: DeserializeOwned>(rows: Vec<Value>, kind: &str) -> Vec<T> {
    let total = rows.len();
    let decoded: Vec<T> = rows
        .into_iter()
        .filter_map(|row| match serde_json::from_value(row) {
            Ok(entity) => Some(entity),
            Err(e) => {
                tracing::warn!("Skipping malformed {} row: {}", kind, e);
                None
            }
        })
        .collect();

    if decoded.len() < total {
        tracing::warn!("Decoded {}/{} {} rows", decoded.len(), total, kind);
    }

    decoded
}
