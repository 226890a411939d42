use serde::{Deserialize, Serialize};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;

use crate::models::SearchFilters;

/// Errors that can occur when interacting with the history store
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// One recorded search
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHistoryEntry {
    pub user_id: String,
    pub query: String,
    pub result_count: i64,
    pub searched_at: chrono::DateTime<chrono::Utc>,
}

/// A named query + filter bundle a user stored for reuse
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedSearch {
    pub id: uuid::Uuid,
    pub user_id: String,
    pub name: String,
    pub query: String,
    pub filters: SearchFilters,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// An aggregated query with its usage count
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopularSearch {
    pub query: String,
    pub search_count: i64,
}

/// PostgreSQL-backed store for search history and saved searches.
///
/// The search core itself keeps no state between invocations; this store is
/// the collaborator that remembers what users searched for, powering recent
/// searches, popular-search aggregation, and saved searches.
pub struct HistoryStore {
    pool: PgPool,
}

impl HistoryStore {
    /// Create a new store from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, HistoryError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new store from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
    ) -> Result<Self, HistoryError> {
        tracing::info!("Connecting to PostgreSQL history store");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
        )
        .await
    }

    /// Record an executed search.
    ///
    /// Uses INSERT ... ON CONFLICT so repeating a query refreshes its
    /// timestamp and result count instead of duplicating the row.
    pub async fn record_search(
        &self,
        user_id: &str,
        query: &str,
        result_count: i64,
    ) -> Result<(), HistoryError> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Err(HistoryError::InvalidInput("Empty query".into()));
        }

        let statement = r#"
            INSERT INTO search_history (user_id, query, result_count, searched_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (user_id, query)
            DO UPDATE SET
                result_count = EXCLUDED.result_count,
                searched_at = EXCLUDED.searched_at
        "#;

        sqlx::query(statement)
            .bind(user_id)
            .bind(trimmed)
            .bind(result_count)
            .execute(&self.pool)
            .await?;

        tracing::debug!("Recorded search for {}: {:?}", user_id, trimmed);

        Ok(())
    }

    /// Most recent searches for a user, newest first
    pub async fn recent_searches(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<SearchHistoryEntry>, HistoryError> {
        let statement = r#"
            SELECT user_id, query, result_count, searched_at
            FROM search_history
            WHERE user_id = $1
            ORDER BY searched_at DESC
            LIMIT $2
        "#;

        let rows = sqlx::query(statement)
            .bind(user_id)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;

        let entries = rows
            .iter()
            .map(|row| SearchHistoryEntry {
                user_id: row.get("user_id"),
                query: row.get("query"),
                result_count: row.get("result_count"),
                searched_at: row.get("searched_at"),
            })
            .collect();

        Ok(entries)
    }

    /// Remove one remembered query for a user
    pub async fn remove_search(&self, user_id: &str, query: &str) -> Result<bool, HistoryError> {
        let statement = r#"
            DELETE FROM search_history
            WHERE user_id = $1 AND query = $2
        "#;

        let result = sqlx::query(statement)
            .bind(user_id)
            .bind(query)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Clear a user's entire search history
    pub async fn clear_history(&self, user_id: &str) -> Result<u64, HistoryError> {
        let statement = r#"
            DELETE FROM search_history
            WHERE user_id = $1
        "#;

        let result = sqlx::query(statement).bind(user_id).execute(&self.pool).await?;

        tracing::info!(
            "Cleared {} history entries for user {}",
            result.rows_affected(),
            user_id
        );

        Ok(result.rows_affected())
    }

    /// Most frequently searched queries across all users
    pub async fn popular_searches(&self, limit: usize) -> Result<Vec<PopularSearch>, HistoryError> {
        let statement = r#"
            SELECT query, COUNT(*) as search_count
            FROM search_history
            GROUP BY query
            ORDER BY search_count DESC, query ASC
            LIMIT $1
        "#;

        let rows = sqlx::query(statement)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;

        let popular = rows
            .iter()
            .map(|row| PopularSearch {
                query: row.get("query"),
                search_count: row.get("search_count"),
            })
            .collect();

        Ok(popular)
    }

    /// Store a named search; filters persist as JSONB
    pub async fn save_search(
        &self,
        user_id: &str,
        name: &str,
        query: &str,
        filters: &SearchFilters,
    ) -> Result<uuid::Uuid, HistoryError> {
        let filters_json = serde_json::to_value(filters)
            .map_err(|e| HistoryError::InvalidInput(format!("Unserializable filters: {}", e)))?;

        let statement = r#"
            INSERT INTO saved_searches (id, user_id, name, query, filters, created_at)
            VALUES ($1, $2, $3, $4, $5, NOW())
        "#;

        let id = uuid::Uuid::new_v4();

        sqlx::query(statement)
            .bind(id)
            .bind(user_id)
            .bind(name)
            .bind(query)
            .bind(filters_json)
            .execute(&self.pool)
            .await?;

        tracing::debug!("Saved search {:?} for user {}", name, user_id);

        Ok(id)
    }

    /// Saved searches for a user, newest first
    pub async fn saved_searches(&self, user_id: &str) -> Result<Vec<SavedSearch>, HistoryError> {
        let statement = r#"
            SELECT id, user_id, name, query, filters, created_at
            FROM saved_searches
            WHERE user_id = $1
            ORDER BY created_at DESC
        "#;

        let rows = sqlx::query(statement)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        let saved = rows
            .iter()
            .map(|row| {
                let filters_json: serde_json::Value = row.get("filters");
                SavedSearch {
                    id: row.get("id"),
                    user_id: row.get("user_id"),
                    name: row.get("name"),
                    query: row.get("query"),
                    // A saved row with unreadable filters degrades to the
                    // match-everything specification rather than failing.
                    filters: serde_json::from_value(filters_json).unwrap_or_default(),
                    created_at: row.get("created_at"),
                }
            })
            .collect();

        Ok(saved)
    }

    /// Delete one saved search owned by the user
    pub async fn remove_saved(
        &self,
        user_id: &str,
        id: uuid::Uuid,
    ) -> Result<bool, HistoryError> {
        let statement = r#"
            DELETE FROM saved_searches
            WHERE user_id = $1 AND id = $2
        "#;

        let result = sqlx::query(statement)
            .bind(user_id)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, HistoryError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saved_search_serialization_shape() {
        let saved = SavedSearch {
            id: uuid::Uuid::nil(),
            user_id: "u1".to_string(),
            name: "Weekend pottery".to_string(),
            query: "pottery".to_string(),
            filters: SearchFilters::default().this_weekend(),
            created_at: chrono::Utc::now(),
        };

        let json = serde_json::to_value(&saved).unwrap();
        assert_eq!(json["userId"], "u1");
        assert_eq!(json["filters"]["dateRange"], "thisWeek");
    }
}
