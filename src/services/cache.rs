use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::SearchParameters;

/// Errors that can occur with cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Cache miss: {0}")]
    CacheMiss(String),
}

/// In-process TTL cache for search responses.
///
/// Entries are stored as serialized bytes and expire after the configured
/// time-to-live, mirroring the short-lived result cache the search flow keeps
/// between repeated identical invocations.
pub struct SearchCache {
    inner: moka::future::Cache<String, Vec<u8>>,
}

impl SearchCache {
    pub fn new(max_entries: u64, ttl_secs: u64) -> Self {
        let inner = moka::future::CacheBuilder::new(max_entries)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { inner }
    }

    /// Get a cached value
    pub async fn get<T>(&self, key: &str) -> Result<T, CacheError>
    where
        T: for<'de> Deserialize<'de>,
    {
        match self.inner.get(key).await {
            Some(bytes) => {
                tracing::trace!("Cache hit: {}", key);
                Ok(serde_json::from_slice(&bytes)?)
            }
            None => {
                tracing::trace!("Cache miss: {}", key);
                Err(CacheError::CacheMiss(key.to_string()))
            }
        }
    }

    /// Set a cached value
    pub async fn set<T>(&self, key: &str, value: &T) -> Result<(), CacheError>
    where
        T: Serialize,
    {
        let bytes = serde_json::to_vec(value)?;
        self.inner.insert(key.to_string(), bytes).await;
        tracing::trace!("Cache set: {}", key);
        Ok(())
    }

    /// Drop every cached entry
    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entry_count: self.inner.entry_count(),
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub entry_count: u64,
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Deterministic fingerprint of one search invocation.
    ///
    /// Filter sets serialize in sorted order (BTreeSet), so equal parameter
    /// values always produce the same key.
    pub fn search(params: &SearchParameters) -> String {
        let canonical = serde_json::to_string(params).unwrap_or_default();
        let mut hasher = DefaultHasher::new();
        canonical.hash(&mut hasher);
        format!("search:{:016x}", hasher.finish())
    }
}
