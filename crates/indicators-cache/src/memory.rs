//! In-memory cache implementation.

use async_trait::async_trait;
use chrono::Utc;
use indicators_core::{QueryCache, QueryKey, Result};
use polars::prelude::DataFrame;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

/// Cache entry with timestamp for TTL-based invalidation.
#[derive(Debug, Clone)]
struct CacheEntry<T> {
    data: T,
    cached_at: chrono::DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }

    fn is_stale(&self, ttl: Duration) -> bool {
        let age = Utc::now().signed_duration_since(self.cached_at);
        age > chrono::TimeDelta::from_std(ttl).unwrap_or(chrono::TimeDelta::MAX)
    }
}

/// Unbounded in-memory cache of query results.
///
/// Entries live as long as the cache and are only removed by
/// [`clear`](QueryCache::clear) or [`invalidate_stale`](QueryCache::invalidate_stale).
/// Tables are cloned on get and put, so callers never share a cached entry.
#[derive(Debug, Default)]
pub struct InMemoryCache {
    tables: RwLock<HashMap<QueryKey, CacheEntry<DataFrame>>>,
}

impl InMemoryCache {
    /// Create a new empty in-memory cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QueryCache for InMemoryCache {
    #[instrument(skip(self), fields(key = %key))]
    async fn get(&self, key: &QueryKey) -> Result<Option<DataFrame>> {
        let cache = self.tables.read().await;
        match cache.get(key) {
            Some(entry) => {
                debug!("Cache hit for indicator table");
                Ok(Some(entry.data.clone()))
            }
            None => {
                debug!("Cache miss for indicator table");
                Ok(None)
            }
        }
    }

    #[instrument(skip(self, table), fields(key = %key, rows = table.height()))]
    async fn put(&self, key: &QueryKey, table: &DataFrame) -> Result<()> {
        let mut cache = self.tables.write().await;
        cache.insert(key.clone(), CacheEntry::new(table.clone()));
        debug!("Cached {} indicator rows", table.height());
        Ok(())
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.tables.read().await.len())
    }

    #[instrument(skip(self))]
    async fn invalidate_stale(&self, ttl: Duration) -> Result<usize> {
        let mut cache = self.tables.write().await;
        let before = cache.len();
        cache.retain(|_, entry| !entry.is_stale(ttl));
        let removed = before - cache.len();

        if removed > 0 {
            debug!("Invalidated {} stale cache entries", removed);
        }

        Ok(removed)
    }

    #[instrument(skip(self))]
    async fn clear(&self) -> Result<()> {
        self.tables.write().await.clear();
        debug!("Cleared all cache entries");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indicators_core::{IndicatorQuery, IndicatorRecord, records_to_frame};
    use polars::prelude::*;

    fn sample_table() -> DataFrame {
        records_to_frame(&[
            IndicatorRecord {
                country_id: Some("US".into()),
                country_name: Some("United States".into()),
                year: Some(2020),
                value: Some(63_000.0),
                ..Default::default()
            },
            IndicatorRecord {
                country_id: Some("CA".into()),
                country_name: Some("Canada".into()),
                year: Some(2020),
                value: Some(43_000.0),
                ..Default::default()
            },
        ])
        .unwrap()
    }

    #[tokio::test]
    async fn test_memory_cache_roundtrip() {
        let cache = InMemoryCache::new();
        let key = IndicatorQuery::new(["usa", "can"], "NY.GDP.PCAP.CD", 2010, 2020).key();

        // Initially no data
        assert!(cache.get(&key).await.unwrap().is_none());

        cache.put(&key, &sample_table()).await.unwrap();
        assert_eq!(cache.len().await.unwrap(), 1);

        // Same logical query, different order and casing
        let other = IndicatorQuery::new(["CAN", "USA"], "NY.GDP.PCAP.CD", 2010, 2020).key();
        let cached = cache.get(&other).await.unwrap().unwrap();
        assert!(cached.equals_missing(&sample_table()));
    }

    #[tokio::test]
    async fn test_memory_cache_returns_independent_copies() {
        let cache = InMemoryCache::new();
        let key = IndicatorQuery::new(["USA"], "SP.POP.TOTL", 2000, 2001).key();
        cache.put(&key, &sample_table()).await.unwrap();

        let mut first = cache.get(&key).await.unwrap().unwrap();
        first
            .with_column(Column::new("extra".into(), vec![1i32, 2]))
            .unwrap();
        let _ = first.drop_in_place("value").unwrap();

        let second = cache.get(&key).await.unwrap().unwrap();
        assert_eq!(second.width(), 6);
        assert!(second.column("value").is_ok());
        assert!(second.column("extra").is_err());
    }

    #[tokio::test]
    async fn test_memory_cache_invalidate_stale() {
        let cache = InMemoryCache::new();
        let key = IndicatorQuery::new(["USA"], "SP.POP.TOTL", 2000, 2001).key();
        cache.put(&key, &sample_table()).await.unwrap();

        // Nothing is older than an hour
        let removed = cache
            .invalidate_stale(Duration::from_secs(3600))
            .await
            .unwrap();
        assert_eq!(removed, 0);

        tokio::time::sleep(Duration::from_millis(5)).await;
        let removed = cache.invalidate_stale(Duration::ZERO).await.unwrap();
        assert_eq!(removed, 1);
        assert_eq!(cache.len().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_memory_cache_clear() {
        let cache = InMemoryCache::new();
        let key = IndicatorQuery::new(["USA"], "SP.POP.TOTL", 2000, 2001).key();
        cache.put(&key, &sample_table()).await.unwrap();

        // Clear cache
        cache.clear().await.unwrap();

        // Verify data is gone
        assert!(cache.get(&key).await.unwrap().is_none());
        assert_eq!(cache.len().await.unwrap(), 0);
    }
}
