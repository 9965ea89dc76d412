//! Cache trait for storing fetched indicator tables.
//!
//! This module defines the [`QueryCache`] trait that provides a unified
//! interface for caching query results keyed by a normalized [`QueryKey`].
//! The cache is an explicit object owned by the caller, so tests can reset it
//! and concurrent callers can share it behind their own synchronization.

use async_trait::async_trait;
use polars::prelude::DataFrame;
use std::time::Duration;

use crate::{error::Result, types::QueryKey};

/// Trait for caching indicator tables.
///
/// Implementations must hand out independent copies: mutating a table
/// returned by [`get`](Self::get) never changes the cached entry.
#[async_trait]
pub trait QueryCache: Send + Sync {
    /// Retrieves a cached table.
    ///
    /// Returns `Ok(Some(df))` if cached data exists, `Ok(None)` if not cached.
    async fn get(&self, key: &QueryKey) -> Result<Option<DataFrame>>;

    /// Stores a copy of a table under `key`, replacing any previous entry.
    async fn put(&self, key: &QueryKey, table: &DataFrame) -> Result<()>;

    /// Returns the number of cached entries.
    async fn len(&self) -> Result<usize>;

    /// Removes cache entries older than the specified TTL.
    ///
    /// Returns the number of entries invalidated.
    async fn invalidate_stale(&self, ttl: Duration) -> Result<usize>;

    /// Clears all cached data.
    async fn clear(&self) -> Result<()>;
}
