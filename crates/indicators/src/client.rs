//! Caching query front end over an indicator source.

use std::sync::Arc;

use polars::prelude::DataFrame;
use tracing::{debug, instrument, warn};

use indicators_core::{IndicatorQuery, IndicatorSource, QueryCache, Result};

/// Runs indicator queries against a source, serving repeats from a cache.
///
/// The cache is injected by the caller and owned outside the client, so
/// several clients can share one cache and tests can reset it between runs.
/// Without a cache every query goes to the source.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use indicators::{IndicatorClient, IndicatorQuery, InMemoryCache, WorldBankProvider};
///
/// let client = IndicatorClient::new(Arc::new(WorldBankProvider::new()))
///     .with_cache(Arc::new(InMemoryCache::new()));
///
/// let query = IndicatorQuery::new(["usa", "can"], "NY.GDP.MKTP.CD", 2010, 2020);
/// let first = client.run_query(&query, true).await?;
/// // Served from the cache, no network access
/// let second = client.run_query(&query, true).await?;
/// ```
#[derive(Clone)]
pub struct IndicatorClient {
    source: Arc<dyn IndicatorSource>,
    cache: Option<Arc<dyn QueryCache>>,
}

impl std::fmt::Debug for IndicatorClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndicatorClient")
            .field("source", &self.source.name())
            .field("cache", &self.cache.as_ref().map(|_| "configured"))
            .finish()
    }
}

impl IndicatorClient {
    /// Create a client without a cache.
    #[must_use]
    pub fn new(source: Arc<dyn IndicatorSource>) -> Self {
        Self {
            source,
            cache: None,
        }
    }

    /// Set the cache for this client.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<dyn QueryCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// The configured source.
    #[must_use]
    pub fn source(&self) -> &Arc<dyn IndicatorSource> {
        &self.source
    }

    /// The configured cache, if any.
    #[must_use]
    pub fn cache(&self) -> Option<&Arc<dyn QueryCache>> {
        self.cache.as_ref()
    }

    /// Fetch the table for `query`.
    ///
    /// The query is validated before anything else, so invalid input never
    /// reaches the cache or the network. With `use_cache` set, a cached table
    /// for the same normalized key is returned without contacting the source.
    /// Otherwise the source is queried and a successful result, empty or not,
    /// is stored before being returned. Errors are propagated and leave the
    /// cache untouched.
    #[instrument(skip(self, query), fields(indicator = query.indicator_id()))]
    pub async fn run_query(&self, query: &IndicatorQuery, use_cache: bool) -> Result<DataFrame> {
        query.validate()?;
        let key = query.key();

        if use_cache {
            if let Some(cache) = &self.cache {
                match cache.get(&key).await {
                    Ok(Some(cached)) => {
                        debug!(key = %key, rows = cached.height(), "Serving query from cache");
                        return Ok(cached);
                    }
                    Ok(None) => {}
                    Err(e) => warn!(key = %key, error = %e, "Cache lookup failed, fetching"),
                }
            }
        }

        debug!(source = self.source.name(), key = %key, "Fetching indicator table");
        let table = self.source.fetch_indicator(query).await?;

        // Cache the result
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.put(&key, &table).await {
                warn!(
                    source = self.source.name(),
                    error = %e,
                    "Failed to cache indicator table"
                );
            }
        }

        Ok(table)
    }
}
