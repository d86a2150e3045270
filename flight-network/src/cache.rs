//! Caching layer for route query results.
//!
//! Searches are pure functions of (snapshot, query), so results are cached
//! under a key that includes the snapshot generation. A rebuild makes every
//! older entry unreachable; the TTL and capacity bound how long such entries
//! linger before moka evicts them.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::domain::{AirportCode, Itinerary};
use crate::planner::{CostFunction, RouteConfig, RouteError};

/// Which search produced a cached result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    /// Fewest flights.
    Route,
    /// Lowest total cost under a built-in cost function.
    MinimumCost(CostFunction),
    /// Ranked alternatives.
    Routes,
}

/// Cache key: one query against one snapshot generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RouteKey {
    pub generation: u64,
    pub kind: QueryKind,
    pub origin: AirportCode,
    pub destination: AirportCode,
    pub max_hops: usize,
    pub min_connection_mins: i64,
    pub max_results: usize,
}

impl RouteKey {
    pub fn new(
        generation: u64,
        kind: QueryKind,
        origin: AirportCode,
        destination: AirportCode,
        config: &RouteConfig,
    ) -> Self {
        Self {
            generation,
            kind,
            origin,
            destination,
            max_hops: config.max_hops,
            min_connection_mins: config.min_connection_mins,
            max_results: config.max_results,
        }
    }
}

/// Cached result: the itineraries found, empty when there was no route.
pub type RouteEntry = Arc<Vec<Itinerary>>;

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60),
            max_capacity: 10_000,
        }
    }
}

/// Cache for route query results.
#[derive(Clone)]
pub struct RouteCache {
    results: MokaCache<RouteKey, RouteEntry>,
}

impl RouteCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let results = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { results }
    }

    /// Get a cached result.
    pub async fn get(&self, key: &RouteKey) -> Option<RouteEntry> {
        self.results.get(key).await
    }

    /// Insert a result into the cache.
    pub async fn insert(&self, key: RouteKey, entry: RouteEntry) {
        self.results.insert(key, entry).await;
    }

    /// Return the cached result for `key`, running `search` on a miss.
    ///
    /// Errors are returned to the caller and never cached.
    pub async fn get_or_search<F>(&self, key: RouteKey, search: F) -> Result<RouteEntry, RouteError>
    where
        F: FnOnce() -> Result<Vec<Itinerary>, RouteError>,
    {
        if let Some(cached) = self.get(&key).await {
            return Ok(cached);
        }

        let entry = Arc::new(search()?);
        self.insert(key, entry.clone()).await;

        Ok(entry)
    }

    /// Get cache statistics (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.results.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.results.invalidate_all();
    }
}

impl std::fmt::Debug for RouteCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteCache")
            .field("entries", &self.results.entry_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn code(s: &str) -> AirportCode {
        AirportCode::parse(s).unwrap()
    }

    fn key(generation: u64, kind: QueryKind) -> RouteKey {
        RouteKey::new(
            generation,
            kind,
            code("EGLL"),
            code("KJFK"),
            &RouteConfig::default(),
        )
    }

    #[test]
    fn cache_config_default() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(60));
        assert_eq!(config.max_capacity, 10_000);
    }

    #[test]
    fn key_distinguishes_queries() {
        let config = RouteConfig::default();
        let base = key(1, QueryKind::Route);

        assert_ne!(base, key(2, QueryKind::Route));
        assert_ne!(base, key(1, QueryKind::Routes));
        assert_ne!(
            key(1, QueryKind::MinimumCost(CostFunction::Hops)),
            key(1, QueryKind::MinimumCost(CostFunction::Duration))
        );
        assert_ne!(
            base,
            RouteKey::new(1, QueryKind::Route, code("EGLL"), code("KJFK"), &config.with_max_hops(2))
        );
    }

    #[tokio::test]
    async fn cache_insert_and_get() {
        let cache = RouteCache::new(&CacheConfig::default());
        let k = key(1, QueryKind::Route);

        assert!(cache.get(&k).await.is_none());

        cache.insert(k, Arc::new(Vec::new())).await;

        let cached = cache.get(&k).await;
        assert!(cached.is_some());
        assert!(cached.unwrap().is_empty());
    }

    #[tokio::test]
    async fn get_or_search_runs_search_once() {
        let cache = RouteCache::new(&CacheConfig::default());
        let k = key(1, QueryKind::Routes);
        let calls = Cell::new(0);

        for _ in 0..3 {
            let entry = cache
                .get_or_search(k, || {
                    calls.set(calls.get() + 1);
                    Ok(Vec::new())
                })
                .await
                .unwrap();
            assert!(entry.is_empty());
        }

        assert_eq!(calls.get(), 1);
    }

    #[tokio::test]
    async fn errors_are_not_cached() {
        let cache = RouteCache::new(&CacheConfig::default());
        let k = key(1, QueryKind::Route);

        let err = cache
            .get_or_search(k, || Err(RouteError::ZeroHops))
            .await
            .unwrap_err();
        assert_eq!(err, RouteError::ZeroHops);
        assert!(cache.get(&k).await.is_none());
    }

    #[tokio::test]
    async fn cache_invalidate_all() {
        let cache = RouteCache::new(&CacheConfig::default());
        let k = key(1, QueryKind::Route);

        cache.insert(k, Arc::new(Vec::new())).await;
        assert!(cache.get(&k).await.is_some());

        cache.invalidate_all();

        assert!(cache.get(&k).await.is_none());
    }
}
