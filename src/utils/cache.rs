//! Caching utilities for rsig

use crate::core::player_source::PlayerSource;
use moka::future::Cache;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Default lifetime of a cached player source (10 minutes)
pub const DEFAULT_PLAYER_SOURCE_TTL: Duration = Duration::from_secs(600);

/// Default number of script versions kept
pub const DEFAULT_PLAYER_SOURCE_CAPACITY: u64 = 16;

/// High-performance async cache using moka
pub type AsyncCache<K, V> = Cache<K, V>;

/// Create a new async cache with TTL and max capacity
pub fn new_async_cache_with_capacity<K, V>(ttl: Duration, max_capacity: u64) -> AsyncCache<K, V>
where
    K: std::hash::Hash + Eq + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    Cache::builder()
        .time_to_live(ttl)
        .max_capacity(max_capacity)
        .build()
}

/// Player sources keyed by script version.
///
/// Entries are shared `Arc`s and are only ever replaced, never modified.
#[derive(Clone)]
pub struct PlayerSourceCache {
    sources: AsyncCache<String, Arc<PlayerSource>>,
}

impl PlayerSourceCache {
    /// Create a cache with default TTL and capacity
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_PLAYER_SOURCE_TTL, DEFAULT_PLAYER_SOURCE_CAPACITY)
    }

    /// Create a cache with custom TTL and capacity
    pub fn with_limits(ttl: Duration, max_capacity: u64) -> Self {
        Self {
            sources: new_async_cache_with_capacity(ttl, max_capacity),
        }
    }

    /// Get the player source for a version
    pub async fn get(&self, version: &str) -> Option<Arc<PlayerSource>> {
        self.sources.get(version).await
    }

    /// Get the player source for a version, building it at most once.
    ///
    /// Concurrent callers for the same version wait for a single `init`.
    pub async fn get_or_try_insert_with<F, E>(
        &self,
        version: &str,
        init: F,
    ) -> Result<Arc<PlayerSource>, Arc<E>>
    where
        F: std::future::Future<Output = Result<Arc<PlayerSource>, E>>,
        E: Send + Sync + 'static,
    {
        self.sources.try_get_with(version.to_string(), init).await
    }

    /// Drop the entry for a version
    pub async fn invalidate(&self, version: &str) {
        self.sources.invalidate(version).await;
    }

    /// Drop all entries
    pub fn clear(&self) {
        self.sources.invalidate_all();
    }

    /// Get cache statistics
    pub async fn stats(&self) -> CacheStats {
        self.sources.run_pending_tasks().await;
        CacheStats {
            player_source_entries: self.sources.entry_count(),
        }
    }
}

impl Default for PlayerSourceCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub player_source_entries: u64,
}
