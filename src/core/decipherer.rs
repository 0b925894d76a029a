//! Cached signature decipherer

use crate::core::player_source::PlayerSource;
use crate::error::RsigError;
use crate::platform::parser::PlayerSourceParser;
use crate::utils::cache::{CacheStats, PlayerSourceCache};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Signature decipherer.
///
/// Parses each script version at most once and shares the resulting
/// [`PlayerSource`] between all signatures of that version.
pub struct Decipherer {
    parser: PlayerSourceParser,
    cache: PlayerSourceCache,
}

impl Decipherer {
    /// Create a decipherer with a default parser and cache
    pub fn new() -> Self {
        Self {
            parser: PlayerSourceParser::new(),
            cache: PlayerSourceCache::new(),
        }
    }

    /// Use a configured parser
    pub fn with_parser(mut self, parser: PlayerSourceParser) -> Self {
        self.parser = parser;
        self
    }

    /// Set cache TTL and capacity
    pub fn with_cache_limits(mut self, ttl: Duration, max_capacity: u64) -> Self {
        self.cache = PlayerSourceCache::with_limits(ttl, max_capacity);
        self
    }

    /// Get the player source for `version`, parsing `script` on a cache miss
    pub async fn player_source(
        &self,
        version: &str,
        script: &str,
    ) -> Result<Arc<PlayerSource>, RsigError> {
        if let Some(cached) = self.cache.get(version).await {
            debug!("Player source cache hit for {}", version);
            return Ok(cached);
        }

        debug!("Player source cache miss for {}", version);
        self.cache
            .get_or_try_insert_with(version, async {
                self.parser.parse(script).map(Arc::new)
            })
            .await
            .map_err(RsigError::Shared)
    }

    /// Decipher a signature with the program of the given script version
    pub async fn decipher(
        &self,
        version: &str,
        script: &str,
        signature: &str,
    ) -> Result<String, RsigError> {
        debug!("Deciphering signature: {}", signature);
        let source = self.player_source(version, script).await?;
        source.decipher(signature)
    }

    /// Forget the player source of a version, e.g. after a script update
    pub async fn invalidate(&self, version: &str) {
        self.cache.invalidate(version).await;
    }

    /// Clear caches
    pub fn clear(&self) {
        self.cache.clear();
    }

    /// Get cache statistics
    pub async fn stats(&self) -> CacheStats {
        self.cache.stats().await
    }
}

impl Default for Decipherer {
    fn default() -> Self {
        Self::new()
    }
}
