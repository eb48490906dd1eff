//! Response caches
//!
//! Raw response bodies keyed by request URL. The fetch pipeline only reads from a
//! cache; the HTTP transport writes successful responses into it.
//!
//! - [`MemoryCache`] - bounded in-process cache
//! - [`DiskCache`] - bounded directory of files, survives restarts
//! - [`LayeredCache`] - memory in front of disk

mod disk;
mod layered;
mod memory;

pub use disk::DiskCache;
pub use layered::LayeredCache;
pub use memory::MemoryCache;

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;

use crate::config::CacheConfig;
use crate::error::Result;

/// Identifies one cached response
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// Key for a request URL
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// The key as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Storage for raw response bodies
///
/// Implementations must be safe for concurrent use; reads are expected to be fast
/// enough to call from async code.
pub trait ResponseCache: Send + Sync {
    /// Cached body for `key`, if any
    fn lookup(&self, key: &CacheKey) -> Result<Option<Bytes>>;

    /// Remember `body` as the response for `key`
    fn store(&self, key: &CacheKey, body: Bytes) -> Result<()>;
}

/// Build the cache described by `config`
///
/// Returns `None` when caching is disabled. With a `disk_dir` the result is a
/// [`LayeredCache`], otherwise a plain [`MemoryCache`].
pub fn from_config(config: &CacheConfig) -> Result<Option<Arc<dyn ResponseCache>>> {
    if !config.enabled {
        return Ok(None);
    }
    let memory = MemoryCache::new(config.memory_capacity_bytes);
    let cache: Arc<dyn ResponseCache> = match &config.disk_dir {
        Some(dir) => Arc::new(LayeredCache::new(
            memory,
            DiskCache::new(dir, config.disk_capacity_bytes)?,
        )),
        None => Arc::new(memory),
    };
    Ok(Some(cache))
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_cache_builds_nothing() {
        let config = CacheConfig {
            enabled: false,
            ..CacheConfig::default()
        };
        assert!(from_config(&config).unwrap().is_none());
    }

    #[test]
    fn configured_cache_round_trips_a_body() {
        let dir = tempfile::tempdir().unwrap();
        let config = CacheConfig {
            disk_dir: Some(dir.path().to_path_buf()),
            ..CacheConfig::default()
        };
        let cache = from_config(&config).unwrap().unwrap();
        let key = CacheKey::new("https://cms.test/entries?limit=100&skip=0");

        cache.store(&key, Bytes::from_static(b"{}")).unwrap();

        assert_eq!(cache.lookup(&key).unwrap(), Some(Bytes::from_static(b"{}")));
    }
}
