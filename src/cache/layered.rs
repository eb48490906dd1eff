use bytes::Bytes;

use super::{CacheKey, DiskCache, MemoryCache, ResponseCache};
use crate::error::Result;

/// Memory cache in front of a disk cache
///
/// Stores go to both layers. A lookup that misses memory but hits disk copies the
/// body into memory.
#[derive(Debug)]
pub struct LayeredCache {
    memory: MemoryCache,
    disk: DiskCache,
}

impl LayeredCache {
    /// Combine the two layers
    pub fn new(memory: MemoryCache, disk: DiskCache) -> Self {
        Self { memory, disk }
    }
}

impl ResponseCache for LayeredCache {
    fn lookup(&self, key: &CacheKey) -> Result<Option<Bytes>> {
        if let Some(body) = self.memory.lookup(key)? {
            return Ok(Some(body));
        }
        let Some(body) = self.disk.lookup(key)? else {
            return Ok(None);
        };
        tracing::trace!(key = %key, "Promoting disk cache hit to memory");
        self.memory.store(key, body.clone())?;
        Ok(Some(body))
    }

    fn store(&self, key: &CacheKey, body: Bytes) -> Result<()> {
        self.memory.store(key, body.clone())?;
        self.disk.store(key, body)
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn disk_hits_are_promoted() {
        let dir = TempDir::new().unwrap();
        let key = CacheKey::new("https://cms.test/entries?skip=0");

        DiskCache::new(dir.path(), 1024)
            .unwrap()
            .store(&key, Bytes::from_static(b"from disk"))
            .unwrap();

        let layered = LayeredCache::new(
            MemoryCache::new(1024),
            DiskCache::new(dir.path(), 1024).unwrap(),
        );
        assert!(layered.memory.is_empty());

        assert_eq!(
            layered.lookup(&key).unwrap(),
            Some(Bytes::from_static(b"from disk"))
        );
        assert_eq!(layered.memory.len(), 1);
    }

    #[test]
    fn store_writes_both_layers() {
        let dir = TempDir::new().unwrap();
        let key = CacheKey::new("https://cms.test/entries?skip=100");
        let layered = LayeredCache::new(
            MemoryCache::new(1024),
            DiskCache::new(dir.path(), 1024).unwrap(),
        );

        layered.store(&key, Bytes::from_static(b"both")).unwrap();

        assert!(layered.memory.lookup(&key).unwrap().is_some());
        assert!(layered.disk.lookup(&key).unwrap().is_some());
    }
}
