use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use bytes::Bytes;

use super::{CacheKey, ResponseCache};
use crate::error::{Error, Result};

/// In-memory cache bounded by the total size of stored bodies
///
/// When a store would exceed the capacity, the oldest insertions are evicted first.
/// A body larger than the whole capacity is not stored.
#[derive(Debug)]
pub struct MemoryCache {
    capacity_bytes: u64,
    inner: Mutex<MemoryInner>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    entries: HashMap<CacheKey, Bytes>,
    order: VecDeque<CacheKey>,
    size_bytes: u64,
}

impl MemoryInner {
    fn remove(&mut self, key: &CacheKey) {
        if let Some(old) = self.entries.remove(key) {
            self.size_bytes -= old.len() as u64;
            self.order.retain(|k| k != key);
        }
    }
}

impl MemoryCache {
    /// Empty cache holding at most `capacity_bytes` of bodies
    pub fn new(capacity_bytes: u64) -> Self {
        Self {
            capacity_bytes,
            inner: Mutex::new(MemoryInner::default()),
        }
    }

    /// Number of cached bodies
    pub fn len(&self) -> usize {
        self.inner.lock().map(|inner| inner.entries.len()).unwrap_or(0)
    }

    /// Whether nothing is cached
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total size of cached bodies
    pub fn size_bytes(&self) -> u64 {
        self.inner.lock().map(|inner| inner.size_bytes).unwrap_or(0)
    }
}

impl ResponseCache for MemoryCache {
    fn lookup(&self, key: &CacheKey) -> Result<Option<Bytes>> {
        let inner = self
            .inner
            .lock()
            .map_err(|e| Error::Cache(format!("memory cache lock poisoned: {e}")))?;
        Ok(inner.entries.get(key).cloned())
    }

    fn store(&self, key: &CacheKey, body: Bytes) -> Result<()> {
        let len = body.len() as u64;
        let mut inner = self
            .inner
            .lock()
            .map_err(|e| Error::Cache(format!("memory cache lock poisoned: {e}")))?;

        inner.remove(key);
        if len > self.capacity_bytes {
            tracing::debug!(key = %key, size = len, "Response too large for memory cache");
            return Ok(());
        }

        while inner.size_bytes + len > self.capacity_bytes {
            let Some(oldest) = inner.order.pop_front() else {
                break;
            };
            if let Some(evicted) = inner.entries.remove(&oldest) {
                inner.size_bytes -= evicted.len() as u64;
                tracing::trace!(key = %oldest, "Evicted from memory cache");
            }
        }

        inner.size_bytes += len;
        inner.order.push_back(key.clone());
        inner.entries.insert(key.clone(), body);
        Ok(())
    }
}
