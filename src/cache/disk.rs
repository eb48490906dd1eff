use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use bytes::Bytes;
use sha2::{Digest, Sha256};

use super::{CacheKey, ResponseCache};
use crate::error::{Error, Result};

/// On-disk cache, one file per key
///
/// Files are named after the SHA-256 of the key. After each store the directory is
/// trimmed back under `capacity_bytes`, oldest-modified files first.
#[derive(Debug, Clone)]
pub struct DiskCache {
    dir: PathBuf,
    capacity_bytes: u64,
}

impl DiskCache {
    /// Cache rooted at `dir`, created if missing
    pub fn new(dir: impl AsRef<Path>, capacity_bytes: u64) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir).map_err(|e| {
            Error::Cache(format!(
                "failed to create cache directory {}: {e}",
                dir.display()
            ))
        })?;
        Ok(Self {
            dir,
            capacity_bytes,
        })
    }

    /// Directory holding the cached files
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &CacheKey) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(key.as_str().as_bytes());
        self.dir.join(format!("{:x}", hasher.finalize()))
    }

    fn evict(&self) -> Result<()> {
        let mut files: Vec<(PathBuf, u64, SystemTime)> = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let entry = entry?;
            let metadata = entry.metadata()?;
            if metadata.is_file() {
                let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
                files.push((entry.path(), metadata.len(), modified));
            }
        }

        let mut total: u64 = files.iter().map(|(_, len, _)| len).sum();
        if total <= self.capacity_bytes {
            return Ok(());
        }

        files.sort_by_key(|(_, _, modified)| *modified);
        for (path, len, _) in files {
            if total <= self.capacity_bytes {
                break;
            }
            match std::fs::remove_file(&path) {
                Ok(()) => {
                    total -= len;
                    tracing::trace!(path = %path.display(), "Evicted from disk cache");
                }
                Err(e) if e.kind() == ErrorKind::NotFound => total -= len,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}

impl ResponseCache for DiskCache {
    fn lookup(&self, key: &CacheKey) -> Result<Option<Bytes>> {
        match std::fs::read(self.path_for(key)) {
            Ok(body) => Ok(Some(Bytes::from(body))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn store(&self, key: &CacheKey, body: Bytes) -> Result<()> {
        if body.len() as u64 > self.capacity_bytes {
            tracing::debug!(key = %key, size = body.len(), "Response too large for disk cache");
            return Ok(());
        }
        std::fs::write(self.path_for(key), &body)?;
        self.evict()
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    fn key(n: u32) -> CacheKey {
        CacheKey::new(format!("https://cms.test/entries?skip={n}"))
    }

    #[test]
    fn stores_under_hashed_filename() {
        let dir = TempDir::new().unwrap();
        let cache = DiskCache::new(dir.path(), 1024).unwrap();

        cache.store(&key(0), Bytes::from_static(b"body")).unwrap();

        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names.len(), 1);
        assert_eq!(names[0].len(), 64);
        assert!(names[0].chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(
            cache.lookup(&key(0)).unwrap(),
            Some(Bytes::from_static(b"body"))
        );
    }

    #[test]
    fn missing_key_is_none() {
        let dir = TempDir::new().unwrap();
        let cache = DiskCache::new(dir.path(), 1024).unwrap();
        assert!(cache.lookup(&key(7)).unwrap().is_none());
    }

    #[test]
    fn survives_reopening() {
        let dir = TempDir::new().unwrap();
        DiskCache::new(dir.path(), 1024)
            .unwrap()
            .store(&key(1), Bytes::from_static(b"persisted"))
            .unwrap();

        let reopened = DiskCache::new(dir.path(), 1024).unwrap();
        assert_eq!(
            reopened.lookup(&key(1)).unwrap(),
            Some(Bytes::from_static(b"persisted"))
        );
    }

    #[test]
    fn evicts_oldest_modified_when_over_capacity() {
        let dir = TempDir::new().unwrap();
        let cache = DiskCache::new(dir.path(), 25).unwrap();

        cache.store(&key(0), Bytes::from(vec![0u8; 10])).unwrap();
        // Distinct modification times
        std::thread::sleep(Duration::from_millis(20));
        cache.store(&key(1), Bytes::from(vec![1u8; 10])).unwrap();
        std::thread::sleep(Duration::from_millis(20));
        cache.store(&key(2), Bytes::from(vec![2u8; 10])).unwrap();

        assert!(cache.lookup(&key(0)).unwrap().is_none());
        assert!(cache.lookup(&key(1)).unwrap().is_some());
        assert!(cache.lookup(&key(2)).unwrap().is_some());
    }

    #[test]
    fn creates_missing_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("responses").join("v1");
        let cache = DiskCache::new(&nested, 1024).unwrap();
        assert!(cache.dir().is_dir());
    }
}
