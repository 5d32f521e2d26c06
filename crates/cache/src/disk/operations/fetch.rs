//! Read-through fetch with best-effort miss coalescing

use crate::disk::paths::{entry_path, validate_key};
use crate::disk::types::DiskCache;
use crate::keylocks::{KeyLocks, LockToken};
use chcache_core::{write_atomic, CacheError, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Releases a key claim when the fetch finishes, however it finishes
struct HeldLock<'a> {
    locks: &'a KeyLocks,
    key: String,
    token: LockToken,
}

impl Drop for HeldLock<'_> {
    fn drop(&mut self) {
        self.locks.unlock(&self.key, self.token);
    }
}

impl DiskCache {
    /// Path of the file holding `key`. Pure function of the key.
    pub fn make_path(&self, key: &str) -> PathBuf {
        entry_path(&self.inner.config.root, key)
    }

    /// Like [`DiskCache::make_path`], but refuses keys `fetch` would refuse
    pub fn checked_path(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.make_path(key))
    }

    /// Return the cached bytes for `key`, calling the getter on a miss.
    ///
    /// On a miss the caller tries to claim the key. The claimant calls the
    /// getter directly. Everybody else sleeps for one lock timeout, re-reads
    /// the file once, and if it is still missing calls the getter anyway, so
    /// a getter slower than the timeout can run more than once per key.
    pub async fn fetch(&self, key: &str) -> Result<Vec<u8>> {
        validate_key(key)?;
        let path = self.make_path(key);

        if let Some(buf) = read_entry(&path).await {
            self.inner.counters.record_hit();
            return Ok(buf);
        }

        let timeout = self.inner.config.lock_timeout();
        let lock_key = path.to_string_lossy().into_owned();
        let _held = match self.inner.locks.lock(&lock_key, timeout) {
            Some(token) => Some(HeldLock {
                locks: &self.inner.locks,
                key: lock_key,
                token,
            }),
            None => {
                tokio::time::sleep(timeout).await;
                if let Some(buf) = read_entry(&path).await {
                    self.inner.counters.record_hit();
                    return Ok(buf);
                }
                tracing::debug!(key, "still missing after waiting on another fetcher");
                None
            }
        };

        self.inner.counters.record_miss();
        let buf = self
            .inner
            .getter
            .get(key)
            .await
            .map_err(|source| CacheError::Getter {
                key: key.to_string(),
                source,
            })?;

        match write_atomic(&path, &buf).await {
            Ok(()) => tracing::debug!(key, bytes = buf.len(), "cached fetched value"),
            Err(e) => {
                let err = match e {
                    CacheError::Io { source, .. } => CacheError::Persist {
                        path: path.clone(),
                        source,
                    },
                    other => other,
                };
                tracing::warn!(key, error = %err, "failed to persist fetched value");
            }
        }

        Ok(buf)
    }
}

async fn read_entry(path: &Path) -> Option<Vec<u8>> {
    match fs::read(path).await {
        Ok(buf) => Some(buf),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "cache read failed, treating as miss");
            None
        }
    }
}
