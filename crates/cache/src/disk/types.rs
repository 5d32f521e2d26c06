//! Core cache types and structures

use crate::config::CacheConfig;
use crate::eviction::{EvictionTask, Evictor};
use crate::getter::Getter;
use crate::keylocks::KeyLocks;
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Disk-backed cache in front of an expensive [`Getter`]
///
/// Cloning is cheap; all clones share one cache. The background eviction
/// task stops when [`DiskCache::shutdown`] is awaited or the last clone drops.
#[derive(Clone)]
pub struct DiskCache {
    pub(super) inner: Arc<CacheInner>,
}

pub(super) struct CacheInner {
    pub config: CacheConfig,
    pub getter: Arc<dyn Getter>,
    pub locks: Arc<KeyLocks>,
    pub counters: Counters,
    pub evictor: Arc<Evictor>,
    pub eviction_task: Mutex<Option<EvictionTask>>,
}

impl Drop for CacheInner {
    fn drop(&mut self) {
        if let Some(task) = self.eviction_task.get_mut().take() {
            task.stop();
        }
    }
}

impl std::fmt::Debug for DiskCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiskCache")
            .field("root", &self.inner.config.root)
            .field("max_size", &self.inner.config.max_size)
            .field("stats", &self.inner.counters.snapshot())
            .finish()
    }
}

/// Hit/miss counters, updated without locking
#[derive(Debug, Default)]
pub(super) struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
}

impl Counters {
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of the hit/miss counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    /// `hits / (hits + misses + 1)`
    ///
    /// The `+ 1` keeps an idle cache at 0.0 and makes the value trail the true
    /// ratio until volume is high. It is a health signal, not a statistic.
    pub fn hit_rate(&self) -> f64 {
        self.hits as f64 / (self.hits + self.misses + 1) as f64
    }
}
