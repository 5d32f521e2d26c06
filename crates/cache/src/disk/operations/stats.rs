//! Hit/miss accounting

use crate::disk::types::{CacheStats, DiskCache};

impl DiskCache {
    /// Approximate hit rate: `hits / (hits + misses + 1)`
    pub fn hit_rate(&self) -> f64 {
        self.stats().hit_rate()
    }

    pub fn stats(&self) -> CacheStats {
        self.inner.counters.snapshot()
    }

    /// Claims currently tracked by the miss-coalescing lock table
    pub fn pending_locks(&self) -> usize {
        self.inner.locks.len()
    }
}
