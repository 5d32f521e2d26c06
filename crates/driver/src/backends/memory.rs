//! In-memory storage backend

use async_trait::async_trait;
use chcache_core::{CacheError, Result, Storage, StorageStat};
use dashmap::DashMap;
use std::sync::atomic::{AtomicI64, Ordering};

/// Concurrent map backend
#[derive(Debug, Default)]
pub struct MemoryStorage {
    kv: DashMap<String, Vec<u8>>,
    count: AtomicI64,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn put(&self, key: &str, value: Vec<u8>) -> Result<()> {
        if self.kv.insert(key.to_string(), value).is_none() {
            self.count.fetch_add(1, Ordering::Relaxed);
        }
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>> {
        self.kv
            .get(key)
            .map(|value| value.value().clone())
            .ok_or_else(|| CacheError::not_found(key))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        if self.kv.remove(key).is_some() {
            self.count.fetch_sub(1, Ordering::Relaxed);
        }
        Ok(())
    }

    fn stat(&self) -> StorageStat {
        StorageStat {
            object_count: self.count.load(Ordering::Relaxed),
        }
    }
}
