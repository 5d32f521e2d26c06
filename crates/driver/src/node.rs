//! Storage nodes

use crate::backends::MemoryStorage;
use chcache_core::{CacheError, Result, Storage, StorageStat};
use std::fmt;
use std::sync::Arc;
use xxhash_rust::xxh3::xxh3_64;

/// A named, weighted storage backend
///
/// `weight` is the node's share of capacity: a node with twice the weight of
/// another receives about twice as many keys. Clones share the backend.
#[derive(Clone)]
pub struct Node {
    name: Arc<str>,
    weight: u64,
    seed: u64,
    storage: Arc<dyn Storage>,
}

impl Node {
    pub fn new(name: impl Into<String>, weight: u64, storage: Arc<dyn Storage>) -> Result<Self> {
        let name: String = name.into();
        if weight == 0 {
            return Err(CacheError::InvalidWeight { node: name });
        }

        Ok(Self {
            seed: xxh3_64(name.as_bytes()),
            name: name.into(),
            weight,
            storage,
        })
    }

    /// Node backed by a fresh [`MemoryStorage`]
    pub fn memory(name: impl Into<String>, weight: u64) -> Result<Self> {
        Self::new(name, weight, Arc::new(MemoryStorage::new()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn weight(&self) -> u64 {
        self.weight
    }

    /// Per-node hash seed derived from the name
    pub(crate) fn seed(&self) -> u64 {
        self.seed
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    pub fn stat(&self) -> StorageStat {
        self.storage.stat()
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.name)
            .field("weight", &self.weight)
            .field("storage", &self.storage)
            .finish()
    }
}
