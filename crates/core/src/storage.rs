//! Storage capability
//!
//! The minimal contract every backend (in-memory map, directory on disk,
//! remote store) satisfies. The node registry only ever talks to this trait.

use crate::errors::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Observability snapshot of a backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageStat {
    /// Approximate number of live objects. Maintained by increment/decrement
    /// on put/delete, so it can drift under concurrent mutation.
    pub object_count: i64,
}

/// Key/value storage backend
///
/// Implementations must be safe under concurrent calls from many tasks.
#[async_trait]
pub trait Storage: Send + Sync + Debug {
    /// Store a value, overwriting any existing one
    async fn put(&self, key: &str, value: Vec<u8>) -> Result<()>;

    /// Fetch a value
    ///
    /// Returns `CacheError::KeyNotFound` when the key is absent.
    async fn get(&self, key: &str) -> Result<Vec<u8>>;

    /// Remove a value. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Current statistics
    fn stat(&self) -> StorageStat;
}
