//! Value producers consulted on a cache miss

use async_trait::async_trait;
use chcache_core::{BoxError, Storage};
use std::future::Future;
use std::sync::Arc;

/// Produces the bytes for a key the cache does not hold yet.
///
/// Errors are handed back to the `fetch` caller untouched (wrapped in
/// `CacheError::Getter`); nothing is written to disk for a failed key.
#[async_trait]
pub trait Getter: Send + Sync {
    async fn get(&self, key: &str) -> Result<Vec<u8>, BoxError>;
}

/// Adapter turning an async closure into a [`Getter`]
pub struct FnGetter<F>(F);

/// Wrap `f` as a getter. The closure receives an owned copy of the key.
pub fn getter_fn<F, Fut>(f: F) -> FnGetter<F>
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Vec<u8>, BoxError>> + Send,
{
    FnGetter(f)
}

#[async_trait]
impl<F, Fut> Getter for FnGetter<F>
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Vec<u8>, BoxError>> + Send,
{
    async fn get(&self, key: &str) -> Result<Vec<u8>, BoxError> {
        (self.0)(key.to_string()).await
    }
}

/// Getter that reads through to a [`Storage`] backend, e.g. a slower origin
#[derive(Debug, Clone)]
pub struct StorageGetter {
    origin: Arc<dyn Storage>,
}

impl StorageGetter {
    pub fn new(origin: Arc<dyn Storage>) -> Self {
        Self { origin }
    }
}

#[async_trait]
impl Getter for StorageGetter {
    async fn get(&self, key: &str) -> Result<Vec<u8>, BoxError> {
        self.origin.get(key).await.map_err(|e| Box::new(e) as BoxError)
    }
}
