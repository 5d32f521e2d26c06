//! Cache construction

use crate::config::CacheConfig;
use crate::eviction::{EvictionTask, Evictor};
use crate::getter::Getter;
use crate::keylocks::KeyLocks;
use chcache_core::{CacheError, Result, SHARD_COUNT};
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;

use super::paths::shard_dir;
use super::types::{CacheInner, Counters, DiskCache};

impl DiskCache {
    /// Create a cache under `root` with a `max_size` byte budget and default tuning
    pub async fn new(
        root: impl Into<PathBuf>,
        max_size: u64,
        getter: impl Getter + 'static,
    ) -> Result<Self> {
        Self::with_config(CacheConfig::new(root, max_size), getter).await
    }

    /// Create a cache from a full configuration.
    ///
    /// Creates the 256 shard directories (any failure aborts construction)
    /// and, unless the eviction interval is zero, spawns the background
    /// eviction task on the current tokio runtime.
    pub async fn with_config(config: CacheConfig, getter: impl Getter + 'static) -> Result<Self> {
        config.validate()?;

        for shard in 0..SHARD_COUNT {
            let dir = shard_dir(&config.root, shard);
            fs::create_dir_all(&dir)
                .await
                .map_err(|e| CacheError::io(&dir, "create shard directory", e))?;
        }

        let locks = Arc::new(KeyLocks::new());
        let evictor = Arc::new(Evictor::new(&config, Arc::clone(&locks)));

        let interval = config.eviction_interval();
        let eviction_task = if interval.is_zero() {
            None
        } else {
            Some(EvictionTask::spawn(Arc::clone(&evictor), interval))
        };

        tracing::info!(
            root = %config.root.display(),
            max_size = config.max_size,
            shard_budget = config.shard_budget(),
            "disk cache ready"
        );

        Ok(Self {
            inner: Arc::new(CacheInner {
                config,
                getter: Arc::new(getter),
                locks,
                counters: Counters::default(),
                evictor,
                eviction_task: Mutex::new(eviction_task),
            }),
        })
    }

    /// Stop the background eviction task and wait for it to exit.
    ///
    /// The cache stays usable; only periodic eviction stops.
    pub async fn shutdown(&self) {
        let task = self.inner.eviction_task.lock().take();
        if let Some(task) = task {
            task.shutdown().await;
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.inner.config
    }
}
