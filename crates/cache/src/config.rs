//! Disk cache configuration
use chcache_core::{
    CacheError, Result, DEFAULT_CACHE_DIR_NAME, DEFAULT_EVICTION_INTERVAL, DEFAULT_FILL_FACTOR,
    DEFAULT_LOCK_TIMEOUT, DEFAULT_MAX_SIZE, SHARD_COUNT,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration for a [`DiskCache`](crate::DiskCache)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Root directory holding the 256 shard directories
    pub root: PathBuf,
    /// Maximum aggregate size budget in bytes
    pub max_size: u64,
    /// Fraction of the per-shard budget a shard may fill before purging
    pub fill_factor: f64,
    /// Seconds between eviction cycles; zero disables the background task
    pub eviction_interval_secs: u64,
    /// Milliseconds a miss fetcher owns its key
    pub lock_timeout_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        let root = dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(DEFAULT_CACHE_DIR_NAME);
        Self {
            root,
            max_size: DEFAULT_MAX_SIZE,
            fill_factor: DEFAULT_FILL_FACTOR,
            eviction_interval_secs: DEFAULT_EVICTION_INTERVAL.as_secs(),
            lock_timeout_ms: DEFAULT_LOCK_TIMEOUT.as_millis() as u64,
        }
    }
}

impl CacheConfig {
    /// Default configuration rooted at `root` with the given size budget
    pub fn new(root: impl Into<PathBuf>, max_size: u64) -> Self {
        Self {
            root: root.into(),
            max_size,
            ..Self::default()
        }
    }

    /// Load a JSON configuration file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| CacheError::io(path, "read config file", e))?;
        let config: Self = serde_json::from_str(&raw).map_err(|e| {
            CacheError::configuration(format!("invalid config '{}': {e}", path.display()))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.fill_factor > 0.0 && self.fill_factor <= 1.0) {
            return Err(CacheError::configuration(format!(
                "fill_factor must be in (0, 1], got {}",
                self.fill_factor
            )));
        }
        if self.lock_timeout_ms == 0 {
            return Err(CacheError::configuration(
                "lock_timeout_ms must be greater than zero",
            ));
        }
        Ok(())
    }

    pub fn eviction_interval(&self) -> Duration {
        Duration::from_secs(self.eviction_interval_secs)
    }

    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }

    /// Soft budget for a single shard: `max_size / 256 * fill_factor`
    pub fn shard_budget(&self) -> u64 {
        (self.max_size as f64 / SHARD_COUNT as f64 * self.fill_factor) as u64
    }
}
