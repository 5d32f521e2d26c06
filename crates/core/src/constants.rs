//! Constants shared by the cache and the registry.

use std::time::Duration;

/// Number of shard directories under a cache root (one per hash byte value).
pub const SHARD_COUNT: usize = 256;

/// How long a cache-miss fetcher owns a key before the claim self-expires.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(2);

/// Fraction of the per-shard budget a shard may use before purging.
pub const DEFAULT_FILL_FACTOR: f64 = 0.9;

/// Period of the background eviction cycle.
pub const DEFAULT_EVICTION_INTERVAL: Duration = Duration::from_secs(60);

/// Default aggregate size budget: 10GB.
pub const DEFAULT_MAX_SIZE: u64 = 10 * 1024 * 1024 * 1024;

/// Directory name under the platform cache dir used when no root is configured.
pub const DEFAULT_CACHE_DIR_NAME: &str = "chcache";
