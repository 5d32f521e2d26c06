//! Disk cache for chcache
//!
//! A file-system backed cache that shields an expensive producer (the
//! [`Getter`]) from duplicate concurrent calls and keeps its directory tree
//! near a soft size budget:
//! - 256 hash shards under one root, one file per key
//! - best-effort miss coalescing through self-expiring [`KeyLocks`]
//! - periodic sampled eviction that purges random files from every shard
//! - approximate hit/miss accounting

pub mod config;
pub mod disk;
pub mod eviction;
pub mod getter;
pub mod keylocks;

pub use config::CacheConfig;
pub use disk::{shard_dir, shard_index, CacheStats, DiskCache};
pub use eviction::{CycleReport, EvictionTask, Evictor, PurgeReport, SurveyReport};
pub use getter::{getter_fn, FnGetter, Getter, StorageGetter};
pub use keylocks::{KeyLocks, LockToken};

pub use chcache_core::{CacheError, Result};
