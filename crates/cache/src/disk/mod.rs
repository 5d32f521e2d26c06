//! Sharded, file-system backed cache
//!
//! One file per key under `root/<shard>/<key>`, where the shard is the first
//! byte of the SHA-1 of the key. There is no in-memory index: the directory
//! tree is the index, and a background task keeps its size near budget.

// Private modules
mod builder;
mod operations;
mod paths;
mod types;

pub use paths::{shard_dir, shard_index};
pub use types::{CacheStats, DiskCache};

#[cfg(test)]
mod tests;
