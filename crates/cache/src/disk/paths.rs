//! Path derivation for cache entries

use chcache_core::{CacheError, Result};
use sha1::{Digest, Sha1};
use std::path::{Path, PathBuf};

/// Shard a key lives in: the first byte of its SHA-1 digest
pub fn shard_index(key: &str) -> usize {
    let digest = Sha1::digest(key.as_bytes());
    digest[0] as usize
}

/// Directory of shard `shard` under `root`
pub fn shard_dir(root: &Path, shard: usize) -> PathBuf {
    root.join(shard.to_string())
}

/// `root/<shard>/<key>`
pub(super) fn entry_path(root: &Path, key: &str) -> PathBuf {
    shard_dir(root, shard_index(key)).join(key)
}

/// Keys are used verbatim as file names, so anything that would escape the
/// shard directory or is not a plain name is refused.
pub(super) fn validate_key(key: &str) -> Result<()> {
    let reason = if key.is_empty() {
        "key is empty"
    } else if key == "." || key == ".." {
        "key is a relative path component"
    } else if key.contains('/') || key.contains('\\') {
        "key contains a path separator"
    } else if key.contains('\0') {
        "key contains a NUL byte"
    } else {
        return Ok(());
    };

    Err(CacheError::InvalidKey {
        key: key.to_string(),
        reason,
    })
}
