//! Directory-backed storage
//!
//! Objects live at `root/<xx>/<hash>`, where `<hash>` is the hex xxh3-128 of
//! the key and `<xx>` its first byte. Keys never touch the file system
//! directly, so any string is a valid key.

use async_trait::async_trait;
use chcache_core::{write_atomic, CacheError, Result, Storage, StorageStat};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::fs;
use walkdir::WalkDir;
use xxhash_rust::xxh3::xxh3_128;

#[derive(Debug)]
pub struct DiskStorage {
    root: PathBuf,
    count: AtomicI64,
}

impl DiskStorage {
    /// Open (creating if needed) a store under `root`, counting existing objects
    pub async fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)
            .await
            .map_err(|e| CacheError::io(&root, "create storage directory", e))?;

        let scan_root = root.clone();
        let existing = tokio::task::spawn_blocking(move || count_objects(&scan_root))
            .await
            .map_err(|e| CacheError::Join {
                operation: "storage scan",
                message: e.to_string(),
            })?;

        tracing::debug!(root = %root.display(), objects = existing, "opened disk storage");
        Ok(Self {
            root,
            count: AtomicI64::new(existing),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn object_path(&self, key: &str) -> PathBuf {
        let hash = format!("{:032x}", xxh3_128(key.as_bytes()));
        self.root.join(&hash[..2]).join(hash)
    }
}

fn count_objects(root: &Path) -> i64 {
    WalkDir::new(root)
        .min_depth(2)
        .max_depth(2)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| !entry.file_name().to_string_lossy().starts_with('.'))
        .count() as i64
}

#[async_trait]
impl Storage for DiskStorage {
    async fn put(&self, key: &str, value: Vec<u8>) -> Result<()> {
        let path = self.object_path(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| CacheError::io(parent, "create shard directory", e))?;
        }

        let existed = fs::try_exists(&path).await.unwrap_or(false);
        write_atomic(&path, &value).await?;
        if !existed {
            self.count.fetch_add(1, Ordering::Relaxed);
        }
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>> {
        let path = self.object_path(key);
        match fs::read(&path).await {
            Ok(value) => Ok(value),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(CacheError::not_found(key)),
            Err(e) => Err(CacheError::io(path, "read object", e)),
        }
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let path = self.object_path(key);
        match fs::remove_file(&path).await {
            Ok(()) => {
                self.count.fetch_sub(1, Ordering::Relaxed);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CacheError::io(path, "remove object", e)),
        }
    }

    fn stat(&self) -> StorageStat {
        StorageStat {
            object_count: self.count.load(Ordering::Relaxed),
        }
    }
}
