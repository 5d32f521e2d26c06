//! Random-victim purge across all shards

use super::{Evictor, PurgeReport};
use crate::disk::shard_dir;
use chcache_core::{CacheError, SHARD_COUNT};
use rand::Rng;
use std::fs;
use std::path::Path;
use std::time::Instant;

impl Evictor {
    /// Free roughly `amount` bytes from EVERY shard.
    ///
    /// Per shard: pick a uniformly random remaining file, delete it, subtract
    /// its size, and stop once `amount` bytes are gone or the shard is empty.
    /// Unreadable shards are logged and skipped.
    pub fn purge(&self, amount: u64) -> PurgeReport {
        tracing::info!(amount, "cache purge started");

        let start = Instant::now();
        let mut rng = rand::thread_rng();
        let mut report = PurgeReport {
            amount,
            ..PurgeReport::default()
        };

        for shard in 0..SHARD_COUNT {
            let dir = shard_dir(&self.root, shard);
            let mut names = match list_names(&dir) {
                Ok(names) => names,
                Err(e) => {
                    tracing::warn!(error = %e, "skipping shard during purge");
                    report.skipped_dirs += 1;
                    continue;
                }
            };
            report.scanned_names += names.len();

            let mut remaining = amount;
            while remaining > 0 && !names.is_empty() {
                let idx = rng.gen_range(0..names.len());
                let path = dir.join(names.swap_remove(idx));

                let size = match fs::metadata(&path) {
                    Ok(metadata) => metadata.len(),
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "purge stat failed");
                        continue;
                    }
                };
                if let Err(e) = fs::remove_file(&path) {
                    tracing::warn!(path = %path.display(), error = %e, "purge remove failed");
                    continue;
                }

                remaining = remaining.saturating_sub(size);
                report.removed_files += 1;
                report.removed_bytes += size;
            }
        }

        report.elapsed_ms = start.elapsed().as_millis() as u64;
        tracing::info!(
            elapsed_ms = report.elapsed_ms,
            scanned_names = report.scanned_names,
            removed_files = report.removed_files,
            removed_bytes = report.removed_bytes,
            "cache purge finished"
        );
        report
    }
}

fn list_names(dir: &Path) -> Result<Vec<std::ffi::OsString>, CacheError> {
    let unavailable = |source: std::io::Error| CacheError::DirectoryUnavailable {
        path: dir.to_path_buf(),
        source,
    };

    fs::read_dir(dir)
        .map_err(unavailable)?
        .map(|entry| entry.map(|e| e.file_name()).map_err(unavailable))
        .collect()
}
