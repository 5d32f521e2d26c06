//! Atomic file writes so readers never observe a half-written value

use crate::errors::{CacheError, Result};
use std::path::Path;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Write `content` to `path` by writing a sibling temporary file and renaming it.
///
/// The parent directory must already exist. Files are created readable and
/// writable by everyone (subject to the process umask).
pub async fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| CacheError::configuration("invalid file path: no parent directory"))?;

    let temp_path = parent.join(format!(".{}.tmp", Uuid::new_v4()));

    let written = async {
        let mut options = OpenOptions::new();
        options.create(true).write(true).truncate(true);
        #[cfg(unix)]
        options.mode(0o666);

        let mut file = options
            .open(&temp_path)
            .await
            .map_err(|e| CacheError::io(&temp_path, "create temporary file", e))?;
        file.write_all(content)
            .await
            .map_err(|e| CacheError::io(&temp_path, "write temporary file", e))?;
        file.flush()
            .await
            .map_err(|e| CacheError::io(&temp_path, "flush temporary file", e))?;
        Ok::<(), CacheError>(())
    }
    .await;

    if let Err(e) = written {
        let _ = fs::remove_file(&temp_path).await;
        return Err(e);
    }

    if let Err(e) = fs::rename(&temp_path, path).await {
        let _ = fs::remove_file(&temp_path).await;
        return Err(CacheError::io(path, "atomic rename", e));
    }

    tracing::trace!(path = %path.display(), bytes = content.len(), "atomic write complete");
    Ok(())
}
