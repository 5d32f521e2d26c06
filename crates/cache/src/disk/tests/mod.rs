//! Disk cache tests

mod concurrent;

use crate::config::CacheConfig;
use crate::getter::{getter_fn, Getter};
use chcache_core::BoxError;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Config with the background task disabled and a short lock timeout
fn test_config(root: &Path, lock_timeout_ms: u64) -> CacheConfig {
    CacheConfig {
        root: root.to_path_buf(),
        max_size: 1 << 30,
        fill_factor: 0.9,
        eviction_interval_secs: 0,
        lock_timeout_ms,
    }
}

/// Getter returning `value-<key>` after `delay`, counting its invocations
fn counting_getter(calls: Arc<AtomicUsize>, delay: Duration) -> impl Getter {
    getter_fn(move |key: String| {
        let calls = Arc::clone(&calls);
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            Ok::<_, BoxError>(format!("value-{key}").into_bytes())
        }
    })
}
