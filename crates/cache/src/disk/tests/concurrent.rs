//! Miss coalescing under concurrent fetches

use super::{counting_getter, test_config};
use crate::disk::DiskCache;
use chcache_core::Result;
use futures::future::join_all;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tempfile::TempDir;

async fn fetch_concurrently(cache: &DiskCache, key: &str, callers: usize) -> Vec<Result<Vec<u8>>> {
    let handles = (0..callers).map(|_| {
        let cache = cache.clone();
        let key = key.to_string();
        tokio::spawn(async move { cache.fetch(&key).await })
    });

    join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.expect("fetch task panicked"))
        .collect()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_fast_getter_runs_once_for_concurrent_misses() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let calls = Arc::new(AtomicUsize::new(0));
    let cache = DiskCache::with_config(
        test_config(temp_dir.path(), 500),
        counting_getter(Arc::clone(&calls), Duration::from_millis(50)),
    )
    .await?;

    let results = fetch_concurrently(&cache, "shared", 8).await;

    for result in results {
        assert_eq!(result?, b"value-shared");
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let stats = cache.stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 7);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_slow_getter_with_two_callers_runs_at_most_twice() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let calls = Arc::new(AtomicUsize::new(0));
    let cache = DiskCache::with_config(
        test_config(temp_dir.path(), 50),
        counting_getter(Arc::clone(&calls), Duration::from_millis(300)),
    )
    .await?;

    let results = fetch_concurrently(&cache, "slow", 2).await;

    for result in results {
        assert_eq!(result?, b"value-slow");
    }
    let invoked = calls.load(Ordering::SeqCst);
    assert!((1..=2).contains(&invoked), "getter ran {invoked} times");
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_slow_getter_never_fails_waiters() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let calls = Arc::new(AtomicUsize::new(0));
    let cache = DiskCache::with_config(
        test_config(temp_dir.path(), 50),
        counting_getter(Arc::clone(&calls), Duration::from_millis(300)),
    )
    .await?;

    let callers = 6;
    let results = fetch_concurrently(&cache, "slow", callers).await;

    for result in results {
        assert_eq!(result?, b"value-slow");
    }
    let invoked = calls.load(Ordering::SeqCst);
    assert!((1..=callers).contains(&invoked), "getter ran {invoked} times");
    assert_eq!(std::fs::read(cache.make_path("slow")).unwrap(), b"value-slow");
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_waiter_is_bounded_by_lock_timeout() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let calls = Arc::new(AtomicUsize::new(0));
    let cache = DiskCache::with_config(
        test_config(temp_dir.path(), 100),
        counting_getter(Arc::clone(&calls), Duration::ZERO),
    )
    .await?;

    // Another fetcher holds the claim and never finishes.
    let lock_key = cache.make_path("held").to_string_lossy().into_owned();
    let _claim = cache.inner.locks.lock(&lock_key, Duration::from_secs(60)).unwrap();

    let started = Instant::now();
    assert_eq!(cache.fetch("held").await?, b"value-held");
    let waited = started.elapsed();

    assert!(waited >= Duration::from_millis(100));
    assert!(waited < Duration::from_secs(5));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_distinct_keys_do_not_wait_on_each_other() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let calls = Arc::new(AtomicUsize::new(0));
    let cache = DiskCache::with_config(
        test_config(temp_dir.path(), 2000),
        counting_getter(Arc::clone(&calls), Duration::from_millis(50)),
    )
    .await?;

    let started = Instant::now();
    let handles = (0..8).map(|i| {
        let cache = cache.clone();
        tokio::spawn(async move { cache.fetch(&format!("key-{i}")).await })
    });
    for joined in join_all(handles).await {
        joined.expect("fetch task panicked")?;
    }

    assert!(started.elapsed() < Duration::from_millis(2000));
    assert_eq!(calls.load(Ordering::SeqCst), 8);
    Ok(())
}
