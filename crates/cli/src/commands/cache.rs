use anyhow::{Context, Result};
use chcache_cache::{getter_fn, CacheConfig, DiskCache, Getter};
use chcache_core::BoxError;
use serde_json::json;
use std::path::PathBuf;

/// Open the cache for a one-shot command.
///
/// The background eviction task is disabled; `evict` runs a cycle explicitly.
async fn open(mut config: CacheConfig, getter: impl Getter + 'static) -> Result<DiskCache> {
    config.eviction_interval_secs = 0;
    let root = config.root.clone();
    DiskCache::with_config(config, getter)
        .await
        .with_context(|| format!("failed to open cache at {}", root.display()))
}

/// Cache with no upstream; any miss fails
async fn open_offline(config: CacheConfig) -> Result<DiskCache> {
    let getter = getter_fn(|key: String| async move {
        Err::<Vec<u8>, BoxError>(format!("no upstream configured for '{key}'").into())
    });
    open(config, getter).await
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub async fn fetch(config: CacheConfig, upstream: PathBuf, keys: &[String]) -> Result<()> {
    let getter = getter_fn(move |key: String| {
        let source = upstream.join(&key);
        async move {
            tokio::fs::read(&source)
                .await
                .map_err(|e| Box::new(e) as BoxError)
        }
    });
    let cache = open(config, getter).await?;

    for key in keys {
        let value = cache
            .fetch(key)
            .await
            .with_context(|| format!("failed to fetch '{key}'"))?;
        println!("{key}\t{}\t{}", value.len(), cache.make_path(key).display());
    }

    let stats = cache.stats();
    print_json(&json!({
        "hits": stats.hits,
        "misses": stats.misses,
        "hit_rate": stats.hit_rate(),
    }))
}

pub async fn survey(config: CacheConfig, shard: Option<usize>) -> Result<()> {
    let cache = open_offline(config).await?;
    let report = match shard {
        Some(shard) => cache.survey_shard(shard).await?,
        None => cache.survey().await?,
    };
    print_json(&json!({
        "shard": report.shard,
        "path": report.path,
        "used_bytes": report.used_bytes,
        "budget_bytes": report.budget_bytes,
        "overage": report.overage(),
    }))
}

pub async fn purge(config: CacheConfig, amount: u64) -> Result<()> {
    let cache = open_offline(config).await?;
    let report = cache.purge(amount).await?;
    print_json(&report)
}

pub async fn evict(config: CacheConfig) -> Result<()> {
    let cache = open_offline(config).await?;
    let report = cache.run_eviction_cycle().await?;
    print_json(&report)
}

pub async fn path(config: CacheConfig, key: &str) -> Result<()> {
    let cache = open_offline(config).await?;
    let path = cache
        .checked_path(key)
        .with_context(|| format!("cannot map '{key}' to a cache path"))?;
    println!("{}", path.display());
    Ok(())
}
