//! Sampled, randomized eviction
//!
//! Each cycle measures ONE randomly chosen shard and compares it with the
//! per-shard budget `max_size / 256 * fill_factor`. If that shard is over by
//! `diff` bytes, every shard is asked to give up roughly `diff` bytes of
//! randomly chosen files. The per-shard target is recharged for each of the
//! 256 directories, so one overage can release up to 256x `diff` in total.

mod background;
mod purge;
mod survey;

pub use background::EvictionTask;

use crate::config::CacheConfig;
use crate::keylocks::KeyLocks;
use chcache_core::{CacheError, Result};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

/// Usage of one sampled shard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SurveyReport {
    pub shard: usize,
    pub path: PathBuf,
    pub used_bytes: u64,
    pub budget_bytes: u64,
}

impl SurveyReport {
    /// Bytes over budget, if any
    pub fn overage(&self) -> Option<u64> {
        self.used_bytes
            .checked_sub(self.budget_bytes)
            .filter(|diff| *diff > 0)
    }
}

/// Outcome of one purge pass over all shards
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PurgeReport {
    /// Bytes each shard was asked to free
    pub amount: u64,
    pub removed_files: usize,
    pub removed_bytes: u64,
    /// Directory entries seen across all shards
    pub scanned_names: usize,
    /// Shards that could not be listed
    pub skipped_dirs: usize,
    pub elapsed_ms: u64,
}

/// Outcome of one background cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    pub survey: SurveyReport,
    pub purge: Option<PurgeReport>,
    /// Expired miss-coalescing claims dropped this cycle
    pub expired_locks: usize,
}

/// Eviction state shared between a cache and its background task
#[derive(Debug)]
pub struct Evictor {
    root: PathBuf,
    shard_budget: u64,
    locks: Arc<KeyLocks>,
}

impl Evictor {
    pub fn new(config: &CacheConfig, locks: Arc<KeyLocks>) -> Self {
        Self {
            root: config.root.clone(),
            shard_budget: config.shard_budget(),
            locks,
        }
    }

    pub fn shard_budget(&self) -> u64 {
        self.shard_budget
    }

    /// Survey a random shard and purge if it is over budget
    pub async fn run_cycle(self: &Arc<Self>) -> Result<CycleReport> {
        let evictor = Arc::clone(self);
        let survey = run_blocking("survey", move || evictor.survey()).await?;

        let purge = match survey.overage() {
            Some(diff) => {
                let evictor = Arc::clone(self);
                Some(run_blocking("purge", move || evictor.purge(diff)).await?)
            }
            None => None,
        };

        let expired_locks = self.locks.purge_expired();

        Ok(CycleReport {
            survey,
            purge,
            expired_locks,
        })
    }
}

/// Run blocking directory work off the async workers
pub(crate) async fn run_blocking<T, F>(operation: &'static str, f: F) -> Result<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| CacheError::Join {
            operation,
            message: e.to_string(),
        })
}
