//! On-demand eviction entry points
//!
//! The background task runs these on a timer; they are public so operators
//! and tests can drive a cycle deterministically.

use crate::disk::types::DiskCache;
use crate::eviction::{run_blocking, CycleReport, PurgeReport, SurveyReport};
use chcache_core::{CacheError, Result, SHARD_COUNT};
use std::sync::Arc;

impl DiskCache {
    /// Measure one randomly chosen shard
    pub async fn survey(&self) -> Result<SurveyReport> {
        let evictor = Arc::clone(&self.inner.evictor);
        run_blocking("survey", move || evictor.survey()).await
    }

    /// Measure a specific shard
    pub async fn survey_shard(&self, shard: usize) -> Result<SurveyReport> {
        if shard >= SHARD_COUNT {
            return Err(CacheError::configuration(format!(
                "shard {shard} out of range (0..{SHARD_COUNT})"
            )));
        }
        let evictor = Arc::clone(&self.inner.evictor);
        run_blocking("survey", move || evictor.survey_shard(shard)).await
    }

    /// Try to free `amount` bytes from every shard
    pub async fn purge(&self, amount: u64) -> Result<PurgeReport> {
        let evictor = Arc::clone(&self.inner.evictor);
        run_blocking("purge", move || evictor.purge(amount)).await
    }

    /// One full survey-then-maybe-purge cycle, as the background task runs it
    pub async fn run_eviction_cycle(&self) -> Result<CycleReport> {
        self.inner.evictor.run_cycle().await
    }
}
