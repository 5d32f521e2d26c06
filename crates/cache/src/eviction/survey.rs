//! Shard usage sampling

use super::{Evictor, SurveyReport};
use crate::disk::shard_dir;
use chcache_core::SHARD_COUNT;
use rand::Rng;
use walkdir::WalkDir;

impl Evictor {
    /// Measure a uniformly random shard
    pub fn survey(&self) -> SurveyReport {
        let shard = rand::thread_rng().gen_range(0..SHARD_COUNT);
        self.survey_shard(shard)
    }

    /// Recursively sum the sizes of regular files under shard `shard`
    pub fn survey_shard(&self, shard: usize) -> SurveyReport {
        let path = shard_dir(&self.root, shard);

        let used_bytes = WalkDir::new(&path)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| entry.metadata().ok())
            .map(|metadata| metadata.len())
            .sum();

        tracing::info!(
            shard,
            path = %path.display(),
            used_bytes,
            budget_bytes = self.shard_budget,
            "cache survey"
        );

        SurveyReport {
            shard,
            path,
            used_bytes,
            budget_bytes: self.shard_budget,
        }
    }
}
