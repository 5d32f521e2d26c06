//! Settings file shared by every subcommand

use anyhow::{Context, Result};
use chcache_cache::CacheConfig;
use chcache_driver::NodeSpec;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Contents of the JSON settings file
///
/// Cache fields sit at the top level next to `nodes`:
///
/// ```json
/// { "root": "/var/cache/chcache", "max_size": 1073741824,
///   "nodes": [{ "name": "a", "weight": 10, "path": "/srv/a" }] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(flatten)]
    pub cache: CacheConfig,
    pub nodes: Vec<NodeSpec>,
}

impl Settings {
    /// Read `path`, or fall back to defaults when no file is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file {}", path.display()))?;
        let settings: Self = serde_json::from_str(&raw)
            .with_context(|| format!("invalid settings file {}", path.display()))?;
        settings.cache.validate()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_means_defaults() {
        let settings = Settings::load(None).unwrap();
        assert_eq!(settings, Settings::default());
        assert!(settings.nodes.is_empty());
    }

    #[test]
    fn test_flattened_cache_fields_and_nodes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("chcache.json");
        std::fs::write(
            &path,
            r#"{
                "root": "/srv/cache",
                "lock_timeout_ms": 500,
                "nodes": [
                    { "name": "a", "weight": 10 },
                    { "name": "b", "weight": 5, "path": "/srv/b" }
                ]
            }"#,
        )
        .unwrap();

        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.cache.root, PathBuf::from("/srv/cache"));
        assert_eq!(settings.cache.lock_timeout_ms, 500);
        assert_eq!(settings.cache.fill_factor, 0.9);
        assert_eq!(settings.nodes.len(), 2);
        assert_eq!(settings.nodes[1].path, Some(PathBuf::from("/srv/b")));
    }

    #[test]
    fn test_invalid_cache_values_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("chcache.json");
        std::fs::write(&path, r#"{ "fill_factor": 2.0 }"#).unwrap();

        assert!(Settings::load(Some(&path)).is_err());
    }
}
