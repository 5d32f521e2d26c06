//! Serializable node descriptions

use crate::backends::{DiskStorage, MemoryStorage};
use crate::node::Node;
use chcache_core::{Result, Storage};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// How to build one [`Node`]
///
/// Nodes with a `path` store objects on disk under it; the rest keep them in memory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub name: String,
    pub weight: u64,
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl NodeSpec {
    pub fn memory(name: impl Into<String>, weight: u64) -> Self {
        Self {
            name: name.into(),
            weight,
            path: None,
        }
    }

    pub async fn build(&self) -> Result<Node> {
        let storage: Arc<dyn Storage> = match &self.path {
            Some(path) => Arc::new(DiskStorage::open(path).await?),
            None => Arc::new(MemoryStorage::new()),
        };
        Node::new(self.name.clone(), self.weight, storage)
    }
}

/// Build every node in `specs`, failing on the first invalid one
pub async fn build_nodes(specs: &[NodeSpec]) -> Result<Vec<Node>> {
    let mut nodes = Vec::with_capacity(specs.len());
    for spec in specs {
        nodes.push(spec.build().await?);
    }
    Ok(nodes)
}

impl std::str::FromStr for NodeSpec {
    type Err = String;

    /// `name:weight` or `name:weight:path`
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':');
        let name = parts.next().filter(|n| !n.is_empty());
        let weight = parts.next();
        let path = parts.next().map(PathBuf::from);

        match (name, weight) {
            (Some(name), Some(weight)) => {
                let weight = weight
                    .parse::<u64>()
                    .map_err(|e| format!("invalid weight '{weight}' for node '{name}': {e}"))?;
                Ok(Self {
                    name: name.to_string(),
                    weight,
                    path,
                })
            }
            _ => Err(format!("expected name:weight[:path], got '{s}'")),
        }
    }
}
