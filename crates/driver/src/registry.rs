//! Hot-swappable node registry

use crate::node::Node;
use crate::routing;
use chcache_core::{CacheError, Result, StorageStat};
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

/// One immutable generation of the node set
#[derive(Debug, Default)]
pub struct NodeSet {
    nodes: Vec<Node>,
    total_weight: u64,
}

impl NodeSet {
    /// Build a set, rejecting duplicate names
    pub fn new(nodes: impl IntoIterator<Item = Node>) -> Result<Self> {
        let nodes: Vec<Node> = nodes.into_iter().collect();

        let mut seen = HashSet::with_capacity(nodes.len());
        for node in &nodes {
            if !seen.insert(node.name()) {
                return Err(CacheError::DuplicateNode {
                    name: node.name().to_string(),
                });
            }
        }

        let total_weight = nodes.iter().map(Node::weight).sum();
        Ok(Self {
            nodes,
            total_weight,
        })
    }

    /// Node that owns `key`
    pub fn select(&self, key: &str) -> Result<&Node> {
        routing::select(&self.nodes, key).ok_or(CacheError::NoNodesAvailable)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn total_weight(&self) -> u64 {
        self.total_weight
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Per-node observability row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeStat {
    pub name: String,
    pub weight: u64,
    #[serde(flatten)]
    pub stat: StorageStat,
}

/// Routes keys across the current node set
///
/// Every routing call works on one snapshot of the set, taken by cloning an
/// `Arc` under a short read lock. [`NodeRegistry::load_nodes`] builds the new
/// set outside the lock and swaps the pointer, so callers see either the old
/// set or the new one, never a mix.
///
/// The lock is held only for an `Arc` clone (readers) or a pointer store
/// (writers); no routing, hashing or storage I/O ever runs under it. A
/// writer can therefore wait on readers for at most one clone, and no
/// caller ever waits on another caller's storage operation.
#[derive(Debug, Default)]
pub struct NodeRegistry {
    current: RwLock<Arc<NodeSet>>,
}

impl NodeRegistry {
    /// Registry with an empty node set
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the active set. On error the previous set stays active.
    ///
    /// Data already stored is not moved; keys whose owner changes become
    /// unreachable through this registry.
    pub fn load_nodes(&self, nodes: impl IntoIterator<Item = Node>) -> Result<()> {
        let set = Arc::new(NodeSet::new(nodes)?);
        tracing::info!(
            nodes = set.len(),
            total_weight = set.total_weight(),
            "loaded node set"
        );
        *self.current.write() = set;
        Ok(())
    }

    /// The set currently in effect
    pub fn snapshot(&self) -> Arc<NodeSet> {
        Arc::clone(&self.current.read())
    }

    /// Node that currently owns `key`
    pub fn locate(&self, key: &str) -> Result<Node> {
        self.snapshot().select(key).cloned()
    }

    pub async fn put(&self, key: &str, value: Vec<u8>) -> Result<()> {
        let set = self.snapshot();
        let node = set.select(key)?;
        tracing::trace!(key, node = node.name(), bytes = value.len(), "routing put");
        node.storage().put(key, value).await
    }

    pub async fn get(&self, key: &str) -> Result<Vec<u8>> {
        let set = self.snapshot();
        let node = set.select(key)?;
        tracing::trace!(key, node = node.name(), "routing get");
        node.storage().get(key).await
    }

    pub async fn delete(&self, key: &str) -> Result<()> {
        let set = self.snapshot();
        let node = set.select(key)?;
        tracing::trace!(key, node = node.name(), "routing delete");
        node.storage().delete(key).await
    }

    /// Nodes of the current set, in load order
    pub fn nodes(&self) -> Vec<Node> {
        self.snapshot().nodes().to_vec()
    }

    pub fn total_weight(&self) -> u64 {
        self.snapshot().total_weight()
    }

    pub fn stats(&self) -> Vec<NodeStat> {
        self.snapshot()
            .nodes()
            .iter()
            .map(|node| NodeStat {
                name: node.name().to_string(),
                weight: node.weight(),
                stat: node.stat(),
            })
            .collect()
    }
}
