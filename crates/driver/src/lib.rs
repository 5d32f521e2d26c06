//! Weighted multi-backend routing for chcache
//!
//! A [`NodeRegistry`] holds a hot-swappable set of weighted [`Node`]s and
//! sends every key to exactly one of them. Routing is a pure function of the
//! key and the current set, so capacity can be added by loading a new set;
//! nothing already stored is migrated.
//!
//! ## Modules
//!
//! - **`node`**: a named, weighted handle around one `Storage` backend.
//! - **`routing`**: weighted rendezvous scoring.
//! - **`registry`**: the atomically swapped node set and put/get/delete routing.
//! - **`backends`**: `MemoryStorage` and `DiskStorage`.
//! - **`config`**: `NodeSpec`, the serializable description of a node.

pub mod backends;
pub mod config;
pub mod node;
pub mod registry;
pub mod routing;

pub use backends::{DiskStorage, MemoryStorage};
pub use config::{build_nodes, NodeSpec};
pub use node::Node;
pub use registry::{NodeRegistry, NodeSet, NodeStat};
pub use chcache_core::{CacheError, Result, Storage, StorageStat};

#[cfg(test)]
mod tests;
