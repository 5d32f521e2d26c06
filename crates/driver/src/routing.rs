//! Weighted rendezvous hashing
//!
//! Every node scores the key with `-weight / ln(u)`, where `u` in (0, 1) is
//! derived from a hash of the key seeded by the node name. The highest score
//! wins. A node's chance of winning is proportional to its weight, the result
//! depends only on the key and the set, and adding a node only moves keys
//! onto the new node.

use crate::node::Node;
use std::cmp::Ordering;
use xxhash_rust::xxh3::xxh3_64_with_seed;

/// Score of `key` on a node with the given seed and weight
pub fn score(seed: u64, weight: u64, key: &str) -> f64 {
    let hash = xxh3_64_with_seed(key.as_bytes(), seed);
    // Top 53 bits, centred in their bucket so `unit` is never 0 or 1.
    let unit = ((hash >> 11) as f64 + 0.5) / (1u64 << 53) as f64;
    -(weight as f64) / unit.ln()
}

/// Node that owns `key`, or `None` for an empty set
pub fn select<'a>(nodes: &'a [Node], key: &str) -> Option<&'a Node> {
    nodes
        .iter()
        .map(|node| (score(node.seed(), node.weight(), key), node))
        .max_by(|(a_score, a), (b_score, b)| {
            a_score
                .partial_cmp(b_score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| b.name().cmp(a.name()))
        })
        .map(|(_, node)| node)
}
