//! Registry and routing tests

use crate::config::build_nodes;
use crate::{CacheError, Node, NodeRegistry, NodeSpec, Result};
use std::collections::HashMap;
use tempfile::TempDir;

fn weighted_nodes() -> Vec<Node> {
    vec![
        Node::memory("aa", 10).unwrap(),
        Node::memory("bb", 25).unwrap(),
        Node::memory("cc", 10).unwrap(),
        Node::memory("dd", 5).unwrap(),
    ]
}

#[tokio::test]
async fn test_empty_registry_has_no_nodes() {
    let registry = NodeRegistry::new();

    assert!(matches!(
        registry.put("x", b"v".to_vec()).await,
        Err(CacheError::NoNodesAvailable)
    ));
    assert!(matches!(registry.get("x").await, Err(CacheError::NoNodesAvailable)));
    assert!(matches!(registry.locate("x"), Err(CacheError::NoNodesAvailable)));
    assert_eq!(registry.total_weight(), 0);
}

#[test]
fn test_zero_weight_rejected() {
    let err = Node::memory("zero", 0).unwrap_err();
    assert!(matches!(err, CacheError::InvalidWeight { node } if node == "zero"));
}

#[tokio::test]
async fn test_put_then_get() -> Result<()> {
    let registry = NodeRegistry::new();
    registry.load_nodes(weighted_nodes())?;
    assert_eq!(registry.total_weight(), 50);

    registry.put("x", b"v".to_vec()).await?;
    assert_eq!(registry.get("x").await?, b"v");

    registry.delete("x").await?;
    assert!(registry.get("x").await.unwrap_err().is_not_found());
    Ok(())
}

#[tokio::test]
async fn test_duplicate_names_keep_previous_set() -> Result<()> {
    let registry = NodeRegistry::new();
    registry.load_nodes(weighted_nodes())?;
    registry.put("kept", b"v".to_vec()).await?;

    let err = registry
        .load_nodes(vec![Node::memory("aa", 1)?, Node::memory("aa", 2)?])
        .unwrap_err();
    assert!(matches!(err, CacheError::DuplicateNode { name } if name == "aa"));

    assert_eq!(registry.nodes().len(), 4);
    assert_eq!(registry.get("kept").await?, b"v");
    Ok(())
}

#[test]
fn test_routing_ignores_load_order() -> Result<()> {
    let forward = NodeRegistry::new();
    forward.load_nodes(weighted_nodes())?;

    let mut reversed_nodes = weighted_nodes();
    reversed_nodes.reverse();
    let reversed = NodeRegistry::new();
    reversed.load_nodes(reversed_nodes)?;

    for i in 0..500 {
        let key = format!("key-{i}");
        assert_eq!(forward.locate(&key)?.name(), reversed.locate(&key)?.name());
    }
    Ok(())
}

#[test]
fn test_routing_is_proportional_to_weight() -> Result<()> {
    let registry = NodeRegistry::new();
    registry.load_nodes(weighted_nodes())?;

    let total = 20_000;
    let mut counts: HashMap<String, usize> = HashMap::new();
    for i in 0..total {
        let node = registry.locate(&format!("{i:x}"))?;
        *counts.entry(node.name().to_string()).or_default() += 1;
    }

    for (name, weight) in [("aa", 10.0), ("bb", 25.0), ("cc", 10.0), ("dd", 5.0)] {
        let share = counts.get(name).copied().unwrap_or(0) as f64 / total as f64;
        let expected = weight / 50.0;
        assert!(
            (share - expected).abs() < 0.03,
            "{name}: share {share:.3}, expected {expected:.3}"
        );
    }
    Ok(())
}

#[test]
fn test_adding_a_node_only_moves_keys_onto_it() -> Result<()> {
    let registry = NodeRegistry::new();
    registry.load_nodes(weighted_nodes())?;

    let before: Vec<(String, String)> = (0..2000)
        .map(|i| {
            let key = format!("key-{i}");
            let owner = registry.locate(&key).map(|n| n.name().to_string());
            owner.map(|owner| (key, owner))
        })
        .collect::<Result<_>>()?;

    let mut grown = registry.nodes();
    grown.push(Node::memory("ee", 15)?);
    registry.load_nodes(grown)?;

    let mut moved = 0;
    for (key, owner) in before {
        let now = registry.locate(&key)?;
        if now.name() != owner {
            assert_eq!(now.name(), "ee");
            moved += 1;
        }
    }
    assert!(moved > 0);
    Ok(())
}

#[tokio::test]
async fn test_reconfiguration_does_not_migrate() -> Result<()> {
    let registry = NodeRegistry::new();
    let nodes = weighted_nodes();
    registry.load_nodes(nodes.clone())?;

    // Find a key owned by "bb", then drop "bb" from the set.
    let key = (0..)
        .map(|i| format!("key-{i}"))
        .find(|key| registry.locate(key).map(|n| n.name() == "bb").unwrap_or(false))
        .unwrap();
    registry.put(&key, b"stranded".to_vec()).await?;

    let bb = nodes.iter().find(|n| n.name() == "bb").cloned().unwrap();
    registry.load_nodes(nodes.into_iter().filter(|n| n.name() != "bb"))?;

    assert!(registry.get(&key).await.unwrap_err().is_not_found());
    assert_eq!(bb.storage().get(&key).await?, b"stranded");
    Ok(())
}

#[tokio::test]
async fn test_stats_track_object_counts() -> Result<()> {
    let registry = NodeRegistry::new();
    registry.load_nodes(weighted_nodes())?;

    for i in 0..200 {
        registry.put(&format!("k{i}"), vec![0u8; 4]).await?;
    }

    let stats = registry.stats();
    assert_eq!(stats.len(), 4);
    let total: i64 = stats.iter().map(|s| s.stat.object_count).sum();
    assert_eq!(total, 200);
    assert!(stats.iter().all(|s| s.stat.object_count > 0));
    Ok(())
}

#[test]
fn test_node_spec_parsing() {
    let spec: NodeSpec = "hot:25".parse().unwrap();
    assert_eq!(spec, NodeSpec::memory("hot", 25));

    let spec: NodeSpec = "cold:5:/srv/cold".parse().unwrap();
    assert_eq!(spec.path.as_deref(), Some(std::path::Path::new("/srv/cold")));

    assert!("noweight".parse::<NodeSpec>().is_err());
    assert!(":10".parse::<NodeSpec>().is_err());
    assert!("bad:ten".parse::<NodeSpec>().is_err());
}

#[tokio::test]
async fn test_build_nodes_mixes_backends() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let specs = vec![
        NodeSpec::memory("mem", 10),
        NodeSpec {
            name: "disk".to_string(),
            weight: 10,
            path: Some(temp_dir.path().join("disk")),
        },
    ];

    let registry = NodeRegistry::new();
    registry.load_nodes(build_nodes(&specs).await?)?;

    for i in 0..50 {
        registry.put(&format!("k{i}"), format!("v{i}").into_bytes()).await?;
    }
    for i in 0..50 {
        assert_eq!(registry.get(&format!("k{i}")).await?, format!("v{i}").into_bytes());
    }
    assert!(temp_dir.path().join("disk").is_dir());

    let zero = NodeSpec::memory("zero", 0);
    assert!(build_nodes(&[zero]).await.is_err());
    Ok(())
}
