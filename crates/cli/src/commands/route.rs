use anyhow::{bail, Context, Result};
use chcache_driver::{build_nodes, NodeRegistry, NodeSpec};
use clap::Subcommand;
use std::io::Write;

#[derive(Subcommand, Debug)]
pub enum RouteCommands {
    /// Print the node that owns each key
    Locate {
        #[arg(required = true)]
        keys: Vec<String>,
    },
    /// Store VALUE under KEY on its owning node
    Put { key: String, value: String },
    /// Write the value stored under KEY to stdout
    Get { key: String },
    /// Remove KEY from its owning node
    Delete { key: String },
    /// Show weight and object count per node
    Stats,
}

/// Build a registry from `specs`
pub async fn load_registry(specs: &[NodeSpec]) -> Result<NodeRegistry> {
    if specs.is_empty() {
        bail!("no nodes configured; pass --node name:weight[:path] or list nodes in the settings file");
    }

    let registry = NodeRegistry::new();
    let nodes = build_nodes(specs).await.context("failed to build nodes")?;
    registry.load_nodes(nodes)?;
    Ok(registry)
}

impl RouteCommands {
    pub async fn execute(self, specs: &[NodeSpec]) -> Result<()> {
        let registry = load_registry(specs).await?;

        match self {
            RouteCommands::Locate { keys } => {
                for key in keys {
                    let node = registry.locate(&key)?;
                    println!("{key}\t{}", node.name());
                }
            }
            RouteCommands::Put { key, value } => {
                registry
                    .put(&key, value.into_bytes())
                    .await
                    .with_context(|| format!("failed to put '{key}'"))?;
                let node = registry.locate(&key)?;
                tracing::info!(key = %key, node = node.name(), "stored");
            }
            RouteCommands::Get { key } => {
                let value = registry
                    .get(&key)
                    .await
                    .with_context(|| format!("failed to get '{key}'"))?;
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(&value)?;
                stdout.flush()?;
            }
            RouteCommands::Delete { key } => {
                registry
                    .delete(&key)
                    .await
                    .with_context(|| format!("failed to delete '{key}'"))?;
            }
            RouteCommands::Stats => {
                println!("{}", serde_json::to_string_pretty(&registry.stats())?);
            }
        }
        Ok(())
    }
}
