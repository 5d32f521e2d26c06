use crate::settings::Settings;
use anyhow::Result;
use clap::Subcommand;
use std::path::PathBuf;

pub mod cache;
pub mod route;

use self::route::RouteCommands;
use chcache_driver::NodeSpec;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Read keys through the disk cache, filling misses from an upstream directory
    Fetch {
        /// Keys to read
        #[arg(required = true)]
        keys: Vec<String>,

        /// Directory holding one file per key, consulted on a miss
        #[arg(long)]
        upstream: PathBuf,
    },
    /// Measure one shard against its budget
    Survey {
        /// Shard to measure (random when omitted)
        #[arg(long)]
        shard: Option<usize>,
    },
    /// Ask every shard to free about AMOUNT bytes
    Purge {
        #[arg(long)]
        amount: u64,
    },
    /// Run one survey-then-purge eviction cycle
    Evict,
    /// Print the file path a key is cached at
    Path { key: String },
    /// Route keys across weighted storage nodes
    Route {
        /// Node as name:weight or name:weight:path (repeatable, replaces configured nodes)
        #[arg(long = "node")]
        nodes: Vec<NodeSpec>,

        #[command(subcommand)]
        command: RouteCommands,
    },
}

impl Commands {
    pub async fn execute(self, settings: Settings) -> Result<()> {
        match self {
            Commands::Fetch { keys, upstream } => {
                cache::fetch(settings.cache, upstream, &keys).await
            }
            Commands::Survey { shard } => cache::survey(settings.cache, shard).await,
            Commands::Purge { amount } => cache::purge(settings.cache, amount).await,
            Commands::Evict => cache::evict(settings.cache).await,
            Commands::Path { key } => cache::path(settings.cache, &key).await,
            Commands::Route { nodes, command } => {
                let nodes = if nodes.is_empty() {
                    settings.nodes
                } else {
                    nodes
                };
                command.execute(&nodes).await
            }
        }
    }
}
