use anyhow::Result;
use chcache_cli::{Commands, Settings};
use clap::Parser;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "chcache")]
#[command(author, version, about = "Sharded disk cache and weighted node router")]
struct Cli {
    /// JSON settings file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Cache root directory, overriding the settings file
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Cache size budget in bytes, overriding the settings file
    #[arg(long, global = true)]
    max_size: Option<u64>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "warn", global = true)]
    log_level: Level,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level.to_string()));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_level(true)
                .with_target(true),
        )
        .with(filter)
        .init();

    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(root) = cli.root {
        settings.cache.root = root;
    }
    if let Some(max_size) = cli.max_size {
        settings.cache.max_size = max_size;
    }
    tracing::debug!(?settings, "resolved settings");

    cli.command.execute(settings).await
}
