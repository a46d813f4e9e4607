//! Entry point for the roverview binary.

use clap::Parser as _;
use tracing_subscriber::EnvFilter;

use roverview::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    roverview::app::run(cli).await
}
