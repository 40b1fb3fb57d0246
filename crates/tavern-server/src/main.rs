//! Tavern admin server entry point

use clap::Parser;

/// Command line interface for the Tavern admin server
#[derive(Parser, Debug)]
#[command(name = "tavern")]
#[command(about = "Tavern platform - cache and configuration admin server")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<std::path::PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tavern_server::run(cli.config.as_deref()).await
}
