//! tiktak - unified CLI
//!
//! Runs either the REST game server or the MCP tool adapter.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tiktak_server::adapter::{GameBackend, GameTools, HttpBackend, LocalBackend, serve_stdio};
use tiktak_server::cli::{Cli, Command};
use tiktak_server::{AppConfig, SessionRegistry};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;
    let (server_config, adapter_config) = config.into_parts();

    // Logs go to stderr so the MCP stdio channel stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(server_config.log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Serve { port, host } => {
            let server_config = server_config.with_overrides(host, port);
            info!("Starting tiktak REST server");
            tiktak_server::serve(&server_config, SessionRegistry::new()).await
        }
        Command::Mcp { api_base, local } => {
            let backend: Arc<dyn GameBackend> = if local {
                info!("Starting MCP adapter with in-process registry");
                Arc::new(LocalBackend::new(SessionRegistry::new()))
            } else {
                let adapter_config = adapter_config.with_api_base(api_base);
                info!(api_base = %adapter_config.api_base(), "Starting MCP adapter");
                Arc::new(HttpBackend::new(adapter_config.api_base()))
            };
            serve_stdio(GameTools::new(backend)).await
        }
    }
}
