//! Server binary for the unified search gateway.

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use usg::{AppState, GatewayConfig, GatewayServer};

/// usg: one search endpoint over OMDb and the post index.
#[derive(Parser)]
#[command(name = "usg-server", version, about)]
struct Cli {
    /// Path to TOML configuration file. Defaults to
    /// `~/.config/usg/config.toml` when that file exists.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to bind to, overriding config and `USG_HOST`.
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to, overriding config and `USG_PORT`.
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Users can override with RUST_LOG=debug to see everything.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("usg=info,usg_search=info,hyper=warn,reqwest=warn")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(ref path) => GatewayConfig::from_file(path)?,
        None => {
            let default_path = GatewayConfig::default_config_path();
            if default_path.exists() {
                GatewayConfig::from_file(&default_path)?
            } else {
                GatewayConfig::default()
            }
        }
    };
    config.apply_env_overrides()?;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    config.validate()?;

    let state = AppState::from_config(&config)?;
    let server = GatewayServer::start(state, &config.server).await?;
    tracing::info!(port = server.port(), "usg-server ready");

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("failed to listen for shutdown signal: {e}"))?;

    tracing::info!("usg-server shutting down");
    server.shutdown();
    Ok(())
}
