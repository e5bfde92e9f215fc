//! Gatekeeper service binary.
//!
//! Loads configuration, wires the providers, cache, and decision engine
//! together, and serves until interrupted.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;

use club_gatekeeper::config::{self, GatekeeperConfig};
use club_gatekeeper::observability::{logging, metrics};
use club_gatekeeper::providers::{HttpRoleProvider, HttpSessionProvider};
use club_gatekeeper::{Gatekeeper, HttpServer, InMemoryRoleCache, Shutdown};

#[derive(Parser, Debug)]
#[command(
    name = "club-gatekeeper",
    about = "Session/role gatekeeper in front of the coaching platform backend"
)]
struct Cli {
    /// Path to the TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => GatekeeperConfig::default(),
    };

    logging::init_logging(&config.observability.log_level);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.address,
        auth_base_url = %config.auth.base_url,
        cache_ttl_secs = config.role_cache.ttl_secs,
        "configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(error) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                %error,
                "failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();

    let cache = InMemoryRoleCache::new();
    cache.start_sweeper(
        Duration::from_secs(config.role_cache.sweep_interval_secs),
        &shutdown,
    );

    let sessions = Arc::new(HttpSessionProvider::new(&config.auth)?);
    let roles = Arc::new(HttpRoleProvider::new(&config.auth)?);
    let gatekeeper = Arc::new(Gatekeeper::new(
        sessions,
        roles,
        Arc::new(cache),
        Duration::from_secs(config.role_cache.ttl_secs),
    ));

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = HttpServer::new(config, gatekeeper)?;

    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("shutdown signal received");
                shutdown.trigger();
            }
        });
    }

    server.run(listener, shutdown).await?;

    tracing::info!("shutdown complete");
    Ok(())
}
