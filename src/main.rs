// Claimlink server entry point
//
// Loads configuration, wires the policy store, claim engine, and fetch client
// together, and serves the HTTP API.

use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use claimlink::api::{ApiServer, AppState};
use claimlink::claims::ClaimEngine;
use claimlink::config::ServiceConfig;
use claimlink::proxy::{FetchClient, HttpFetchClient};
use claimlink::store::{self, PolicyStore, RetentionPolicy};

/// Command line arguments for the claimlink server
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, value_name = "FILE", default_value = "claimlink.toml")]
    config: PathBuf,

    /// Write the default configuration to the config path and exit
    #[arg(long)]
    init_config: bool,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Initialize tracing for logs
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    if cli.init_config {
        ServiceConfig::default().to_file(&cli.config)?;
        info!("Wrote default configuration to {:?}", cli.config);
        return Ok(());
    }

    info!("Loading configuration from {:?}", cli.config);
    let config = match ServiceConfig::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        process::exit(1);
    }

    let retention = RetentionPolicy::from_config(&config.retention);
    let ttl_enabled = retention.policy_ttl.is_some();
    let store = Arc::new(PolicyStore::with_retention(retention));

    if ttl_enabled {
        let interval = Duration::from_secs(config.retention.prune_interval_secs);
        store::spawn_pruner(store.clone(), interval);
        info!(
            "Policy pruning enabled every {}s",
            config.retention.prune_interval_secs
        );
    }

    let fetcher: Arc<dyn FetchClient> = Arc::new(HttpFetchClient::new(Duration::from_secs(
        config.upstream.fetch_timeout_secs,
    ))?);

    let app_state = Arc::new(AppState {
        claims: ClaimEngine::new(store.clone()),
        store,
        fetcher,
        public_url: config.public_url(),
    });

    info!("Issued links will use base URL {}", app_state.public_url);

    let server = ApiServer::new(app_state, config.bind_address());
    server.start().await?;

    Ok(())
}
