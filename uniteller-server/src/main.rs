//! Uniteller Gateway Server
//!
//! Serves the Uniteller payment endpoints of a store: the provider callback,
//! the shopper return pages, the redirect form and the admin settings API.

mod api;
mod config;
mod server;
mod shutdown;
mod state;

use clap::Parser;
use config::ConfigLoader;
use server::{build_router, run_server};
use shutdown::spawn_config_reload_handler;
use state::AppState;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use uniteller_core::entities::Order;
use uniteller_core::services::MemoryOrderBook;
use uniteller_sdk::client::ResultsClient;

/// Uniteller Gateway - payment endpoints for a store
#[derive(Parser, Debug)]
#[command(name = "uniteller-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, env = "UNITELLER_CONFIG", default_value = "./uniteller-config.toml")]
    config: PathBuf,

    /// Override the listen address (e.g., 0.0.0.0:3000)
    #[arg(short, long)]
    listen: Option<SocketAddr>,

    /// JSON file with orders to preload into the in-memory order book
    #[arg(long)]
    orders: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = Args::parse();

    tracing::info!("Starting uniteller-server v{}", env!("CARGO_PKG_VERSION"));

    let config_loader = Arc::new(ConfigLoader::new(&args.config, args.listen));
    let loaded_config = config_loader.load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;

    let listen_addr = loaded_config.server.listen;
    tracing::info!("Configuration loaded from {:?}", args.config);

    let status_source = ResultsClient::new(
        loaded_config.provider.endpoints.results_url.clone(),
        loaded_config.provider.timeout,
    )?
    .with_max_attempts(loaded_config.provider.max_attempts);

    let shared_config = loaded_config.into_shared();

    let orders = MemoryOrderBook::new();
    if let Some(path) = &args.orders {
        let count = preload_orders(&orders, path).await?;
        tracing::info!(count, "Preloaded orders from {:?}", path);
    }

    let state = AppState::new(
        shared_config,
        Arc::new(orders),
        Arc::new(status_source),
        config_loader.clone(),
    );

    // Spawn config reload handler (listens for SIGHUP)
    let shutdown_notify = spawn_config_reload_handler(state.clone(), config_loader);

    let router = build_router(state);

    tracing::info!("Starting HTTP server on {}", listen_addr);
    let result = run_server(router, listen_addr).await;

    shutdown_notify.notify_one();
    tracing::info!("Server shutdown complete");

    result.map_err(Into::into)
}

async fn preload_orders(book: &MemoryOrderBook, path: &Path) -> anyhow::Result<usize> {
    let content = std::fs::read_to_string(path)?;
    let orders: Vec<Order> = serde_json::from_str(&content)?;
    let count = orders.len();
    for order in orders {
        book.insert(order).await;
    }
    Ok(count)
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,uniteller_sdk=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
