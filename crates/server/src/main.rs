use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use anihub_core::{
    create_event_loop, create_notifier, load_config, validate_config, Catalog, CatalogStore,
    Dispatcher, JsonFileStore,
};
use anihub_server::{api::create_router, state::AppState};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Buffer size for the inbound event channel
const EVENT_BUFFER_SIZE: usize = 1000;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("ANIHUB_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    validate_config(&config).context("Configuration validation failed")?;

    let config_json = serde_json::to_string(&config).unwrap_or_default();
    let config_hash = format!("{:x}", Sha256::digest(config_json.as_bytes()));
    info!(
        version = VERSION,
        config_hash = &config_hash[..16],
        "Configuration loaded successfully"
    );
    info!("Operator id: {}", config.operator.id);
    match config.feed.channel_id {
        Some(channel) => info!("Harvesting posts from channel {}", channel),
        None => info!("No feed channel configured, ingestion disabled"),
    }
    info!("Catalog path: {:?}", config.storage.path);

    // Catalog over the JSON document
    let store: Arc<dyn CatalogStore> = Arc::new(JsonFileStore::new(&config.storage.path));
    let catalog = Arc::new(Catalog::new(store));
    let entries = catalog.entries().context("Failed to read catalog")?;
    info!("Catalog loaded with {} entries", entries.len());

    let notifier = create_notifier(&config.notify).context("Failed to create notifier")?;
    info!("Using notifier: {}", notifier.name());

    let dispatcher = Dispatcher::new(&config, Arc::clone(&catalog), notifier)
        .context("Failed to create dispatcher")?;

    // Single consumer for every inbound event
    let (events, event_loop) = create_event_loop(
        dispatcher,
        EVENT_BUFFER_SIZE,
        Duration::from_secs(config.wizard.sweep_interval_secs),
    );
    let loop_handle = tokio::spawn(event_loop.run());
    info!("Event loop started");

    let state = Arc::new(AppState::new(config.clone(), events, catalog));
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // The router (and every EventHandle it held) is gone; the loop drains and exits.
    info!("Server shutting down...");
    if let Err(e) = loop_handle.await {
        error!("Event loop task failed: {}", e);
    }
    info!("Event loop stopped");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
