use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use networth_api::app::{app, AppState};
use networth_api::config;
use networth_api::database::{DatabaseManager, MemoryStore, PgStore, Store};

#[derive(Parser)]
#[command(name = "networth-api")]
#[command(about = "Net-worth tracker backend with session-gated frontend hosting")]
#[command(version)]
struct Cli {
    #[arg(long, help = "Address to bind (overrides HOST)")]
    host: Option<String>,

    #[arg(long, help = "Port to listen on (overrides PORT)")]
    port: Option<u16>,

    #[arg(long, help = "Use the in-memory store even if DATABASE_URL is set")]
    memory: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let mut config = config::config().clone();
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    tracing::info!("Starting Networth API in {:?} mode", config.environment);

    if config.security.jwt_secret.is_empty() {
        tracing::warn!("JWT_SECRET is not set; every API session will be rejected");
    }

    let pg_store = if cli.memory || DatabaseManager::database_url().is_none() {
        tracing::warn!("Using in-memory store; data is lost on shutdown");
        None
    } else {
        let pool = DatabaseManager::connect(&config.database).await?;
        let store = Arc::new(PgStore::new(pool));
        store.ensure_schema().await?;
        Some(store)
    };

    let store: Arc<dyn Store> = match &pg_store {
        Some(store) => store.clone() as Arc<dyn Store>,
        None => Arc::new(MemoryStore::new()) as Arc<dyn Store>,
    };

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let router = app(AppState::new(store, config));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Networth API listening on http://{}", bind_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(store) = pg_store {
        store.close().await;
        tracing::info!("Closed database pool");
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
