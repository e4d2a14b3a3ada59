mod ats;
mod config;
mod customization;
mod db;
mod editor;
mod errors;
mod export;
mod models;
mod persistence;
mod resumes;
mod routes;
mod sections;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::Config;
use crate::db::create_pool;
use crate::editor::sessions::SessionRegistry;
use crate::persistence::{FileStore, KeyValueStore, MemoryStore, RedisStore};
use crate::resumes::repository::PgResumeRepository;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Folio API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Editor snapshots: Redis when configured, otherwise JSON files on disk
    let store = build_store(&config)?;

    let sessions = SessionRegistry::new(store, config.editor);
    info!(
        "Editor sessions: history limit {}, debounce {:?}/{:?}/{:?}",
        config.editor.history_limit,
        config.editor.customization_debounce,
        config.editor.sections_debounce,
        config.editor.draft_debounce
    );

    // Build app state
    let state = AppState {
        config: config.clone(),
        sessions: sessions.clone(),
        resumes: Arc::new(PgResumeRepository::new(db)),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client has a fixed domain

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Pending autosaves are written before exit
    sessions.close_all().await;
    info!("Shutdown complete");

    Ok(())
}

/// `STORE_DIR` value that selects the in-process store.
const MEMORY_STORE_DIR: &str = ":memory:";

fn build_store(config: &Config) -> Result<Arc<dyn KeyValueStore>> {
    match &config.redis_url {
        Some(url) => {
            let client = redis::Client::open(url.as_str())
                .with_context(|| format!("Invalid REDIS_URL '{url}'"))?;
            info!("Editor store: Redis");
            Ok(Arc::new(RedisStore::new(client)))
        }
        None if config.store_dir.as_os_str() == MEMORY_STORE_DIR => {
            warn!("Editor store: process memory; snapshots are lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
        None => {
            info!("Editor store: files under {}", config.store_dir.display());
            Ok(Arc::new(FileStore::new(config.store_dir.clone())))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
