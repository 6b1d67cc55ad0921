mod config;
mod db;
mod errors;
mod extraction;
mod labeling;
mod llm_client;
mod matching;
mod models;
mod routes;
mod state;
mod storage;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, StorageBackend};
use crate::db::{create_pool, ensure_schema};
use crate::llm_client::LlmClient;
use crate::matching::analyzer::Analyzer;
use crate::matching::service::MatchService;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::memory::{MemoryBlobStore, MemoryIndexStore};
use crate::storage::postgres::PgIndexStore;
use crate::storage::s3::S3BlobStore;
use crate::storage::{BlobStore, IndexStore, ResultStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Career Copilot API v{}", env!("CARGO_PKG_VERSION"));

    let (blobs, index) = build_stores(&config).await?;
    let results = Arc::new(ResultStore::new(blobs, index, config.s3_bucket.clone()));
    info!(
        "Result store ready ({:?} backend, bucket {})",
        config.storage_backend,
        results.bucket()
    );

    // Initialize LLM client
    let llm = LlmClient::new(
        config.ollama_url.clone(),
        config.ollama_model.clone(),
        config.llm_timeout,
    )
    .context("Failed to build LLM HTTP client")?;
    info!(
        "LLM client initialized (model: {}, timeout: {:?})",
        llm.model(),
        config.llm_timeout
    );

    let matcher = Arc::new(MatchService::new(
        Analyzer::new(Arc::new(llm), config.llm_timeout),
        results.clone(),
    ));

    let state = AppState {
        matcher,
        results,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Connects the blob and index backends selected by `STORAGE_BACKEND`,
/// creating the bucket and tables when they are missing.
async fn build_stores(config: &Config) -> Result<(Arc<dyn BlobStore>, Arc<dyn IndexStore>)> {
    match config.storage_backend {
        StorageBackend::Remote => {
            let database_url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL is required for the remote storage backend")?;
            let pool = create_pool(database_url).await?;
            ensure_schema(&pool).await?;

            let s3 = S3BlobStore::connect(config).await;
            s3.ensure_bucket(&config.s3_bucket)
                .await
                .context("Failed to prepare result bucket")?;
            info!("S3 client initialized ({})", config.s3_endpoint);

            Ok((Arc::new(s3), Arc::new(PgIndexStore::new(pool))))
        }
        StorageBackend::Memory => {
            info!("Using in-memory storage; results are lost on restart");
            Ok((
                Arc::new(MemoryBlobStore::default()),
                Arc::new(MemoryIndexStore::default()),
            ))
        }
    }
}
