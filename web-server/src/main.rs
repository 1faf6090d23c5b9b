//! URL Guard Server
//!
//! HTTP front end for the URL classification pipeline.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                     URL GUARD SERVER                     │
//! ├──────────────────────────────────────────────────────────┤
//! │  ┌───────────┐   ┌──────────────────────────────────┐    │
//! │  │  HTTP     │──►│  Pipeline (urlguard-core)        │    │
//! │  │  (Axum)   │   │  validate ─► encode ─► ONNX      │    │
//! │  └─────┬─────┘   │  ─► bands ─► Gemini ─► recorder  │    │
//! │        │         └────────────────┬─────────────────┘    │
//! │        └──────────────┬───────────┘                      │
//! │                       ▼                                  │
//! │                ┌─────────────┐                           │
//! │                │   SQLite    │                           │
//! │                └─────────────┘                           │
//! └──────────────────────────────────────────────────────────┘
//! ```

mod config;
mod models;
mod handlers;
mod error;


use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use urlguard_core::logic::model::verify_checksum;
use urlguard_core::{
    DisabledExplainer, ExplanationService, GeminiClient, OnnxClassifier, Pipeline, SqliteRecorder,
    Vocabulary,
};

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "urlguard_server=debug,urlguard_core=info,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);
    if config.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("URL Guard Server v{} starting...", env!("CARGO_PKG_VERSION"));
    tracing::info!("Result log: {}", config.database_path);

    // Build application state
    let state = build_state(config.clone())?;

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", config.host, config.port))?;
    tracing::info!("🚀 Server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    pub history: Arc<SqliteRecorder>,
    pub config: config::Config,
}

/// Load model, vocabulary and result log; a missing artifact aborts startup
fn build_state(config: config::Config) -> anyhow::Result<AppState> {
    if let Some(expected) = &config.model_sha256 {
        verify_checksum(&config.model_path, expected)
            .with_context(|| format!("Model checksum check failed for {}", config.model_path))?;
    }

    let classifier = OnnxClassifier::load(&config.model_path)
        .with_context(|| format!("Failed to load model {}", config.model_path))?;

    let vocabulary = Vocabulary::load(&config.vocab_path)
        .with_context(|| format!("Failed to load vocabulary {}", config.vocab_path))?;
    tracing::info!("Vocabulary: {} characters", vocabulary.len());

    let explainer: Arc<dyn ExplanationService> = match config.gemini.clone() {
        Some(gemini) => Arc::new(GeminiClient::new(gemini)?),
        None => {
            tracing::warn!("GEMINI_API_KEY not set, explanations disabled");
            Arc::new(DisabledExplainer)
        }
    };

    let history = Arc::new(
        SqliteRecorder::open(&config.database_path)
            .with_context(|| format!("Failed to open result log {}", config.database_path))?,
    );

    let pipeline = Pipeline::new(
        Arc::new(vocabulary),
        Arc::new(classifier),
        explainer,
        history.clone(),
        config.pipeline.clone(),
    )
    .context("Invalid pipeline configuration")?;

    Ok(AppState {
        pipeline: Arc::new(pipeline),
        history,
        config,
    })
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::home::index))
        .route("/health", get(handlers::health::check))
        .route("/predict", post(handlers::predict::predict))
        .route("/api/v1/predict", post(handlers::predict::predict))
        .route("/api/v1/history", get(handlers::history::list))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
