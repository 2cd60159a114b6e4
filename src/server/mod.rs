//! HTTP API over the transcription pipeline
//!
//! Serves the transcript endpoints consumed by the web front end.

use anyhow::Context;
use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::transcribe::TranscriptionPipeline;

pub mod handlers;

use handlers::{fallback_transcript, health_check, metadata, transcribe, youtube_transcript};

/// Shared state for all handlers
pub struct AppState {
    pub pipeline: TranscriptionPipeline,
}

impl AppState {
    pub fn new(pipeline: TranscriptionPipeline) -> Self {
        Self { pipeline }
    }
}

/// Create the Axum router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::ACCEPT, header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health_check))
        .route("/api/youtube-transcript", get(youtube_transcript))
        .route("/api/fallback-transcript", get(fallback_transcript))
        .route("/api/transcribe", get(transcribe))
        .route("/api/metadata", get(metadata))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Bind and serve until the process is stopped
pub async fn serve(config: Config, bind: Option<String>) -> crate::Result<()> {
    let bind = bind.unwrap_or_else(|| config.server.bind.clone());
    let addr: SocketAddr = bind
        .parse()
        .with_context(|| format!("Invalid bind address: {}", bind))?;

    let pipeline = TranscriptionPipeline::new(config)?;
    let app = create_router(Arc::new(AppState::new(pipeline)));

    tracing::info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("HTTP server failed")?;

    Ok(())
}
