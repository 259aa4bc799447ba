//! Satayoo chat - demo chat service
//!
//! Hosts in-memory chat sessions backed by a mock or OpenAI-compatible
//! response backend, and records download beacons.

mod analytics;
mod api;
mod chat;
mod config;
mod llm;
mod runtime;

use api::{create_router, AppState};
use config::{AppConfig, BackendConfig};
use runtime::{SessionManager, CLEANUP_INTERVAL};
use std::net::SocketAddr;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "satayoo_chat=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let config = AppConfig::from_env()?;

    match &config.backend {
        BackendConfig::Mock { latency, .. } => {
            tracing::warn!(
                latency_ms = %latency.as_millis(),
                "Using mock backend. Set SATAYOO_BACKEND=openai for real answers."
            );
        }
        BackendConfig::OpenAi(openai) => {
            tracing::info!(endpoint = %openai.endpoint, model = %openai.model, "Using OpenAI backend");
        }
    }

    let client = config.response_client()?;
    let analytics = config.analytics_sink()?;
    if config.analytics_endpoint.is_none() {
        tracing::info!("No analytics endpoint configured; downloads are logged only");
    }

    // Create application state
    let sessions = SessionManager::new(client, config.options, config.text.clone())
        .with_idle_timeout(config.session_idle_timeout);
    let state = AppState::new(sessions, analytics);
    SessionManager::start_cleanup(&state.sessions, CLEANUP_INTERVAL);

    // Create router
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let compression = CompressionLayer::new()
        .gzip(true)
        .br(true)
        .deflate(true)
        .zstd(true);

    let app = create_router(state)
        .layer(cors)
        .layer(compression)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Satayoo chat server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
