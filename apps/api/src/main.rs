mod chat;
mod config;
mod errors;
mod export;
mod extract;
mod llm_client;
mod models;
mod routes;
mod session;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::export::html::HtmlDocumentRenderer;
use crate::export::renderer::ArtifactRenderer;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::session::registry::SessionRegistry;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (panics on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Vitae API v{}", env!("CARGO_PKG_VERSION"));

    // Validate artifact markers before anything that could use them
    let delimiters = config.delimiter_pair()?;
    info!(
        "Artifact markers: {} .. {}",
        delimiters.start(),
        delimiters.end()
    );

    // Initialize LLM client
    let llm = LlmClient::new(config.anthropic_api_key.clone());
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Initialize session registry
    let sessions = Arc::new(SessionRegistry::new());

    // Initialize artifact renderer (HtmlDocumentRenderer by default)
    let renderer: Arc<dyn ArtifactRenderer> = Arc::new(HtmlDocumentRenderer::new());

    // Build app state
    let state = AppState {
        sessions,
        llm,
        renderer,
        delimiters,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
