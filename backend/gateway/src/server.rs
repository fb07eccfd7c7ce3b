//! Main HTTP Gateway Server.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use codelens_agent::{ChatAgent, ChatSession};
use codelens_config::CodeLensConfig;
use codelens_media::UploadPolicy;
use codelens_model::OllamaProvider;
use codelens_understanding::TesseractEngine;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{chat_api, control_ui, health_api};

/// Room for multipart framing and the question field on top of the image itself.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// Application state shared across routes.
///
/// There is one session per running server. Every handler that touches it
/// holds the lock for the whole turn, so turns never interleave.
#[derive(Clone)]
pub struct GatewayState {
    pub agent: ChatAgent,
    pub session: Arc<Mutex<ChatSession>>,
    pub uploads: Arc<UploadPolicy>,
    pub started_at: Instant,
}

impl GatewayState {
    pub fn new(agent: ChatAgent, uploads: UploadPolicy) -> Self {
        Self {
            agent,
            session: Arc::new(Mutex::new(ChatSession::new())),
            uploads: Arc::new(uploads),
            started_at: Instant::now(),
        }
    }

    /// Wire the Ollama client and the Tesseract adapter from config.
    pub fn from_config(config: &CodeLensConfig) -> Self {
        let llm = Arc::new(OllamaProvider::from_config(&config.model));
        let ocr = Arc::new(TesseractEngine::from_config(&config.ocr));
        let uploads = UploadPolicy::new(
            config.uploads.allowed_extensions.iter().cloned(),
            config.uploads.max_bytes,
        );
        Self::new(ChatAgent::new(llm, ocr), uploads)
    }
}

/// Build the router with the HTML UI and the JSON API.
pub fn build_router(state: GatewayState) -> Router {
    let body_limit = state.uploads.max_bytes() + FORM_OVERHEAD_BYTES;

    Router::new()
        // Web UI
        .route("/", get(control_ui::index))
        .route("/submit", post(control_ui::submit))
        .route("/clear-history", post(control_ui::clear_history))
        // JSON API
        .route("/api/health", get(health_api::get_health))
        .route("/api/conversation", get(chat_api::get_conversation))
        .route("/api/history", get(chat_api::get_history))
        .route("/api/ask", post(chat_api::ask))
        .route("/api/explain", post(chat_api::explain))
        .route("/api/clear-history", post(chat_api::clear_history))
        .route("/api/reset", post(chat_api::reset))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn start_server(addr: &str, state: GatewayState) -> Result<()> {
    let app = build_router(state);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(addr = %listener.local_addr()?, "CodeLens UI listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await
        .context("HTTP server error")?;

    Ok(())
}
