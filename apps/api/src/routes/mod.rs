pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::chat;
use crate::export;
use crate::session;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Session API
        .route(
            "/api/v1/sessions",
            post(session::handlers::handle_create_session),
        )
        .route(
            "/api/v1/sessions/:id",
            get(session::handlers::handle_get_session),
        )
        .route(
            "/api/v1/sessions/:id/artifact",
            get(session::handlers::handle_get_artifact),
        )
        // Chat API (SSE)
        .route(
            "/api/v1/sessions/:id/messages",
            post(chat::handlers::handle_send_message),
        )
        // Export API
        .route(
            "/api/v1/sessions/:id/export",
            post(export::handlers::handle_export),
        )
        .with_state(state)
}
