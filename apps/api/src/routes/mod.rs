pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::advice::handlers as advice;
use crate::chat::handlers as chat;
use crate::session::handlers as session;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/quiz", get(session::handle_get_quiz))
        // Session lifecycle
        .route("/api/v1/sessions", post(session::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(session::handle_get_session).delete(session::handle_delete_session),
        )
        // Profile inputs
        .route(
            "/api/v1/sessions/:id/resume",
            post(session::handle_upload_resume).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/api/v1/sessions/:id/quiz", post(session::handle_submit_quiz))
        // Advice
        .route(
            "/api/v1/sessions/:id/recommendations",
            post(advice::handle_recommendations),
        )
        .route("/api/v1/sessions/:id/roadmap", post(advice::handle_roadmap))
        // Chat
        .route(
            "/api/v1/sessions/:id/chat",
            post(chat::handle_chat).get(chat::handle_chat_history),
        )
        .with_state(state)
}
