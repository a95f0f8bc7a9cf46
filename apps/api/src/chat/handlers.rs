//! Axum route handlers for the chat panel.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::chat::history::ChatExchange;
use crate::chat::responder::respond;
use crate::errors::AppError;
use crate::outcome::Notice;
use crate::render;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    pub exchanges: usize,
    pub notice: Option<Notice>,
}

#[derive(Debug, Serialize)]
pub struct ChatHistoryResponse {
    /// Most recent first.
    pub exchanges: Vec<ChatExchange>,
    pub markdown: String,
}

/// POST /api/v1/sessions/:id/chat
pub async fn handle_chat(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let message = request.message.trim();
    if message.is_empty() {
        return Err(AppError::Validation("message cannot be empty".to_string()));
    }

    let handle = state.sessions.get(id).await?;
    let mut session = handle.lock().await;
    let staged = respond(
        state.llm.as_ref(),
        &mut session.history,
        message,
        state.config.chat_context_pairs,
    )
    .await;

    Ok(Json(ChatResponse {
        reply: staged.value,
        exchanges: session.history.len(),
        notice: staged.notice,
    }))
}

/// GET /api/v1/sessions/:id/chat
pub async fn handle_chat_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ChatHistoryResponse>, AppError> {
    let handle = state.sessions.get(id).await?;
    let session = handle.lock().await;

    Ok(Json(ChatHistoryResponse {
        exchanges: session.history.most_recent_first().cloned().collect(),
        markdown: render::transcript(&session.history),
    }))
}
