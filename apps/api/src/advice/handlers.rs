//! Axum route handlers for recommendations and the career roadmap.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::advice::recommendations::{recommend, Recommendations};
use crate::advice::roadmap::{roadmap, Roadmap};
use crate::errors::AppError;
use crate::outcome::Notice;
use crate::profile::{PersonalityLabel, SkillSet};
use crate::render;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub recommendations: Recommendations,
    pub markdown: String,
    pub notice: Option<Notice>,
}

#[derive(Debug, Serialize)]
pub struct RoadmapResponse {
    pub roadmap: Roadmap,
    pub markdown: String,
    pub notice: Option<Notice>,
}

/// Reads the session's advice inputs, refusing sessions with neither a
/// resume upload nor a quiz submission.
async fn advice_inputs(state: &AppState, id: Uuid) -> Result<(SkillSet, PersonalityLabel), AppError> {
    let handle = state.sessions.get(id).await?;
    let session = handle.lock().await;
    if !session.has_profile_input() {
        return Err(AppError::UnprocessableEntity(
            "Upload a resume or submit the quiz before requesting advice".to_string(),
        ));
    }
    Ok((session.skills(), session.personality()))
}

/// POST /api/v1/sessions/:id/recommendations
pub async fn handle_recommendations(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RecommendationsResponse>, AppError> {
    let (skills, personality) = advice_inputs(&state, id).await?;
    let staged = recommend(state.llm.as_ref(), &skills, &personality).await;

    Ok(Json(RecommendationsResponse {
        markdown: render::recommendations_panel(&staged.value),
        recommendations: staged.value,
        notice: staged.notice,
    }))
}

/// POST /api/v1/sessions/:id/roadmap
pub async fn handle_roadmap(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RoadmapResponse>, AppError> {
    let (skills, personality) = advice_inputs(&state, id).await?;
    let staged = roadmap(state.llm.as_ref(), &skills, &personality).await;

    Ok(Json(RoadmapResponse {
        markdown: render::roadmap_panel(&staged.value),
        roadmap: staged.value,
        notice: staged.notice,
    }))
}
