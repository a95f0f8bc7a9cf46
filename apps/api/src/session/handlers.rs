//! Axum route handlers for session lifecycle, resume upload and quiz submission.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::{extract_in_background, UploadedDocument};
use crate::outcome::{Notice, Staged};
use crate::profile::personality::classify;
use crate::profile::quiz::{QuizQuestion, QUESTIONS};
use crate::profile::skills::extract_skills;
use crate::profile::{PersonalityLabel, QuizProfile, QuizSubmission, SkillSet};
use crate::render;
use crate::session::{QuizState, ResumeState};
use crate::state::AppState;

const FILE_FIELD: &str = "file";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct SessionCreatedResponse {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub resume: Option<ResumeState>,
    pub quiz: Option<QuizState>,
    pub chat_exchanges: usize,
}

#[derive(Debug, Serialize)]
pub struct ResumeResponse {
    pub filename: String,
    pub resume_text: String,
    pub skills: SkillSet,
    /// Absent when no text was extracted.
    pub markdown: Option<String>,
    pub notice: Option<Notice>,
}

#[derive(Debug, Serialize)]
pub struct QuizResponse {
    pub profile: QuizProfile,
    pub personality: PersonalityLabel,
    pub markdown: String,
    pub notice: Option<Notice>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/quiz
pub async fn handle_get_quiz() -> Json<&'static [QuizQuestion]> {
    Json(&QUESTIONS[..])
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionCreatedResponse>) {
    let handle = state.sessions.create().await;
    let session = handle.lock().await;
    (
        StatusCode::CREATED,
        Json(SessionCreatedResponse {
            session_id: session.id,
            created_at: session.created_at,
        }),
    )
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSummary>, AppError> {
    let handle = state.sessions.get(id).await?;
    let session = handle.lock().await;
    Ok(Json(SessionSummary {
        session_id: session.id,
        created_at: session.created_at,
        resume: session.resume.clone(),
        quiz: session.quiz.clone(),
        chat_exchanges: session.history.len(),
    }))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.dispose(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/sessions/:id/resume
///
/// Multipart upload with a `file` field. Extracts the text, then the skills
/// when any text came out. Extraction and LLM problems come back as a
/// `notice` next to an empty result, never as an HTTP error.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<ResumeResponse>, AppError> {
    let handle = state.sessions.get(id).await?;

    let mut upload: Option<(String, UploadedDocument)> = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let filename = field
            .file_name()
            .map(str::to_string)
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| AppError::Validation("Uploaded file has no filename".to_string()))?;
        let bytes = field.bytes().await?;
        let document = UploadedDocument::from_filename(&filename, bytes);
        upload = Some((filename, document));
        break;
    }

    let (filename, document) = upload.ok_or_else(|| {
        AppError::Validation(format!("Multipart body must contain a '{FILE_FIELD}' field"))
    })?;

    let mut session = handle.lock().await;
    info!(
        "Session {id}: extracting {} bytes from '{filename}'",
        document.bytes.len()
    );

    let extracted = extract_in_background(document).await;
    let skills = if extracted.value.is_empty() {
        Staged::ok(SkillSet::default())
    } else {
        extract_skills(state.llm.as_ref(), &extracted.value).await
    };

    // The first problem is the one the user needs to see.
    let notice = extracted.notice.or(skills.notice);
    let resume = ResumeState {
        filename,
        text: extracted.value,
        skills: skills.value,
    };
    session.resume = Some(resume.clone());

    Ok(Json(ResumeResponse {
        markdown: render::resume_panel(&resume.text, &resume.skills),
        filename: resume.filename,
        resume_text: resume.text,
        skills: resume.skills,
        notice,
    }))
}

/// POST /api/v1/sessions/:id/quiz
///
/// Validates all nine answers first; nothing is stored unless the whole
/// submission is valid.
pub async fn handle_submit_quiz(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(submission): Json<QuizSubmission>,
) -> Result<Json<QuizResponse>, AppError> {
    let handle = state.sessions.get(id).await?;
    let profile = QuizProfile::from_submission(&submission)?;

    let mut session = handle.lock().await;
    let personality = classify(state.llm.as_ref(), &profile).await;

    session.quiz = Some(QuizState {
        profile: profile.clone(),
        personality: personality.value.clone(),
    });

    Ok(Json(QuizResponse {
        markdown: render::personality_panel(&personality.value),
        profile,
        personality: personality.value,
        notice: personality.notice,
    }))
}
