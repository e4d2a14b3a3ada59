use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::editor::session::EditorSession;
use crate::errors::AppError;
use crate::models::resume::{ResumeRecord, ResumeRow};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SaveResumeRequest {
    /// Whose editor session to save from.
    pub owner: Uuid,
    #[serde(default)]
    pub is_public: bool,
}

/// The record a session would save right now: current draft plus the
/// selected layout template.
pub fn record_from_session(
    session: &EditorSession,
    is_public: bool,
) -> Result<ResumeRecord, AppError> {
    let draft = session.draft();
    Ok(ResumeRecord {
        user_id: session.owner(),
        title: draft.title.clone(),
        data: serde_json::to_value(draft).map_err(anyhow::Error::from)?,
        template: session.settings().layout.template.as_str().to_string(),
        is_public,
    })
}

async fn session_record(state: &AppState, req: &SaveResumeRequest) -> Result<ResumeRecord, AppError> {
    let session = state
        .sessions
        .lock(req.owner)
        .await
        .ok_or_else(|| AppError::NotFound(format!("No open editor session for {}", req.owner)))?;
    record_from_session(&session, req.is_public)
}

/// POST /api/v1/resumes
pub async fn handle_create_resume(
    State(state): State<AppState>,
    Json(req): Json<SaveResumeRequest>,
) -> Result<(StatusCode, Json<ResumeRow>), AppError> {
    let record = session_record(&state, &req).await?;
    let row = state.resumes.create(record).await?;
    tracing::info!("Created resume {} for {}", row.id, row.user_id);
    Ok((StatusCode::CREATED, Json(row)))
}

/// PUT /api/v1/resumes/:id
pub async fn handle_update_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SaveResumeRequest>,
) -> Result<Json<ResumeRow>, AppError> {
    let record = session_record(&state, &req).await?;
    let row = state.resumes.update(id, record).await?;
    Ok(Json(row))
}
