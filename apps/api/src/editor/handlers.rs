use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ats::{compute_ats_report, AtsReport};
use crate::customization::{CustomizationSettings, SettingsPatch, TemplateKind};
use crate::editor::draft::ResumeDraft;
use crate::editor::session::{EditingEntry, EditorSession, SessionHistory, SessionSaveStatus};
use crate::errors::AppError;
use crate::export::ExportSnapshot;
use crate::sections::registry::{catalog, FieldTemplate};
use crate::sections::{Section, SectionType, ValidationErrors};
use crate::state::AppState;

/// Everything the editor UI renders after a change.
#[derive(Debug, Serialize)]
pub struct EditorView {
    pub owner: Uuid,
    pub settings: CustomizationSettings,
    pub sections: Vec<Section>,
    pub draft: ResumeDraft,
    pub editing: Option<EditingEntry>,
    pub history: SessionHistory,
    pub save_status: SessionSaveStatus,
    /// Id of the section or entry the request created, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<Uuid>,
}

impl EditorView {
    fn of(session: &EditorSession) -> Self {
        Self {
            owner: session.owner(),
            settings: session.settings().clone(),
            sections: session.sections().ordered().into_iter().cloned().collect(),
            draft: session.draft().clone(),
            editing: session.editing(),
            history: session.history(),
            save_status: session.save_status(),
            created: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub history: SessionHistory,
    pub save_status: SessionSaveStatus,
}

#[derive(Debug, Deserialize)]
pub struct AddBuiltinSectionRequest {
    #[serde(rename = "type")]
    pub section_type: SectionType,
}

#[derive(Debug, Deserialize)]
pub struct AddSectionRequest {
    pub template_id: String,
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TitleRequest {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateEntryRequest {
    pub field: String,
    pub value: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

/// Runs `f` against the owner's open session and returns its result with the
/// resulting view.
async fn with_session<R>(
    state: &AppState,
    owner: Uuid,
    f: impl FnOnce(&mut EditorSession) -> R,
) -> Result<(R, EditorView), AppError> {
    let mut session = state
        .sessions
        .lock(owner)
        .await
        .ok_or_else(|| AppError::NotFound(format!("No open editor session for {owner}")))?;
    let out = f(&mut *session);
    Ok((out, EditorView::of(&session)))
}

async fn apply(
    state: &AppState,
    owner: Uuid,
    f: impl FnOnce(&mut EditorSession),
) -> Result<Json<EditorView>, AppError> {
    let ((), view) = with_session(state, owner, f).await?;
    Ok(Json(view))
}

async fn create(
    state: &AppState,
    owner: Uuid,
    what: &str,
    f: impl FnOnce(&mut EditorSession) -> Option<Uuid>,
) -> Result<(StatusCode, Json<EditorView>), AppError> {
    let (created, mut view) = with_session(state, owner, f).await?;
    let id = created.ok_or_else(|| AppError::NotFound(format!("{what} not found")))?;
    view.created = Some(id);
    Ok((StatusCode::CREATED, Json(view)))
}

// ────────────────────────────────────────────────────────────────────────────
// Catalog and lifecycle
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct TemplatesResponse {
    /// Field schema per section type.
    pub sections: Vec<&'static FieldTemplate>,
    /// Visual layouts a resume can be rendered with.
    pub layouts: [TemplateKind; 6],
}

/// GET /api/v1/templates
pub async fn handle_list_templates() -> Json<TemplatesResponse> {
    Json(TemplatesResponse {
        sections: catalog(),
        layouts: TemplateKind::ALL,
    })
}

/// POST /api/v1/editor/:owner
pub async fn handle_open(
    State(state): State<AppState>,
    Path(owner): Path<Uuid>,
) -> Result<Json<EditorView>, AppError> {
    let shared = state.sessions.open(owner).await;
    let session = shared.lock().await;
    Ok(Json(EditorView::of(&session)))
}

/// DELETE /api/v1/editor/:owner
pub async fn handle_close(
    State(state): State<AppState>,
    Path(owner): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.close(owner).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("No open editor session for {owner}")))
    }
}

/// GET /api/v1/editor/:owner
pub async fn handle_view(
    State(state): State<AppState>,
    Path(owner): Path<Uuid>,
) -> Result<Json<EditorView>, AppError> {
    apply(&state, owner, |_| ()).await
}

/// GET /api/v1/editor/:owner/status
pub async fn handle_status(
    State(state): State<AppState>,
    Path(owner): Path<Uuid>,
) -> Result<Json<StatusResponse>, AppError> {
    let (_, view) = with_session(&state, owner, |_| ()).await?;
    Ok(Json(StatusResponse {
        history: view.history,
        save_status: view.save_status,
    }))
}

/// POST /api/v1/editor/:owner/flush
pub async fn handle_flush(
    State(state): State<AppState>,
    Path(owner): Path<Uuid>,
) -> Result<Json<StatusResponse>, AppError> {
    let session = state
        .sessions
        .lock(owner)
        .await
        .ok_or_else(|| AppError::NotFound(format!("No open editor session for {owner}")))?;
    session.flush().await;
    Ok(Json(StatusResponse {
        history: session.history(),
        save_status: session.save_status(),
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Customization settings
// ────────────────────────────────────────────────────────────────────────────

/// PATCH /api/v1/editor/:owner/settings
pub async fn handle_update_settings(
    State(state): State<AppState>,
    Path(owner): Path<Uuid>,
    Json(patch): Json<SettingsPatch>,
) -> Result<Json<EditorView>, AppError> {
    apply(&state, owner, |s| s.update_settings(patch)).await
}

/// POST /api/v1/editor/:owner/settings/sections
pub async fn handle_add_builtin_section(
    State(state): State<AppState>,
    Path(owner): Path<Uuid>,
    Json(req): Json<AddBuiltinSectionRequest>,
) -> Result<(StatusCode, Json<EditorView>), AppError> {
    create(&state, owner, "Section type", |s| {
        Some(s.add_builtin_section(req.section_type))
    })
    .await
}

/// POST /api/v1/editor/:owner/settings/reset
pub async fn handle_reset_settings(
    State(state): State<AppState>,
    Path(owner): Path<Uuid>,
) -> Result<Json<EditorView>, AppError> {
    apply(&state, owner, EditorSession::reset_to_defaults).await
}

/// POST /api/v1/editor/:owner/settings/undo
pub async fn handle_undo_settings(
    State(state): State<AppState>,
    Path(owner): Path<Uuid>,
) -> Result<Json<EditorView>, AppError> {
    apply(&state, owner, |s| {
        s.undo_settings();
    })
    .await
}

/// POST /api/v1/editor/:owner/settings/redo
pub async fn handle_redo_settings(
    State(state): State<AppState>,
    Path(owner): Path<Uuid>,
) -> Result<Json<EditorView>, AppError> {
    apply(&state, owner, |s| {
        s.redo_settings();
    })
    .await
}

// ────────────────────────────────────────────────────────────────────────────
// Dynamic sections
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/editor/:owner/sections
pub async fn handle_add_section(
    State(state): State<AppState>,
    Path(owner): Path<Uuid>,
    Json(req): Json<AddSectionRequest>,
) -> Result<(StatusCode, Json<EditorView>), AppError> {
    if crate::sections::registry::get_template(&req.template_id).is_none() {
        return Err(AppError::Validation(format!(
            "Unknown section template '{}'",
            req.template_id
        )));
    }
    create(&state, owner, "Template", |s| {
        s.add_section(&req.template_id, req.title.as_deref())
    })
    .await
}

/// PUT /api/v1/editor/:owner/sections/order
pub async fn handle_reorder_sections(
    State(state): State<AppState>,
    Path(owner): Path<Uuid>,
    Json(req): Json<ReorderRequest>,
) -> Result<Json<EditorView>, AppError> {
    apply(&state, owner, |s| s.reorder_sections(&req.ids)).await
}

/// POST /api/v1/editor/:owner/sections/undo
pub async fn handle_undo_sections(
    State(state): State<AppState>,
    Path(owner): Path<Uuid>,
) -> Result<Json<EditorView>, AppError> {
    apply(&state, owner, |s| {
        s.undo_sections();
    })
    .await
}

/// POST /api/v1/editor/:owner/sections/redo
pub async fn handle_redo_sections(
    State(state): State<AppState>,
    Path(owner): Path<Uuid>,
) -> Result<Json<EditorView>, AppError> {
    apply(&state, owner, |s| {
        s.redo_sections();
    })
    .await
}

/// DELETE /api/v1/editor/:owner/sections/:section_id
pub async fn handle_delete_section(
    State(state): State<AppState>,
    Path((owner, section_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<EditorView>, AppError> {
    apply(&state, owner, |s| s.delete_section(section_id)).await
}

/// POST /api/v1/editor/:owner/sections/:section_id/visibility
pub async fn handle_toggle_section(
    State(state): State<AppState>,
    Path((owner, section_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<EditorView>, AppError> {
    apply(&state, owner, |s| s.toggle_section_visibility(section_id)).await
}

/// PUT /api/v1/editor/:owner/sections/:section_id/title
pub async fn handle_update_section_title(
    State(state): State<AppState>,
    Path((owner, section_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<TitleRequest>,
) -> Result<Json<EditorView>, AppError> {
    apply(&state, owner, |s| s.update_section_title(section_id, &req.title)).await
}

/// POST /api/v1/editor/:owner/sections/:section_id/entries
pub async fn handle_add_entry(
    State(state): State<AppState>,
    Path((owner, section_id)): Path<(Uuid, Uuid)>,
) -> Result<(StatusCode, Json<EditorView>), AppError> {
    create(&state, owner, "Section", |s| s.add_entry(section_id)).await
}

/// PATCH /api/v1/editor/:owner/sections/:section_id/entries/:entry_id
///
/// 400 when `field` is not part of the section's template.
pub async fn handle_update_entry(
    State(state): State<AppState>,
    Path((owner, section_id, entry_id)): Path<(Uuid, Uuid, Uuid)>,
    Json(req): Json<UpdateEntryRequest>,
) -> Result<Json<EditorView>, AppError> {
    let (known, view) = with_session(&state, owner, |s| {
        let known = s.sections().section(section_id).map_or(true, |section| {
            section.section_type.template().field(&req.field).is_some()
        });
        if known {
            s.update_entry(section_id, entry_id, &req.field, &req.value);
        }
        known
    })
    .await?;
    if !known {
        return Err(AppError::Validation(format!("Unknown field '{}'", req.field)));
    }
    Ok(Json(view))
}

/// DELETE /api/v1/editor/:owner/sections/:section_id/entries/:entry_id
pub async fn handle_delete_entry(
    State(state): State<AppState>,
    Path((owner, section_id, entry_id)): Path<(Uuid, Uuid, Uuid)>,
) -> Result<Json<EditorView>, AppError> {
    apply(&state, owner, |s| s.delete_entry(section_id, entry_id)).await
}

/// POST /api/v1/editor/:owner/sections/:section_id/entries/:entry_id/duplicate
pub async fn handle_duplicate_entry(
    State(state): State<AppState>,
    Path((owner, section_id, entry_id)): Path<(Uuid, Uuid, Uuid)>,
) -> Result<(StatusCode, Json<EditorView>), AppError> {
    create(&state, owner, "Entry", |s| {
        s.duplicate_entry(section_id, entry_id)
    })
    .await
}

/// POST /api/v1/editor/:owner/sections/:section_id/entries/:entry_id/edit
pub async fn handle_start_editing(
    State(state): State<AppState>,
    Path((owner, section_id, entry_id)): Path<(Uuid, Uuid, Uuid)>,
) -> Result<Json<EditorView>, AppError> {
    let (found, view) =
        with_session(&state, owner, |s| s.start_editing(section_id, entry_id)).await?;
    if !found {
        return Err(AppError::NotFound(format!("Entry {entry_id} not found")));
    }
    Ok(Json(view))
}

/// POST /api/v1/editor/:owner/sections/:section_id/entries/:entry_id/save
///
/// 422 with the keyed field errors when the entry is invalid; the entry stays
/// open for editing.
pub async fn handle_save_entry(
    State(state): State<AppState>,
    Path((owner, section_id, entry_id)): Path<(Uuid, Uuid, Uuid)>,
) -> Result<Json<EditorView>, AppError> {
    let (result, view) =
        with_session(&state, owner, |s| s.save_entry(section_id, entry_id)).await?;
    result.map_err(AppError::InvalidEntry)?;
    Ok(Json(view))
}

// ────────────────────────────────────────────────────────────────────────────
// Draft
// ────────────────────────────────────────────────────────────────────────────

/// PUT /api/v1/editor/:owner/draft
pub async fn handle_replace_draft(
    State(state): State<AppState>,
    Path(owner): Path<Uuid>,
    Json(draft): Json<ResumeDraft>,
) -> Result<Json<EditorView>, AppError> {
    apply(&state, owner, |s| {
        s.replace_draft(draft);
    })
    .await
}

/// POST /api/v1/editor/:owner/draft/undo
pub async fn handle_undo_draft(
    State(state): State<AppState>,
    Path(owner): Path<Uuid>,
) -> Result<Json<EditorView>, AppError> {
    apply(&state, owner, |s| {
        s.undo_draft();
    })
    .await
}

/// POST /api/v1/editor/:owner/draft/redo
pub async fn handle_redo_draft(
    State(state): State<AppState>,
    Path(owner): Path<Uuid>,
) -> Result<Json<EditorView>, AppError> {
    apply(&state, owner, |s| {
        s.redo_draft();
    })
    .await
}

/// GET /api/v1/editor/:owner/draft/validation
pub async fn handle_validate_draft(
    State(state): State<AppState>,
    Path(owner): Path<Uuid>,
) -> Result<Json<ValidationErrors>, AppError> {
    let (errors, _) = with_session(&state, owner, |s| s.draft().validate()).await?;
    Ok(Json(errors))
}

// ────────────────────────────────────────────────────────────────────────────
// Export and scoring
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/editor/:owner/export
pub async fn handle_export(
    State(state): State<AppState>,
    Path(owner): Path<Uuid>,
) -> Result<Json<ExportSnapshot>, AppError> {
    let (snapshot, _) = with_session(&state, owner, |s| s.export()).await?;
    Ok(Json(snapshot))
}

/// GET /api/v1/editor/:owner/ats
pub async fn handle_ats(
    State(state): State<AppState>,
    Path(owner): Path<Uuid>,
) -> Result<Json<AtsReport>, AppError> {
    let (snapshot, _) = with_session(&state, owner, |s| s.export()).await?;
    Ok(Json(compute_ats_report(&snapshot)))
}
