//! Handlers for notes.
//!
//! Provides endpoints for creating, listing, updating, deleting, pinning and
//! searching notes.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use quicknotes_core::search::normalize_query;
use quicknotes_db::models::note::{CreateNote, UpdateNote};

use super::parse_id;
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::query::{NoteListParams, SearchParams};
use crate::response::MessageResponse;
use crate::state::AppState;

const ENTITY: &str = "Note";

/// GET /notes?notebookId=&pinned=&limit=
///
/// Most recently updated first. `notebookId=null` selects unfiled notes.
pub async fn list_notes(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<NoteListParams>,
) -> AppResult<impl IntoResponse> {
    let filter = params.into_filter()?;
    let notes = state.notes.list(&auth.user_id, &filter).await?;
    Ok(Json(notes))
}

/// GET /notes/search?q=
pub async fn search_notes(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<impl IntoResponse> {
    let query = params
        .q
        .as_deref()
        .and_then(normalize_query)
        .ok_or_else(|| AppError::BadRequest("Search query required".into()))?;

    let notes = state.notes.search(&auth.user_id, query).await?;

    tracing::debug!(user_id = %auth.user_id, hits = notes.len(), "Note search");

    Ok(Json(notes))
}

/// POST /notes
pub async fn create_note(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateNote>,
) -> AppResult<impl IntoResponse> {
    let note = state.notes.create(&auth.user_id, input).await?;

    tracing::info!(
        user_id = %auth.user_id,
        note_id = %note.id,
        notebook_id = ?note.notebook_id,
        "Note created"
    );

    Ok((StatusCode::CREATED, Json(note)))
}

/// GET /notes/{id}
pub async fn get_note(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let id = parse_id(ENTITY, &id)?;
    let note = state.notes.get(&auth.user_id, id).await?;
    Ok(Json(note))
}

/// PUT /notes/{id}
///
/// Partial update. A `notebookId` key moves the note; `null` unfiles it.
pub async fn update_note(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(input): AppJson<UpdateNote>,
) -> AppResult<impl IntoResponse> {
    let id = parse_id(ENTITY, &id)?;
    let note = state.notes.update(&auth.user_id, id, input).await?;

    tracing::info!(user_id = %auth.user_id, note_id = %id, "Note updated");

    Ok(Json(note))
}

/// PATCH /notes/{id}/pin
///
/// Toggle the pinned state of a note.
pub async fn toggle_pin(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let id = parse_id(ENTITY, &id)?;
    let note = state.notes.toggle_pin(&auth.user_id, id).await?;

    tracing::info!(
        user_id = %auth.user_id,
        note_id = %id,
        is_pinned = note.is_pinned,
        "Note pin toggled"
    );

    Ok(Json(note))
}

/// DELETE /notes/{id}
pub async fn delete_note(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let id = parse_id(ENTITY, &id)?;
    state.notes.delete(&auth.user_id, id).await?;

    tracing::info!(user_id = %auth.user_id, note_id = %id, "Note deleted");

    Ok(Json(MessageResponse {
        message: "Note deleted successfully",
    }))
}
