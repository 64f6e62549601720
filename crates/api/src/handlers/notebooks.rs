//! Handlers for notebooks.
//!
//! Provides the notebook tree, the flat list, and single-notebook CRUD.
//! Moves go through `PUT` with a `parentId` key.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use quicknotes_db::models::notebook::{CreateNotebook, UpdateNotebook};

use super::parse_id;
use crate::error::AppResult;
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::query::TreeParams;
use crate::response::MessageResponse;
use crate::state::AppState;

const ENTITY: &str = "Notebook";

/// GET /notebooks?includeNotes=
///
/// The caller's notebooks as a forest, oldest siblings first.
pub async fn get_tree(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<TreeParams>,
) -> AppResult<impl IntoResponse> {
    let tree = state
        .notebooks
        .tree(&auth.user_id, params.include_notes())
        .await?;
    Ok(Json(tree))
}

/// GET /notebooks/flat
pub async fn list_flat(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let notebooks = state.notebooks.list(&auth.user_id).await?;
    Ok(Json(notebooks))
}

/// POST /notebooks
pub async fn create_notebook(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateNotebook>,
) -> AppResult<impl IntoResponse> {
    let notebook = state.notebooks.create(&auth.user_id, input).await?;

    tracing::info!(
        user_id = %auth.user_id,
        notebook_id = %notebook.id,
        parent_id = ?notebook.parent_id,
        "Notebook created"
    );

    Ok((StatusCode::CREATED, Json(notebook)))
}

/// GET /notebooks/{id}
pub async fn get_notebook(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let id = parse_id(ENTITY, &id)?;
    let notebook = state.notebooks.get(&auth.user_id, id).await?;
    Ok(Json(notebook))
}

/// PUT /notebooks/{id}
pub async fn update_notebook(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(input): AppJson<UpdateNotebook>,
) -> AppResult<impl IntoResponse> {
    let id = parse_id(ENTITY, &id)?;
    let moved = input.parent_id.is_some();
    let notebook = state.notebooks.update(&auth.user_id, id, input).await?;

    tracing::info!(
        user_id = %auth.user_id,
        notebook_id = %id,
        moved,
        "Notebook updated"
    );

    Ok(Json(notebook))
}

/// DELETE /notebooks/{id}
///
/// Child notebooks and notes move up to the deleted notebook's parent.
pub async fn delete_notebook(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let id = parse_id(ENTITY, &id)?;
    state.notebooks.delete(&auth.user_id, id).await?;

    tracing::info!(user_id = %auth.user_id, notebook_id = %id, "Notebook deleted");

    Ok(Json(MessageResponse {
        message: "Notebook deleted successfully",
    }))
}
