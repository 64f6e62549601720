use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::notes;
use crate::state::AppState;

/// Note routes mounted at `/notes`.
///
/// ```text
/// GET    /            -> list_notes (?notebookId=&pinned=&limit=)
/// POST   /            -> create_note
/// GET    /search      -> search_notes (?q=)
/// GET    /{id}        -> get_note
/// PUT    /{id}        -> update_note
/// DELETE /{id}        -> delete_note
/// PATCH  /{id}/pin    -> toggle_pin
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(notes::list_notes).post(notes::create_note))
        .route("/search", get(notes::search_notes))
        .route(
            "/{id}",
            get(notes::get_note)
                .put(notes::update_note)
                .delete(notes::delete_note),
        )
        .route("/{id}/pin", patch(notes::toggle_pin))
}
