use axum::routing::get;
use axum::Router;

use crate::handlers::notebooks;
use crate::state::AppState;

/// Notebook routes mounted at `/notebooks`.
///
/// ```text
/// GET    /          -> get_tree (?includeNotes=true)
/// POST   /          -> create_notebook
/// GET    /flat      -> list_flat
/// GET    /{id}      -> get_notebook
/// PUT    /{id}      -> update_notebook
/// DELETE /{id}      -> delete_notebook
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(notebooks::get_tree).post(notebooks::create_notebook),
        )
        .route("/flat", get(notebooks::list_flat))
        .route(
            "/{id}",
            get(notebooks::get_notebook)
                .put(notebooks::update_notebook)
                .delete(notebooks::delete_notebook),
        )
}
