pub mod health;
pub mod notebooks;
pub mod notes;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /notebooks                  tree (GET), create (POST)
/// /notebooks/flat             flat list, oldest first
/// /notebooks/{id}             get, update/move (PUT), delete
///
/// /notes                      list (GET), create (POST)
/// /notes/search               substring search (?q=)
/// /notes/{id}                 get, update (PUT), delete
/// /notes/{id}/pin             toggle pin (PATCH)
/// ```
///
/// Every route requires identity (`x-user-id` or a verified bearer token).
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/notebooks", notebooks::router())
        .nest("/notes", notes::router())
}
