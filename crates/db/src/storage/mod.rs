//! Storage backends.
//!
//! Stores never talk to a database directly; they go through
//! [`NoteStorage`], which is implemented by [`postgres::PgStorage`] for
//! production and [`memory::MemoryStorage`] for local runs and tests.
//!
//! Every method is scoped by `user_id`: a row owned by another user is
//! indistinguishable from a missing one. Each call is atomic. Notebook moves
//! and deletes touch several rows and hold a per-user lock while they do.

use async_trait::async_trait;
use quicknotes_core::types::{DbId, Timestamp};

use crate::error::StorageError;
use crate::models::note::{Note, NoteListFilter, RefiledNote, UpdateNote};
use crate::models::notebook::{Notebook, NotebookUpdate, RemovedNotebook, UpdateNotebook};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStorage;
pub use postgres::PgStorage;

pub type StorageResult<T> = Result<T, StorageError>;

#[async_trait]
pub trait NoteStorage: Send + Sync {
    /// Short backend label for health reporting.
    fn backend_name(&self) -> &'static str;

    /// Confirm the backend can serve requests.
    async fn health_check(&self) -> StorageResult<()>;

    // -- notebooks ---------------------------------------------------------

    async fn insert_notebook(&self, notebook: &Notebook) -> StorageResult<Notebook>;

    async fn find_notebook(&self, user_id: &str, id: DbId) -> StorageResult<Option<Notebook>>;

    /// All of a user's notebooks, oldest first.
    async fn list_notebooks(&self, user_id: &str) -> StorageResult<Vec<Notebook>>;

    /// Apply a partial update. `input.name` is expected to be normalized.
    ///
    /// When `input.parent_id` is present the move is checked with
    /// [`MoveRejection::check`](crate::models::notebook::MoveRejection::check)
    /// in the same atomic step as the write.
    async fn update_notebook(
        &self,
        user_id: &str,
        id: DbId,
        input: &UpdateNotebook,
        now: Timestamp,
    ) -> StorageResult<NotebookUpdate>;

    /// Remove a notebook and, in the same atomic step, point its direct
    /// children and notes at its parent (root or unfiled when it had none).
    async fn delete_notebook(
        &self,
        user_id: &str,
        id: DbId,
    ) -> StorageResult<Option<RemovedNotebook>>;

    /// Atomically add `delta` to a notebook's `note_count`, never going
    /// below zero. Returns `false` if the notebook does not exist.
    async fn adjust_note_count(&self, user_id: &str, id: DbId, delta: i64) -> StorageResult<bool>;

    /// Atomically add `delta` to a notebook's `sub_notebook_count`, never
    /// going below zero. Returns `false` if the notebook does not exist.
    async fn adjust_sub_notebook_count(
        &self,
        user_id: &str,
        id: DbId,
        delta: i64,
    ) -> StorageResult<bool>;

    // -- notes -------------------------------------------------------------

    async fn insert_note(&self, note: &Note) -> StorageResult<Note>;

    async fn find_note(&self, user_id: &str, id: DbId) -> StorageResult<Option<Note>>;

    /// Notes matching `filter`, most recently updated first.
    async fn list_notes(&self, user_id: &str, filter: &NoteListFilter) -> StorageResult<Vec<Note>>;

    /// Apply a partial update. Returns the written row with the notebook it
    /// was filed in before the write.
    async fn update_note(
        &self,
        user_id: &str,
        id: DbId,
        input: &UpdateNote,
        now: Timestamp,
    ) -> StorageResult<Option<RefiledNote>>;

    /// Flip `is_pinned` and stamp `updated_at` in one write.
    async fn toggle_note_pin(
        &self,
        user_id: &str,
        id: DbId,
        now: Timestamp,
    ) -> StorageResult<Option<Note>>;

    /// Remove a note, returning the removed row.
    async fn delete_note(&self, user_id: &str, id: DbId) -> StorageResult<Option<Note>>;

    /// Notes whose title, content or OCR text contains `query`, ignoring
    /// case. `query` must already be trimmed and non-empty. Most recently
    /// updated first.
    async fn search_notes(&self, user_id: &str, query: &str) -> StorageResult<Vec<Note>>;
}
