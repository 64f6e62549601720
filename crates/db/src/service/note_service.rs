//! Note store.

use std::sync::Arc;

use chrono::Utc;
use quicknotes_core::error::CoreError;
use quicknotes_core::note::title_or_default;
use quicknotes_core::search::normalize_query;
use quicknotes_core::types::{new_id, DbId};

use super::{CounterMaintainer, ServiceResult};
use crate::models::note::{CreateNote, Note, NoteListFilter, UpdateNote};
use crate::storage::NoteStorage;

#[derive(Clone)]
pub struct NoteService {
    storage: Arc<dyn NoteStorage>,
    counters: CounterMaintainer,
}

impl NoteService {
    pub fn new(storage: Arc<dyn NoteStorage>) -> Self {
        let counters = CounterMaintainer::new(Arc::clone(&storage));
        Self { storage, counters }
    }

    pub async fn list(&self, user_id: &str, filter: &NoteListFilter) -> ServiceResult<Vec<Note>> {
        Ok(self.storage.list_notes(user_id, filter).await?)
    }

    pub async fn get(&self, user_id: &str, id: DbId) -> ServiceResult<Note> {
        self.storage
            .find_note(user_id, id)
            .await?
            .ok_or_else(|| CoreError::not_found("Note", id).into())
    }

    /// Create a note with defaults applied and bump its notebook's count.
    pub async fn create(&self, user_id: &str, input: CreateNote) -> ServiceResult<Note> {
        let now = Utc::now();
        let note = Note {
            id: new_id(),
            user_id: user_id.to_string(),
            notebook_id: input.notebook_id,
            title: title_or_default(input.title.as_deref()),
            content: input.content.unwrap_or_default(),
            content_type: input.content_type.unwrap_or_default(),
            created_at: now,
            updated_at: now,
            is_pinned: input.is_pinned.unwrap_or(false),
            is_locked: input.is_locked.unwrap_or(false),
            drawing_data: input.drawing_data,
            ocr_text: input.ocr_text,
            auto_delete_at: input.auto_delete_at,
        };

        let created = self.storage.insert_note(&note).await?;
        self.counters.note_filed(user_id, created.notebook_id).await?;
        Ok(created)
    }

    /// Partial update. A present `notebook_id` refiles the note and moves one
    /// unit of `note_count` from the old notebook to the new one.
    pub async fn update(
        &self,
        user_id: &str,
        id: DbId,
        mut input: UpdateNote,
    ) -> ServiceResult<Note> {
        if let Some(title) = input.title.as_deref() {
            input.title = Some(title_or_default(Some(title)));
        }
        if let Some(Some(target)) = input.notebook_id {
            self.get(user_id, id).await?;
            if self.storage.find_notebook(user_id, target).await?.is_none() {
                return Err(
                    CoreError::Validation("Target notebook does not exist".to_string()).into(),
                );
            }
        }

        let written = self
            .storage
            .update_note(user_id, id, &input, Utc::now())
            .await?
            .ok_or_else(|| CoreError::not_found("Note", id))?;

        if input.notebook_id.is_some() {
            self.counters
                .note_moved(user_id, written.previous_notebook_id, written.note.notebook_id)
                .await?;
        }
        Ok(written.note)
    }

    /// Flip `is_pinned` in a single storage write.
    pub async fn toggle_pin(&self, user_id: &str, id: DbId) -> ServiceResult<Note> {
        self.storage
            .toggle_note_pin(user_id, id, Utc::now())
            .await?
            .ok_or_else(|| CoreError::not_found("Note", id).into())
    }

    /// Delete a note and release its notebook's count.
    pub async fn delete(&self, user_id: &str, id: DbId) -> ServiceResult<Note> {
        let deleted = self
            .storage
            .delete_note(user_id, id)
            .await?
            .ok_or_else(|| CoreError::not_found("Note", id))?;
        self.counters
            .note_unfiled(user_id, deleted.notebook_id)
            .await?;
        Ok(deleted)
    }

    /// Case-insensitive substring search over title, content and OCR text.
    /// A blank query matches nothing.
    pub async fn search(&self, user_id: &str, query: &str) -> ServiceResult<Vec<Note>> {
        let Some(query) = normalize_query(query) else {
            return Ok(Vec::new());
        };
        Ok(self.storage.search_notes(user_id, query).await?)
    }
}
