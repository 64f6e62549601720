//! In-memory storage backend.
//!
//! Used when no `DATABASE_URL` is configured and by the test suites. All
//! tables sit behind a single `RwLock`, so every method is atomic with
//! respect to every other.

use std::collections::HashMap;

use async_trait::async_trait;
use quicknotes_core::search::{fold_case, matches_any};
use quicknotes_core::types::{DbId, Timestamp};
use tokio::sync::RwLock;

use super::{NoteStorage, StorageResult};
use crate::models::note::{Note, NoteListFilter, RefiledNote, UpdateNote};
use crate::models::notebook::{
    MoveRejection, Notebook, NotebookUpdate, RemovedNotebook, ReparentedNotebook, UpdateNotebook,
};

#[derive(Default)]
struct Tables {
    notebooks: HashMap<DbId, Notebook>,
    notes: HashMap<DbId, Note>,
}

/// Process-local storage. Contents are lost on restart.
#[derive(Default)]
pub struct MemoryStorage {
    tables: RwLock<Tables>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first(notes: &mut [Note]) {
    notes.sort_by(|a, b| {
        b.updated_at
            .cmp(&a.updated_at)
            .then_with(|| a.id.cmp(&b.id))
    });
}

/// Rows that belong to a single user.
trait Owned {
    fn owner(&self) -> &str;
}

impl Owned for Notebook {
    fn owner(&self) -> &str {
        &self.user_id
    }
}

impl Owned for Note {
    fn owner(&self) -> &str {
        &self.user_id
    }
}

fn owned_mut<'a, T: Owned>(
    rows: &'a mut HashMap<DbId, T>,
    id: DbId,
    user_id: &str,
) -> Option<&'a mut T> {
    rows.get_mut(&id).filter(|row| row.owner() == user_id)
}

#[async_trait]
impl NoteStorage for MemoryStorage {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn health_check(&self) -> StorageResult<()> {
        Ok(())
    }

    async fn insert_notebook(&self, notebook: &Notebook) -> StorageResult<Notebook> {
        let mut tables = self.tables.write().await;
        tables.notebooks.insert(notebook.id, notebook.clone());
        Ok(notebook.clone())
    }

    async fn find_notebook(&self, user_id: &str, id: DbId) -> StorageResult<Option<Notebook>> {
        let tables = self.tables.read().await;
        Ok(tables
            .notebooks
            .get(&id)
            .filter(|nb| nb.user_id == user_id)
            .cloned())
    }

    async fn list_notebooks(&self, user_id: &str) -> StorageResult<Vec<Notebook>> {
        let tables = self.tables.read().await;
        let mut notebooks: Vec<Notebook> = tables
            .notebooks
            .values()
            .filter(|nb| nb.user_id == user_id)
            .cloned()
            .collect();
        notebooks.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(notebooks)
    }

    async fn update_notebook(
        &self,
        user_id: &str,
        id: DbId,
        input: &UpdateNotebook,
        now: Timestamp,
    ) -> StorageResult<NotebookUpdate> {
        let mut tables = self.tables.write().await;

        if let Some(new_parent) = input.parent_id {
            let notebooks: Vec<Notebook> = tables
                .notebooks
                .values()
                .filter(|nb| nb.user_id == user_id)
                .cloned()
                .collect();
            if !notebooks.iter().any(|nb| nb.id == id) {
                return Ok(NotebookUpdate::NotFound);
            }
            if let Some(rejection) = MoveRejection::check(&notebooks, id, new_parent) {
                return Ok(NotebookUpdate::Rejected(rejection));
            }
        }

        let Some(notebook) = owned_mut(&mut tables.notebooks, id, user_id) else {
            return Ok(NotebookUpdate::NotFound);
        };

        let previous_parent_id = notebook.parent_id;
        if let Some(name) = &input.name {
            notebook.name = name.clone();
        }
        if let Some(color) = &input.color {
            notebook.color = color.clone();
        }
        if let Some(icon) = &input.icon {
            notebook.icon = icon.clone();
        }
        if let Some(parent_id) = input.parent_id {
            notebook.parent_id = parent_id;
        }
        notebook.updated_at = now;

        Ok(NotebookUpdate::Written(ReparentedNotebook {
            previous_parent_id,
            notebook: notebook.clone(),
        }))
    }

    async fn delete_notebook(
        &self,
        user_id: &str,
        id: DbId,
    ) -> StorageResult<Option<RemovedNotebook>> {
        let mut tables = self.tables.write().await;
        if owned_mut(&mut tables.notebooks, id, user_id).is_none() {
            return Ok(None);
        }
        let Some(notebook) = tables.notebooks.remove(&id) else {
            return Ok(None);
        };
        let new_home = notebook.parent_id;

        let mut moved_children = 0;
        for child in tables.notebooks.values_mut() {
            if child.user_id == user_id && child.parent_id == Some(id) {
                child.parent_id = new_home;
                moved_children += 1;
            }
        }
        let mut moved_notes = 0;
        for note in tables.notes.values_mut() {
            if note.user_id == user_id && note.notebook_id == Some(id) {
                note.notebook_id = new_home;
                moved_notes += 1;
            }
        }

        Ok(Some(RemovedNotebook {
            notebook,
            moved_children,
            moved_notes,
        }))
    }

    async fn adjust_note_count(&self, user_id: &str, id: DbId, delta: i64) -> StorageResult<bool> {
        let mut tables = self.tables.write().await;
        Ok(
            match owned_mut(&mut tables.notebooks, id, user_id) {
                Some(notebook) => {
                    notebook.note_count = (notebook.note_count + delta).max(0);
                    true
                }
                None => false,
            },
        )
    }

    async fn adjust_sub_notebook_count(
        &self,
        user_id: &str,
        id: DbId,
        delta: i64,
    ) -> StorageResult<bool> {
        let mut tables = self.tables.write().await;
        Ok(
            match owned_mut(&mut tables.notebooks, id, user_id) {
                Some(notebook) => {
                    notebook.sub_notebook_count = (notebook.sub_notebook_count + delta).max(0);
                    true
                }
                None => false,
            },
        )
    }

    async fn insert_note(&self, note: &Note) -> StorageResult<Note> {
        let mut tables = self.tables.write().await;
        tables.notes.insert(note.id, note.clone());
        Ok(note.clone())
    }

    async fn find_note(&self, user_id: &str, id: DbId) -> StorageResult<Option<Note>> {
        let tables = self.tables.read().await;
        Ok(tables
            .notes
            .get(&id)
            .filter(|note| note.user_id == user_id)
            .cloned())
    }

    async fn list_notes(&self, user_id: &str, filter: &NoteListFilter) -> StorageResult<Vec<Note>> {
        let tables = self.tables.read().await;
        let mut notes: Vec<Note> = tables
            .notes
            .values()
            .filter(|note| note.user_id == user_id && filter.matches(note))
            .cloned()
            .collect();
        newest_first(&mut notes);
        if let Some(limit) = filter.limit {
            notes.truncate(limit);
        }
        Ok(notes)
    }

    async fn update_note(
        &self,
        user_id: &str,
        id: DbId,
        input: &UpdateNote,
        now: Timestamp,
    ) -> StorageResult<Option<RefiledNote>> {
        let mut tables = self.tables.write().await;
        let Some(note) = owned_mut(&mut tables.notes, id, user_id) else {
            return Ok(None);
        };

        let previous_notebook_id = note.notebook_id;
        if let Some(title) = &input.title {
            note.title = title.clone();
        }
        if let Some(content) = &input.content {
            note.content = content.clone();
        }
        if let Some(content_type) = input.content_type {
            note.content_type = content_type;
        }
        if let Some(is_pinned) = input.is_pinned {
            note.is_pinned = is_pinned;
        }
        if let Some(is_locked) = input.is_locked {
            note.is_locked = is_locked;
        }
        if let Some(drawing_data) = &input.drawing_data {
            note.drawing_data = Some(drawing_data.clone());
        }
        if let Some(ocr_text) = &input.ocr_text {
            note.ocr_text = Some(ocr_text.clone());
        }
        if let Some(auto_delete_at) = input.auto_delete_at {
            note.auto_delete_at = Some(auto_delete_at);
        }
        if let Some(notebook_id) = input.notebook_id {
            note.notebook_id = notebook_id;
        }
        note.updated_at = now;

        Ok(Some(RefiledNote {
            previous_notebook_id,
            note: note.clone(),
        }))
    }

    async fn toggle_note_pin(
        &self,
        user_id: &str,
        id: DbId,
        now: Timestamp,
    ) -> StorageResult<Option<Note>> {
        let mut tables = self.tables.write().await;
        Ok(
            owned_mut(&mut tables.notes, id, user_id).map(|note| {
                note.is_pinned = !note.is_pinned;
                note.updated_at = now;
                note.clone()
            }),
        )
    }

    async fn delete_note(&self, user_id: &str, id: DbId) -> StorageResult<Option<Note>> {
        let mut tables = self.tables.write().await;
        if owned_mut(&mut tables.notes, id, user_id).is_none() {
            return Ok(None);
        }
        Ok(tables.notes.remove(&id))
    }

    async fn search_notes(&self, user_id: &str, query: &str) -> StorageResult<Vec<Note>> {
        let needle = fold_case(query);
        let tables = self.tables.read().await;
        let mut notes: Vec<Note> = tables
            .notes
            .values()
            .filter(|note| note.user_id == user_id)
            .filter(|note| {
                matches_any(
                    &needle,
                    &[
                        Some(note.title.as_str()),
                        Some(note.content.as_str()),
                        note.ocr_text.as_deref(),
                    ],
                )
            })
            .cloned()
            .collect();
        newest_first(&mut notes);
        Ok(notes)
    }
}
