//! Note model.

use quicknotes_core::hierarchy::Attached;
use quicknotes_core::note::ContentType;
use quicknotes_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `notes` table.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: DbId,
    pub user_id: String,
    pub notebook_id: Option<DbId>,
    pub title: String,
    pub content: String,
    #[sqlx(try_from = "String")]
    pub content_type: ContentType,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub is_pinned: bool,
    pub is_locked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drawing_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ocr_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_delete_at: Option<Timestamp>,
}

impl Attached for Note {
    fn owner_id(&self) -> Option<DbId> {
        self.notebook_id
    }
}

/// A note row as it was written, plus the notebook it was filed in just before.
#[derive(Debug, Clone, FromRow)]
pub struct RefiledNote {
    pub previous_notebook_id: Option<DbId>,
    #[sqlx(flatten)]
    pub note: Note,
}

/// DTO for creating a new note. Every field is optional; defaults are
/// applied by the note store.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNote {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub notebook_id: Option<DbId>,
    #[serde(default)]
    pub content_type: Option<ContentType>,
    #[serde(default)]
    pub is_pinned: Option<bool>,
    #[serde(default)]
    pub is_locked: Option<bool>,
    #[serde(default)]
    pub drawing_data: Option<String>,
    #[serde(default)]
    pub ocr_text: Option<String>,
    #[serde(default)]
    pub auto_delete_at: Option<Timestamp>,
}

/// DTO for updating a note.
///
/// `notebook_id` distinguishes an absent key (`None`, stay put) from an
/// explicit `null` (`Some(None)`, unfile the note).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNote {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub content_type: Option<ContentType>,
    #[serde(default)]
    pub is_pinned: Option<bool>,
    #[serde(default)]
    pub is_locked: Option<bool>,
    #[serde(default)]
    pub drawing_data: Option<String>,
    #[serde(default)]
    pub ocr_text: Option<String>,
    #[serde(default)]
    pub auto_delete_at: Option<Timestamp>,
    #[serde(default, deserialize_with = "super::deserialize_present")]
    pub notebook_id: Option<Option<DbId>>,
}

/// Which notebook a note listing is restricted to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NotebookFilter {
    /// No restriction.
    #[default]
    Any,
    /// Only notes with no notebook.
    Unfiled,
    /// Only notes filed in this notebook.
    In(DbId),
}

/// Filters for listing notes. Results are always newest-updated first.
#[derive(Debug, Clone, Default)]
pub struct NoteListFilter {
    pub notebook: NotebookFilter,
    pub pinned: Option<bool>,
    pub limit: Option<usize>,
}

impl NoteListFilter {
    /// Whether `note` passes the notebook and pinned filters (not the limit).
    pub fn matches(&self, note: &Note) -> bool {
        let notebook_ok = match self.notebook {
            NotebookFilter::Any => true,
            NotebookFilter::Unfiled => note.notebook_id.is_none(),
            NotebookFilter::In(id) => note.notebook_id == Some(id),
        };
        let pinned_ok = self.pinned.map_or(true, |pinned| note.is_pinned == pinned);
        notebook_ok && pinned_ok
    }
}
