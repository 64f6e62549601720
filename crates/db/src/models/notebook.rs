//! Notebook model.

use quicknotes_core::hierarchy::{would_create_cycle, Hierarchical, TreeNode};
use quicknotes_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::note::Note;

/// A row from the `notebooks` table.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Notebook {
    pub id: DbId,
    pub user_id: String,
    pub name: String,
    pub parent_id: Option<DbId>,
    pub color: String,
    pub icon: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    /// Cached number of notes filed directly in this notebook.
    pub note_count: i64,
    /// Cached number of notebooks whose parent is this notebook.
    pub sub_notebook_count: i64,
}

impl Hierarchical for Notebook {
    fn node_id(&self) -> DbId {
        self.id
    }

    fn parent_id(&self) -> Option<DbId> {
        self.parent_id
    }

    fn created_at(&self) -> Timestamp {
        self.created_at
    }
}

/// A notebook together with its sub-notebooks and, for display, its notes.
pub type NotebookTreeNode = TreeNode<Notebook, Note>;

/// A notebook row as it was written, plus the parent it had just before.
#[derive(Debug, Clone, FromRow)]
pub struct ReparentedNotebook {
    pub previous_parent_id: Option<DbId>,
    #[sqlx(flatten)]
    pub notebook: Notebook,
}

/// Why a requested move was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveRejection {
    /// The requested parent does not exist for this user.
    MissingParent,
    /// The requested parent is the notebook itself or one of its descendants.
    Cycle,
}

impl MoveRejection {
    /// Check moving `id` under `new_parent` against all of the user's
    /// notebooks. Backends call this under the same lock as the write.
    pub fn check(notebooks: &[Notebook], id: DbId, new_parent: Option<DbId>) -> Option<Self> {
        if let Some(parent) = new_parent {
            if !notebooks.iter().any(|nb| nb.id == parent) {
                return Some(Self::MissingParent);
            }
        }
        would_create_cycle(notebooks, id, new_parent).then_some(Self::Cycle)
    }
}

/// Outcome of [`NoteStorage::update_notebook`](crate::storage::NoteStorage::update_notebook).
#[derive(Debug, Clone)]
pub enum NotebookUpdate {
    Written(ReparentedNotebook),
    NotFound,
    Rejected(MoveRejection),
}

/// A deleted notebook and how much of its contents moved up to its parent.
#[derive(Debug, Clone)]
pub struct RemovedNotebook {
    pub notebook: Notebook,
    pub moved_children: u64,
    pub moved_notes: u64,
}

/// DTO for creating a new notebook.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNotebook {
    /// Required; kept optional so a missing name is a validation error
    /// rather than a body rejection.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub parent_id: Option<DbId>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

/// DTO for updating a notebook.
///
/// `parent_id` distinguishes an absent key (`None`, leave in place) from an
/// explicit `null` (`Some(None)`, move to the root).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNotebook {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default, deserialize_with = "super::deserialize_present")]
    pub parent_id: Option<Option<DbId>>,
}
