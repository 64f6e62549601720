//! Denormalized notebook counter maintenance.
//!
//! `note_count` and `sub_notebook_count` are caches. Every write that files,
//! unfiles or moves something calls into [`CounterMaintainer`], which turns
//! the change into atomic `adjust_*` deltas on the storage backend. A missing
//! target notebook is not an error; the delta is dropped and logged.

use std::sync::Arc;

use quicknotes_core::types::DbId;

use crate::error::StorageError;
use crate::storage::NoteStorage;

#[derive(Clone)]
pub struct CounterMaintainer {
    storage: Arc<dyn NoteStorage>,
}

impl CounterMaintainer {
    pub fn new(storage: Arc<dyn NoteStorage>) -> Self {
        Self { storage }
    }

    /// A note landed in `notebook_id`.
    pub async fn note_filed(
        &self,
        user_id: &str,
        notebook_id: Option<DbId>,
    ) -> Result<(), StorageError> {
        self.add_notes(user_id, notebook_id, 1).await
    }

    /// A note left `notebook_id`.
    pub async fn note_unfiled(
        &self,
        user_id: &str,
        notebook_id: Option<DbId>,
    ) -> Result<(), StorageError> {
        self.add_notes(user_id, notebook_id, -1).await
    }

    /// A note moved from `from` to `to`.
    pub async fn note_moved(
        &self,
        user_id: &str,
        from: Option<DbId>,
        to: Option<DbId>,
    ) -> Result<(), StorageError> {
        if from == to {
            return Ok(());
        }
        self.note_unfiled(user_id, from).await?;
        self.note_filed(user_id, to).await
    }

    /// A notebook was placed under `parent_id`.
    pub async fn notebook_attached(
        &self,
        user_id: &str,
        parent_id: Option<DbId>,
    ) -> Result<(), StorageError> {
        self.add_sub_notebooks(user_id, parent_id, 1).await
    }

    /// A notebook was removed from under `parent_id`.
    pub async fn notebook_detached(
        &self,
        user_id: &str,
        parent_id: Option<DbId>,
    ) -> Result<(), StorageError> {
        self.add_sub_notebooks(user_id, parent_id, -1).await
    }

    /// A notebook moved from parent `from` to parent `to`.
    pub async fn notebook_moved(
        &self,
        user_id: &str,
        from: Option<DbId>,
        to: Option<DbId>,
    ) -> Result<(), StorageError> {
        if from == to {
            return Ok(());
        }
        self.notebook_detached(user_id, from).await?;
        self.notebook_attached(user_id, to).await
    }

    /// Bulk form used when a notebook's notes are re-homed at once.
    pub async fn add_notes(
        &self,
        user_id: &str,
        notebook_id: Option<DbId>,
        delta: i64,
    ) -> Result<(), StorageError> {
        let Some(id) = notebook_id else {
            return Ok(());
        };
        if delta == 0 {
            return Ok(());
        }
        if !self.storage.adjust_note_count(user_id, id, delta).await? {
            tracing::debug!(user_id, notebook_id = %id, delta, "Note count target missing, skipped");
        }
        Ok(())
    }

    /// Bulk form used when a notebook's children are re-homed at once.
    pub async fn add_sub_notebooks(
        &self,
        user_id: &str,
        parent_id: Option<DbId>,
        delta: i64,
    ) -> Result<(), StorageError> {
        let Some(id) = parent_id else {
            return Ok(());
        };
        if delta == 0 {
            return Ok(());
        }
        if !self
            .storage
            .adjust_sub_notebook_count(user_id, id, delta)
            .await?
        {
            tracing::debug!(
                user_id,
                notebook_id = %id,
                delta,
                "Sub-notebook count target missing, skipped"
            );
        }
        Ok(())
    }
}
