//! Notebook store.
//!
//! Notebooks are kept flat; the tree is rebuilt on every read that needs it.
//! Writes keep the parent's `sub_notebook_count` in step through
//! [`CounterMaintainer`].

use std::sync::Arc;

use chrono::Utc;
use quicknotes_core::error::CoreError;
use quicknotes_core::hierarchy::build_forest;
use quicknotes_core::notebook::{color_or_default, icon_or_default, normalize_notebook_name};
use quicknotes_core::types::{new_id, DbId};

use super::{CounterMaintainer, ServiceResult};
use crate::models::note::NoteListFilter;
use crate::models::notebook::{
    CreateNotebook, MoveRejection, Notebook, NotebookTreeNode, NotebookUpdate, UpdateNotebook,
};
use crate::storage::NoteStorage;

#[derive(Clone)]
pub struct NotebookService {
    storage: Arc<dyn NoteStorage>,
    counters: CounterMaintainer,
}

impl NotebookService {
    pub fn new(storage: Arc<dyn NoteStorage>) -> Self {
        let counters = CounterMaintainer::new(Arc::clone(&storage));
        Self { storage, counters }
    }

    /// The user's notebooks as an ordered forest. With `include_notes`, each
    /// node also carries its own notes, most recently updated first.
    pub async fn tree(
        &self,
        user_id: &str,
        include_notes: bool,
    ) -> ServiceResult<Vec<NotebookTreeNode>> {
        let notebooks = self.storage.list_notebooks(user_id).await?;
        let notes = if include_notes {
            Some(
                self.storage
                    .list_notes(user_id, &NoteListFilter::default())
                    .await?,
            )
        } else {
            None
        };
        Ok(build_forest(&notebooks, notes.as_deref()))
    }

    /// Flat list, oldest first.
    pub async fn list(&self, user_id: &str) -> ServiceResult<Vec<Notebook>> {
        Ok(self.storage.list_notebooks(user_id).await?)
    }

    pub async fn get(&self, user_id: &str, id: DbId) -> ServiceResult<Notebook> {
        self.storage
            .find_notebook(user_id, id)
            .await?
            .ok_or_else(|| CoreError::not_found("Notebook", id).into())
    }

    /// Create a notebook and bump its parent's `sub_notebook_count`.
    ///
    /// A `parent_id` that names no notebook is stored as given; the counter
    /// update is then a no-op and the notebook stays out of the tree.
    pub async fn create(&self, user_id: &str, input: CreateNotebook) -> ServiceResult<Notebook> {
        let name = normalize_notebook_name(input.name.as_deref().unwrap_or_default())?;
        let now = Utc::now();
        let notebook = Notebook {
            id: new_id(),
            user_id: user_id.to_string(),
            name,
            parent_id: input.parent_id,
            color: color_or_default(input.color.as_deref()),
            icon: icon_or_default(input.icon.as_deref()),
            created_at: now,
            updated_at: now,
            note_count: 0,
            sub_notebook_count: 0,
        };

        let created = self.storage.insert_notebook(&notebook).await?;
        self.counters
            .notebook_attached(user_id, created.parent_id)
            .await?;
        Ok(created)
    }

    /// Partial update. A present `parent_id` moves the notebook, which must
    /// not end up under itself or one of its descendants.
    pub async fn update(
        &self,
        user_id: &str,
        id: DbId,
        mut input: UpdateNotebook,
    ) -> ServiceResult<Notebook> {
        if let Some(name) = input.name.as_deref() {
            input.name = Some(normalize_notebook_name(name)?);
        }

        let written = match self
            .storage
            .update_notebook(user_id, id, &input, Utc::now())
            .await?
        {
            NotebookUpdate::Written(written) => written,
            NotebookUpdate::NotFound => return Err(CoreError::not_found("Notebook", id).into()),
            NotebookUpdate::Rejected(rejection) => return Err(move_error(rejection).into()),
        };

        if input.parent_id.is_some() {
            self.counters
                .notebook_moved(
                    user_id,
                    written.previous_parent_id,
                    written.notebook.parent_id,
                )
                .await?;
        }
        Ok(written.notebook)
    }

    /// Delete a notebook. Its direct children and notes move up to its
    /// parent (the root, or unfiled, when it had none), and that parent's
    /// counters absorb them.
    pub async fn delete(&self, user_id: &str, id: DbId) -> ServiceResult<Notebook> {
        let removed = self
            .storage
            .delete_notebook(user_id, id)
            .await?
            .ok_or_else(|| CoreError::not_found("Notebook", id))?;
        let new_home = removed.notebook.parent_id;

        self.counters
            .add_sub_notebooks(user_id, new_home, count_delta(removed.moved_children) - 1)
            .await?;
        self.counters
            .add_notes(user_id, new_home, count_delta(removed.moved_notes))
            .await?;

        if removed.moved_children > 0 || removed.moved_notes > 0 {
            tracing::debug!(
                user_id,
                notebook_id = %id,
                moved_children = removed.moved_children,
                moved_notes = removed.moved_notes,
                "Re-homed contents of deleted notebook"
            );
        }
        Ok(removed.notebook)
    }
}

fn move_error(rejection: MoveRejection) -> CoreError {
    let message = match rejection {
        MoveRejection::MissingParent => "Target notebook does not exist",
        MoveRejection::Cycle => "Cannot move a notebook into itself or one of its descendants",
    };
    CoreError::Validation(message.to_string())
}

fn count_delta(rows: u64) -> i64 {
    i64::try_from(rows).unwrap_or(i64::MAX)
}
