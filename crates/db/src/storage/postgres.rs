//! PostgreSQL storage backend for the `notebooks` and `notes` tables.

use async_trait::async_trait;
use quicknotes_core::search::ilike_contains_pattern;
use quicknotes_core::types::{DbId, Timestamp};
use sqlx::{Postgres, Transaction};

use super::{NoteStorage, StorageResult};
use crate::models::note::{Note, NoteListFilter, NotebookFilter, RefiledNote, UpdateNote};
use crate::models::notebook::{
    MoveRejection, Notebook, NotebookUpdate, RemovedNotebook, ReparentedNotebook, UpdateNotebook,
};
use crate::DbPool;

/// Column list for notebooks queries.
const NOTEBOOK_COLUMNS: &str = "id, user_id, name, parent_id, color, icon, \
    created_at, updated_at, note_count, sub_notebook_count";

/// Notebook columns qualified with the `nb` alias, for joined updates.
const NOTEBOOK_COLUMNS_NB: &str = "nb.id, nb.user_id, nb.name, nb.parent_id, nb.color, \
    nb.icon, nb.created_at, nb.updated_at, nb.note_count, nb.sub_notebook_count";

/// Column list for notes queries.
const NOTE_COLUMNS: &str = "id, user_id, notebook_id, title, content, content_type, \
    created_at, updated_at, is_pinned, is_locked, drawing_data, ocr_text, auto_delete_at";

/// Note columns qualified with the `n` alias, for joined updates.
const NOTE_COLUMNS_N: &str = "n.id, n.user_id, n.notebook_id, n.title, n.content, \
    n.content_type, n.created_at, n.updated_at, n.is_pinned, n.is_locked, n.drawing_data, \
    n.ocr_text, n.auto_delete_at";

fn list_notebooks_query() -> String {
    format!(
        "SELECT {NOTEBOOK_COLUMNS} FROM notebooks
         WHERE user_id = $1
         ORDER BY created_at ASC, id ASC"
    )
}

/// Storage backed by a PostgreSQL connection pool.
#[derive(Clone)]
pub struct PgStorage {
    pool: DbPool,
}

impl PgStorage {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Serialize hierarchy writes for one user until the transaction ends.
async fn lock_user_tree(tx: &mut Transaction<'_, Postgres>, user_id: &str) -> StorageResult<()> {
    sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
        .bind(user_id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

#[async_trait]
impl NoteStorage for PgStorage {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn health_check(&self) -> StorageResult<()> {
        crate::health_check(&self.pool).await?;
        Ok(())
    }

    async fn insert_notebook(&self, notebook: &Notebook) -> StorageResult<Notebook> {
        let query = format!(
            "INSERT INTO notebooks
                (id, user_id, name, parent_id, color, icon, created_at, updated_at,
                 note_count, sub_notebook_count)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {NOTEBOOK_COLUMNS}"
        );
        let row = sqlx::query_as::<_, Notebook>(&query)
            .bind(notebook.id)
            .bind(&notebook.user_id)
            .bind(&notebook.name)
            .bind(notebook.parent_id)
            .bind(&notebook.color)
            .bind(&notebook.icon)
            .bind(notebook.created_at)
            .bind(notebook.updated_at)
            .bind(notebook.note_count)
            .bind(notebook.sub_notebook_count)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_notebook(&self, user_id: &str, id: DbId) -> StorageResult<Option<Notebook>> {
        let query =
            format!("SELECT {NOTEBOOK_COLUMNS} FROM notebooks WHERE id = $1 AND user_id = $2");
        let row = sqlx::query_as::<_, Notebook>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_notebooks(&self, user_id: &str) -> StorageResult<Vec<Notebook>> {
        let rows = sqlx::query_as::<_, Notebook>(&list_notebooks_query())
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn update_notebook(
        &self,
        user_id: &str,
        id: DbId,
        input: &UpdateNotebook,
        now: Timestamp,
    ) -> StorageResult<NotebookUpdate> {
        let mut tx = self.pool.begin().await?;

        if let Some(new_parent) = input.parent_id {
            lock_user_tree(&mut tx, user_id).await?;
            let notebooks = sqlx::query_as::<_, Notebook>(&list_notebooks_query())
                .bind(user_id)
                .fetch_all(&mut *tx)
                .await?;
            if !notebooks.iter().any(|nb| nb.id == id) {
                return Ok(NotebookUpdate::NotFound);
            }
            if let Some(rejection) = MoveRejection::check(&notebooks, id, new_parent) {
                return Ok(NotebookUpdate::Rejected(rejection));
            }
        }

        // The row lock on `prev` makes reading the old parent and writing the
        // new one a single step.
        let query = format!(
            "UPDATE notebooks AS nb SET
                name = COALESCE($3, nb.name),
                color = COALESCE($4, nb.color),
                icon = COALESCE($5, nb.icon),
                parent_id = CASE WHEN $6 THEN $7 ELSE nb.parent_id END,
                updated_at = $8
             FROM (
                SELECT id, parent_id FROM notebooks
                WHERE id = $1 AND user_id = $2
                FOR UPDATE
             ) AS prev
             WHERE nb.id = prev.id
             RETURNING prev.parent_id AS previous_parent_id, {NOTEBOOK_COLUMNS_NB}"
        );
        let row = sqlx::query_as::<_, ReparentedNotebook>(&query)
            .bind(id)
            .bind(user_id)
            .bind(input.name.as_deref())
            .bind(input.color.as_deref())
            .bind(input.icon.as_deref())
            .bind(input.parent_id.is_some())
            .bind(input.parent_id.flatten())
            .bind(now)
            .fetch_optional(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(row.map_or(NotebookUpdate::NotFound, NotebookUpdate::Written))
    }

    async fn delete_notebook(
        &self,
        user_id: &str,
        id: DbId,
    ) -> StorageResult<Option<RemovedNotebook>> {
        let mut tx = self.pool.begin().await?;
        lock_user_tree(&mut tx, user_id).await?;

        let query = format!(
            "DELETE FROM notebooks WHERE id = $1 AND user_id = $2 RETURNING {NOTEBOOK_COLUMNS}"
        );
        let Some(notebook) = sqlx::query_as::<_, Notebook>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let children =
            sqlx::query("UPDATE notebooks SET parent_id = $3 WHERE user_id = $1 AND parent_id = $2")
                .bind(user_id)
                .bind(id)
                .bind(notebook.parent_id)
                .execute(&mut *tx)
                .await?;
        let notes =
            sqlx::query("UPDATE notes SET notebook_id = $3 WHERE user_id = $1 AND notebook_id = $2")
                .bind(user_id)
                .bind(id)
                .bind(notebook.parent_id)
                .execute(&mut *tx)
                .await?;

        tx.commit().await?;
        Ok(Some(RemovedNotebook {
            notebook,
            moved_children: children.rows_affected(),
            moved_notes: notes.rows_affected(),
        }))
    }

    async fn adjust_note_count(&self, user_id: &str, id: DbId, delta: i64) -> StorageResult<bool> {
        let result = sqlx::query(
            "UPDATE notebooks SET note_count = GREATEST(note_count + $3, 0)
             WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .bind(delta)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn adjust_sub_notebook_count(
        &self,
        user_id: &str,
        id: DbId,
        delta: i64,
    ) -> StorageResult<bool> {
        let result = sqlx::query(
            "UPDATE notebooks SET sub_notebook_count = GREATEST(sub_notebook_count + $3, 0)
             WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .bind(delta)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_note(&self, note: &Note) -> StorageResult<Note> {
        let query = format!(
            "INSERT INTO notes
                (id, user_id, notebook_id, title, content, content_type, created_at, updated_at,
                 is_pinned, is_locked, drawing_data, ocr_text, auto_delete_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
             RETURNING {NOTE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, Note>(&query)
            .bind(note.id)
            .bind(&note.user_id)
            .bind(note.notebook_id)
            .bind(&note.title)
            .bind(&note.content)
            .bind(note.content_type.as_str())
            .bind(note.created_at)
            .bind(note.updated_at)
            .bind(note.is_pinned)
            .bind(note.is_locked)
            .bind(note.drawing_data.as_deref())
            .bind(note.ocr_text.as_deref())
            .bind(note.auto_delete_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_note(&self, user_id: &str, id: DbId) -> StorageResult<Option<Note>> {
        let query = format!("SELECT {NOTE_COLUMNS} FROM notes WHERE id = $1 AND user_id = $2");
        let row = sqlx::query_as::<_, Note>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_notes(&self, user_id: &str, filter: &NoteListFilter) -> StorageResult<Vec<Note>> {
        // $2 selects the notebook mode: 0 = any, 1 = unfiled, 2 = filed in $3.
        let (mode, notebook_id): (i16, Option<DbId>) = match filter.notebook {
            NotebookFilter::Any => (0, None),
            NotebookFilter::Unfiled => (1, None),
            NotebookFilter::In(id) => (2, Some(id)),
        };
        let limit = filter
            .limit
            .map(|n| i64::try_from(n).unwrap_or(i64::MAX));

        let query = format!(
            "SELECT {NOTE_COLUMNS} FROM notes
             WHERE user_id = $1
               AND ($2 = 0
                    OR ($2 = 1 AND notebook_id IS NULL)
                    OR ($2 = 2 AND notebook_id = $3))
               AND ($4::BOOLEAN IS NULL OR is_pinned = $4)
             ORDER BY updated_at DESC, id ASC
             LIMIT $5"
        );
        let rows = sqlx::query_as::<_, Note>(&query)
            .bind(user_id)
            .bind(mode)
            .bind(notebook_id)
            .bind(filter.pinned)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn update_note(
        &self,
        user_id: &str,
        id: DbId,
        input: &UpdateNote,
        now: Timestamp,
    ) -> StorageResult<Option<RefiledNote>> {
        let query = format!(
            "UPDATE notes AS n SET
                title = COALESCE($3, n.title),
                content = COALESCE($4, n.content),
                content_type = COALESCE($5, n.content_type),
                is_pinned = COALESCE($6, n.is_pinned),
                is_locked = COALESCE($7, n.is_locked),
                drawing_data = COALESCE($8, n.drawing_data),
                ocr_text = COALESCE($9, n.ocr_text),
                auto_delete_at = COALESCE($10, n.auto_delete_at),
                notebook_id = CASE WHEN $11 THEN $12 ELSE n.notebook_id END,
                updated_at = $13
             FROM (
                SELECT id, notebook_id FROM notes
                WHERE id = $1 AND user_id = $2
                FOR UPDATE
             ) AS prev
             WHERE n.id = prev.id
             RETURNING prev.notebook_id AS previous_notebook_id, {NOTE_COLUMNS_N}"
        );
        let row = sqlx::query_as::<_, RefiledNote>(&query)
            .bind(id)
            .bind(user_id)
            .bind(input.title.as_deref())
            .bind(input.content.as_deref())
            .bind(input.content_type.map(|c| c.as_str()))
            .bind(input.is_pinned)
            .bind(input.is_locked)
            .bind(input.drawing_data.as_deref())
            .bind(input.ocr_text.as_deref())
            .bind(input.auto_delete_at)
            .bind(input.notebook_id.is_some())
            .bind(input.notebook_id.flatten())
            .bind(now)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn toggle_note_pin(
        &self,
        user_id: &str,
        id: DbId,
        now: Timestamp,
    ) -> StorageResult<Option<Note>> {
        let query = format!(
            "UPDATE notes SET is_pinned = NOT is_pinned, updated_at = $3
             WHERE id = $1 AND user_id = $2
             RETURNING {NOTE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, Note>(&query)
            .bind(id)
            .bind(user_id)
            .bind(now)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete_note(&self, user_id: &str, id: DbId) -> StorageResult<Option<Note>> {
        let query =
            format!("DELETE FROM notes WHERE id = $1 AND user_id = $2 RETURNING {NOTE_COLUMNS}");
        let row = sqlx::query_as::<_, Note>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn search_notes(&self, user_id: &str, query_str: &str) -> StorageResult<Vec<Note>> {
        let pattern = ilike_contains_pattern(query_str);
        let query = format!(
            "SELECT {NOTE_COLUMNS} FROM notes
             WHERE user_id = $1
               AND (title ILIKE $2 OR content ILIKE $2 OR ocr_text ILIKE $2)
             ORDER BY updated_at DESC, id ASC"
        );
        let rows = sqlx::query_as::<_, Note>(&query)
            .bind(user_id)
            .bind(&pattern)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}
