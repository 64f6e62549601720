//! Integration tests for the note store over the in-memory backend.

use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use quicknotes_core::error::CoreError;
use quicknotes_core::note::{ContentType, DEFAULT_NOTE_TITLE};
use quicknotes_db::models::note::{CreateNote, NoteListFilter, NotebookFilter, UpdateNote};
use quicknotes_db::models::notebook::{CreateNotebook, Notebook};
use quicknotes_db::service::{NoteService, NotebookService, ServiceError};
use quicknotes_db::storage::{MemoryStorage, NoteStorage};

const USER: &str = "user-a";
const OTHER_USER: &str = "user-b";

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn stores() -> (NotebookService, NoteService) {
    let storage: Arc<dyn NoteStorage> = Arc::new(MemoryStorage::new());
    (
        NotebookService::new(Arc::clone(&storage)),
        NoteService::new(storage),
    )
}

async fn notebook(store: &NotebookService, name: &str) -> Notebook {
    store
        .create(
            USER,
            CreateNotebook {
                name: Some(name.to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
}

fn titled(title: &str) -> CreateNote {
    CreateNote {
        title: Some(title.to_string()),
        ..Default::default()
    }
}

fn body(title: &str, content: &str) -> CreateNote {
    CreateNote {
        title: Some(title.to_string()),
        content: Some(content.to_string()),
        ..Default::default()
    }
}

async fn note_count(store: &NotebookService, nb: &Notebook) -> i64 {
    store.get(USER, nb.id).await.unwrap().note_count
}

// ---------------------------------------------------------------------------
// Test: create and read
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_create_applies_defaults() {
    let (_, notes) = stores();

    let note = notes.create(USER, CreateNote::default()).await.unwrap();

    assert_eq!(note.title, DEFAULT_NOTE_TITLE);
    assert_eq!(note.content, "");
    assert_eq!(note.content_type, ContentType::Text);
    assert!(!note.is_pinned);
    assert!(!note.is_locked);
    assert_eq!(note.notebook_id, None);
    assert_eq!(note.user_id, USER);
}

#[tokio::test]
async fn test_blank_title_gets_default() {
    let (_, notes) = stores();

    let note = notes.create(USER, titled("   ")).await.unwrap();

    assert_eq!(note.title, DEFAULT_NOTE_TITLE);
}

#[tokio::test]
async fn test_create_and_delete_restore_note_count() {
    let (notebooks, notes) = stores();
    let work = notebook(&notebooks, "Work").await;

    let note = notes
        .create(
            USER,
            CreateNote {
                notebook_id: Some(work.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(note_count(&notebooks, &work).await, 1);

    notes.delete(USER, note.id).await.unwrap();
    assert_eq!(note_count(&notebooks, &work).await, 0);
}

#[tokio::test]
async fn test_create_in_missing_notebook_is_tolerated() {
    let (_, notes) = stores();

    let note = notes
        .create(
            USER,
            CreateNote {
                notebook_id: Some(uuid::Uuid::new_v4()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(notes.get(USER, note.id).await.is_ok());
}

#[tokio::test]
async fn test_get_missing_or_foreign_note_is_not_found() {
    let (_, notes) = stores();
    let note = notes.create(USER, titled("Mine")).await.unwrap();

    assert_matches!(
        notes.get(USER, uuid::Uuid::new_v4()).await,
        Err(ServiceError::Core(CoreError::NotFound { entity: "Note", .. }))
    );
    assert_matches!(
        notes.get(OTHER_USER, note.id).await,
        Err(ServiceError::Core(CoreError::NotFound { .. }))
    );
    assert_matches!(
        notes.delete(OTHER_USER, note.id).await,
        Err(ServiceError::Core(CoreError::NotFound { .. }))
    );
}

// ---------------------------------------------------------------------------
// Test: list filters
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_unfiled_filter_returns_only_unfiled_notes() {
    let (notebooks, notes) = stores();
    let work = notebook(&notebooks, "Work").await;
    notes
        .create(
            USER,
            CreateNote {
                notebook_id: Some(work.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let loose = notes.create(USER, titled("Loose")).await.unwrap();

    let filter = NoteListFilter {
        notebook: NotebookFilter::Unfiled,
        ..Default::default()
    };
    let listed = notes.list(USER, &filter).await.unwrap();

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, loose.id);
}

#[tokio::test]
async fn test_list_is_newest_first_with_pinned_and_limit() {
    let (_, notes) = stores();
    let first = notes.create(USER, titled("first")).await.unwrap();
    tokio::time::sleep(Duration::from_millis(2)).await;
    let second = notes.create(USER, titled("second")).await.unwrap();
    tokio::time::sleep(Duration::from_millis(2)).await;
    let third = notes.create(USER, titled("third")).await.unwrap();
    tokio::time::sleep(Duration::from_millis(2)).await;
    notes.toggle_pin(USER, first.id).await.unwrap();

    let all = notes.list(USER, &NoteListFilter::default()).await.unwrap();
    let ids: Vec<_> = all.iter().map(|n| n.id).collect();
    assert_eq!(ids, [first.id, third.id, second.id]);

    let pinned = notes
        .list(
            USER,
            &NoteListFilter {
                pinned: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(pinned.len(), 1);
    assert_eq!(pinned[0].id, first.id);

    let capped = notes
        .list(
            USER,
            &NoteListFilter {
                pinned: Some(false),
                limit: Some(1),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(capped.len(), 1);
    assert_eq!(capped[0].id, third.id);
}

// ---------------------------------------------------------------------------
// Test: update, move, pin
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_update_is_partial() {
    let (_, notes) = stores();
    let note = notes.create(USER, body("Draft", "hello")).await.unwrap();

    let updated = notes
        .update(
            USER,
            note.id,
            UpdateNote {
                content: Some("hello world".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.title, "Draft");
    assert_eq!(updated.content, "hello world");
    assert!(updated.updated_at >= note.updated_at);
}

#[tokio::test]
async fn test_moving_note_shifts_counts() {
    let (notebooks, notes) = stores();
    let work = notebook(&notebooks, "Work").await;
    let home = notebook(&notebooks, "Home").await;
    let note = notes
        .create(
            USER,
            CreateNote {
                notebook_id: Some(work.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let moved = notes
        .update(
            USER,
            note.id,
            UpdateNote {
                notebook_id: Some(Some(home.id)),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(moved.notebook_id, Some(home.id));
    assert_eq!(note_count(&notebooks, &work).await, 0);
    assert_eq!(note_count(&notebooks, &home).await, 1);

    let unfiled = notes
        .update(
            USER,
            note.id,
            UpdateNote {
                notebook_id: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(unfiled.notebook_id, None);
    assert_eq!(note_count(&notebooks, &home).await, 0);
}

#[tokio::test]
async fn test_moving_note_to_missing_notebook_is_rejected() {
    let (_, notes) = stores();
    let note = notes.create(USER, titled("Plan")).await.unwrap();

    let result = notes
        .update(
            USER,
            note.id,
            UpdateNote {
                notebook_id: Some(Some(uuid::Uuid::new_v4())),
                ..Default::default()
            },
        )
        .await;

    assert_matches!(result, Err(ServiceError::Core(CoreError::Validation(_))));
    assert_eq!(notes.get(USER, note.id).await.unwrap().notebook_id, None);
}

#[tokio::test]
async fn test_toggle_pin_twice_restores_state() {
    let (_, notes) = stores();
    let note = notes.create(USER, titled("Pin me")).await.unwrap();

    let once = notes.toggle_pin(USER, note.id).await.unwrap();
    let twice = notes.toggle_pin(USER, note.id).await.unwrap();

    assert!(once.is_pinned);
    assert_eq!(twice.is_pinned, note.is_pinned);
    assert!(twice.updated_at >= once.updated_at);
}

// ---------------------------------------------------------------------------
// Test: search
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_search_is_case_insensitive_and_idempotent() {
    let (_, notes) = stores();
    notes.create(USER, body("Weekly Meeting", "")).await.unwrap();
    notes.create(USER, body("Groceries", "eggs, MEETING snacks")).await.unwrap();
    notes.create(USER, body("Unrelated", "nothing here")).await.unwrap();

    let lower = notes.search(USER, "meeting").await.unwrap();
    let upper = notes.search(USER, "MEETING").await.unwrap();
    let again = notes.search(USER, "meeting").await.unwrap();

    assert_eq!(lower.len(), 2);
    assert_eq!(lower, upper);
    assert_eq!(lower, again);
}

#[tokio::test]
async fn test_search_matches_ocr_text() {
    let (_, notes) = stores();
    let scanned = notes
        .create(
            USER,
            CreateNote {
                content_type: Some(ContentType::Drawing),
                ocr_text: Some("Whiteboard: Q3 Roadmap".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let found = notes.search(USER, "roadmap").await.unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, scanned.id);
}

#[tokio::test]
async fn test_search_blank_query_and_other_users() {
    let (_, notes) = stores();
    notes.create(USER, titled("Secret plan")).await.unwrap();

    assert!(notes.search(USER, "   ").await.unwrap().is_empty());
    assert!(notes.search(OTHER_USER, "plan").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_other_user_cannot_touch_note_count() {
    let (notebooks, notes) = stores();
    let work = notebook(&notebooks, "Work").await;
    notes
        .create(
            USER,
            CreateNote {
                notebook_id: Some(work.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let foreign = notes
        .create(
            OTHER_USER,
            CreateNote {
                notebook_id: Some(work.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(note_count(&notebooks, &work).await, 1);

    let loose = notes.create(OTHER_USER, titled("Loose")).await.unwrap();
    let moved = notes
        .update(
            OTHER_USER,
            loose.id,
            UpdateNote {
                notebook_id: Some(Some(work.id)),
                ..Default::default()
            },
        )
        .await;
    assert_matches!(moved, Err(ServiceError::Core(CoreError::Validation(_))));

    notes.delete(OTHER_USER, foreign.id).await.unwrap();
    assert_eq!(note_count(&notebooks, &work).await, 1);
}
