//! HTTP-level integration tests for the note endpoints.

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use common::{
    body_json, create, delete, get, get_as, id_of, patch, post_json, put_json, OTHER_USER,
};
use serde_json::json;

async fn note_count(app: axum::Router, notebook_id: &str) -> serde_json::Value {
    let nb = body_json(get(app, &format!("/api/notebooks/{notebook_id}")).await).await;
    nb["noteCount"].clone()
}

// ---------------------------------------------------------------------------
// Create and read
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_with_empty_body_applies_defaults() {
    let app = common::build_test_app();

    let note = create(app, "/api/notes", json!({})).await;

    assert_eq!(note["title"], "Untitled Note");
    assert_eq!(note["content"], "");
    assert_eq!(note["contentType"], "text");
    assert_eq!(note["isPinned"], false);
    assert_eq!(note["isLocked"], false);
    assert_eq!(note["notebookId"], serde_json::Value::Null);
    assert!(note.get("ocrText").is_none());
    assert!(note.get("drawingData").is_none());
}

#[tokio::test]
async fn create_drawing_note_keeps_optional_fields() {
    let app = common::build_test_app();

    let note = create(
        app,
        "/api/notes",
        json!({
            "title": "Sketch",
            "contentType": "drawing",
            "drawingData": "{\"strokes\":[]}",
            "ocrText": "hello",
            "isPinned": true
        }),
    )
    .await;

    assert_eq!(note["contentType"], "drawing");
    assert_eq!(note["drawingData"], "{\"strokes\":[]}");
    assert_eq!(note["ocrText"], "hello");
    assert_eq!(note["isPinned"], true);
}

#[tokio::test]
async fn unknown_content_type_returns_400() {
    let app = common::build_test_app();

    let response = post_json(app, "/api/notes", json!({ "contentType": "video" })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_and_delete_keep_note_count_in_step() {
    let app = common::build_test_app();
    let work = create(app.clone(), "/api/notebooks", json!({ "name": "Work" })).await;
    let work_id = id_of(&work);
    let note = create(app.clone(), "/api/notes", json!({ "notebookId": work_id })).await;
    assert_eq!(note_count(app.clone(), &work_id).await, 1);

    let response = delete(app.clone(), &format!("/api/notes/{}", id_of(&note))).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["message"], "Note deleted successfully");
    assert_eq!(note_count(app, &work_id).await, 0);
}

// ---------------------------------------------------------------------------
// List filters
// ---------------------------------------------------------------------------

#[tokio::test]
async fn notebook_id_null_returns_only_unfiled_notes() {
    let app = common::build_test_app();
    let work = create(app.clone(), "/api/notebooks", json!({ "name": "Work" })).await;
    create(app.clone(), "/api/notes", json!({ "title": "Filed", "notebookId": work["id"] })).await;
    create(app.clone(), "/api/notes", json!({ "title": "Loose" })).await;

    let response = get(app.clone(), "/api/notes?notebookId=null").await;
    assert_eq!(response.status(), StatusCode::OK);
    let unfiled = body_json(response).await;
    assert_eq!(unfiled.as_array().unwrap().len(), 1);
    assert_eq!(unfiled[0]["title"], "Loose");

    let filed = body_json(get(app, &format!("/api/notes?notebookId={}", id_of(&work))).await).await;
    assert_eq!(filed.as_array().unwrap().len(), 1);
    assert_eq!(filed[0]["title"], "Filed");
}

#[tokio::test]
async fn pinned_and_limit_filters() {
    let app = common::build_test_app();
    create(app.clone(), "/api/notes", json!({ "title": "a", "isPinned": true })).await;
    tokio::time::sleep(Duration::from_millis(2)).await;
    create(app.clone(), "/api/notes", json!({ "title": "b" })).await;
    tokio::time::sleep(Duration::from_millis(2)).await;
    create(app.clone(), "/api/notes", json!({ "title": "c" })).await;

    let pinned = body_json(get(app.clone(), "/api/notes?pinned=true").await).await;
    assert_eq!(pinned.as_array().unwrap().len(), 1);
    assert_eq!(pinned[0]["title"], "a");

    let newest = body_json(get(app.clone(), "/api/notes?limit=1").await).await;
    assert_eq!(newest.as_array().unwrap().len(), 1);
    assert_eq!(newest[0]["title"], "c");

    let uncapped = body_json(get(app, "/api/notes?limit=0").await).await;
    assert_eq!(uncapped.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn pinned_other_than_true_lists_everything() {
    let app = common::build_test_app();
    create(app.clone(), "/api/notes", json!({ "title": "a", "isPinned": true })).await;
    create(app.clone(), "/api/notes", json!({ "title": "b" })).await;

    for query in ["pinned=false", "pinned=1"] {
        let response = get(app.clone(), &format!("/api/notes?{query}")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await.as_array().unwrap().len(), 2);
    }
}

#[tokio::test]
async fn invalid_notebook_filter_returns_400() {
    let app = common::build_test_app();

    let response = get(app, "/api/notes?notebookId=bogus").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["error"].is_string());
}

// ---------------------------------------------------------------------------
// Update, move, pin
// ---------------------------------------------------------------------------

#[tokio::test]
async fn update_is_partial() {
    let app = common::build_test_app();
    let note = create(app.clone(), "/api/notes", json!({ "title": "Draft", "content": "v1" })).await;

    let response = put_json(
        app,
        &format!("/api/notes/{}", id_of(&note)),
        json!({ "content": "v2", "isLocked": true }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["title"], "Draft");
    assert_eq!(json["content"], "v2");
    assert_eq!(json["isLocked"], true);
}

#[tokio::test]
async fn moving_note_updates_both_counts() {
    let app = common::build_test_app();
    let work = id_of(&create(app.clone(), "/api/notebooks", json!({ "name": "Work" })).await);
    let home = id_of(&create(app.clone(), "/api/notebooks", json!({ "name": "Home" })).await);
    let note = create(app.clone(), "/api/notes", json!({ "notebookId": work })).await;

    let response = put_json(
        app.clone(),
        &format!("/api/notes/{}", id_of(&note)),
        json!({ "notebookId": home }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(note_count(app.clone(), &work).await, 0);
    assert_eq!(note_count(app.clone(), &home).await, 1);

    put_json(
        app.clone(),
        &format!("/api/notes/{}", id_of(&note)),
        json!({ "notebookId": null }),
    )
    .await;
    assert_eq!(note_count(app, &home).await, 0);
}

#[tokio::test]
async fn toggle_pin_twice_restores_state() {
    let app = common::build_test_app();
    let note = create(app.clone(), "/api/notes", json!({ "title": "Pin me" })).await;
    let uri = format!("/api/notes/{}/pin", id_of(&note));

    let once = body_json(patch(app.clone(), &uri).await).await;
    let twice = body_json(patch(app, &uri).await).await;

    assert_eq!(once["isPinned"], true);
    assert_eq!(twice["isPinned"], false);
    let first: chrono::DateTime<chrono::Utc> = once["updatedAt"].as_str().unwrap().parse().unwrap();
    let second: chrono::DateTime<chrono::Utc> = twice["updatedAt"].as_str().unwrap().parse().unwrap();
    assert!(second >= first);
}

#[tokio::test]
async fn pin_unknown_note_returns_404() {
    let app = common::build_test_app();

    let response = patch(app, "/api/notes/00000000-0000-4000-8000-000000000000/pin").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "Note not found");
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[tokio::test]
async fn search_is_case_insensitive() {
    let app = common::build_test_app();
    create(app.clone(), "/api/notes", json!({ "title": "Team Meeting" })).await;
    create(app.clone(), "/api/notes", json!({ "content": "meeting notes" })).await;
    create(app.clone(), "/api/notes", json!({ "title": "Groceries" })).await;

    let lower = body_json(get(app.clone(), "/api/notes/search?q=meeting").await).await;
    let upper = body_json(get(app, "/api/notes/search?q=MEETING").await).await;

    assert_eq!(lower.as_array().unwrap().len(), 2);
    assert_eq!(lower, upper);
}

#[tokio::test]
async fn search_without_query_returns_400() {
    let app = common::build_test_app();

    let missing = get(app.clone(), "/api/notes/search").await;
    let blank = get(app, "/api/notes/search?q=%20%20").await;

    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(missing).await["error"], "Search query required");
    assert_eq!(blank.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Isolation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn other_users_note_is_404() {
    let app = common::build_test_app();
    let note = create(app.clone(), "/api/notes", json!({ "title": "Mine" })).await;
    let uri = format!("/api/notes/{}", id_of(&note));

    let response = get_as(app.clone(), &uri, OTHER_USER).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let listed = body_json(get_as(app.clone(), "/api/notes", OTHER_USER).await).await;
    assert_eq!(listed, json!([]));

    let searched = body_json(get_as(app, "/api/notes/search?q=mine", OTHER_USER).await).await;
    assert_eq!(searched, json!([]));
}
