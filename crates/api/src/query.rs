//! Query parameter types for API handlers.
//!
//! Values arrive as raw strings and are interpreted here, so a malformed
//! value produces a JSON `400` instead of an extractor rejection.

use quicknotes_core::search::effective_limit;
use quicknotes_core::types::DbId;
use quicknotes_db::models::note::{NoteListFilter, NotebookFilter};
use serde::Deserialize;

use crate::error::AppError;

/// `GET /notes?notebookId=&pinned=&limit=`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteListParams {
    /// A notebook UUID, or the literal `null` for unfiled notes.
    pub notebook_id: Option<String>,
    /// Only `true` filters (pinned notes only); any other value lists all.
    pub pinned: Option<String>,
    /// Maximum number of notes. Zero or negative means no cap.
    pub limit: Option<String>,
}

impl NoteListParams {
    pub fn into_filter(self) -> Result<NoteListFilter, AppError> {
        let notebook = match self.notebook_id.as_deref().map(str::trim) {
            None | Some("") => NotebookFilter::Any,
            Some("null") => NotebookFilter::Unfiled,
            Some(raw) => raw
                .parse::<DbId>()
                .map(NotebookFilter::In)
                .map_err(|_| AppError::BadRequest(format!("Invalid notebookId '{raw}'")))?,
        };

        let pinned = (self.pinned.as_deref().map(str::trim) == Some("true")).then_some(true);

        let limit = match self.limit.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => {
                let n: i64 = raw
                    .parse()
                    .map_err(|_| AppError::BadRequest(format!("Invalid limit '{raw}'")))?;
                effective_limit(Some(n))
            }
        };

        Ok(NoteListFilter {
            notebook,
            pinned,
            limit,
        })
    }
}

/// `GET /notes/search?q=`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

/// `GET /notebooks?includeNotes=`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeParams {
    pub include_notes: Option<String>,
}

impl TreeParams {
    pub fn include_notes(&self) -> bool {
        self.include_notes
            .as_deref()
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
    }
}
