//! Shared response types for API handlers.
//!
//! Entities are returned as bare JSON; only confirmations need a wrapper.

use serde::Serialize;

/// `{ "message": "..." }` confirmation body, returned by deletes.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
