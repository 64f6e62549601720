//! Domain core for the quick notes backend.
//!
//! Zero I/O: error taxonomy, id/timestamp types, notebook and note defaults,
//! the notebook tree builder and search helpers. Used by both the storage
//! layer (`quicknotes-db`) and the HTTP layer (`quicknotes-api`).

pub mod error;
pub mod hierarchy;
pub mod note;
pub mod notebook;
pub mod search;
pub mod types;
