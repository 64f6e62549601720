//! Note and notebook stores.
//!
//! The services own the rules that sit above a single storage call: input
//! defaults and validation, cycle checks on moves, and keeping the cached
//! notebook counters in step with every write.

use quicknotes_core::error::CoreError;

use crate::error::StorageError;

pub mod counters;
pub mod note_service;
pub mod notebook_service;

pub use counters::CounterMaintainer;
pub use note_service::NoteService;
pub use notebook_service::NotebookService;

/// Errors from store operations.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
