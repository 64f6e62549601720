use std::sync::Arc;

use quicknotes_db::service::{NoteService, NotebookService};
use quicknotes_db::storage::NoteStorage;

use crate::auth::jwt::JwtVerifier;
use crate::auth::IdentityVerifier;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Storage backend, held directly for health checks.
    pub storage: Arc<dyn NoteStorage>,
    /// Notebook store.
    pub notebooks: NotebookService,
    /// Note store.
    pub notes: NoteService,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Bearer token verifier, present when `AUTH_JWT_SECRET` is configured.
    pub identity: Option<Arc<dyn IdentityVerifier>>,
}

impl AppState {
    /// Wire the stores and identity verifier over `storage`.
    pub fn new(storage: Arc<dyn NoteStorage>, config: ServerConfig) -> Self {
        let identity = config
            .jwt
            .clone()
            .map(|jwt| Arc::new(JwtVerifier::new(jwt)) as Arc<dyn IdentityVerifier>);

        Self {
            notebooks: NotebookService::new(Arc::clone(&storage)),
            notes: NoteService::new(Arc::clone(&storage)),
            storage,
            config: Arc::new(config),
            identity,
        }
    }
}
