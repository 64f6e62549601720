//! Persistence layer for notes and notebooks.
//!
//! - [`models`] -- row structs and request DTOs.
//! - [`storage`] -- the [`storage::NoteStorage`] backend trait with PostgreSQL
//!   and in-memory implementations.
//! - [`service`] -- the notebook and note stores, including counter
//!   maintenance, built on top of a storage backend.

use sqlx::postgres::PgPoolOptions;

pub mod error;
pub mod models;
pub mod service;
pub mod storage;

pub use error::StorageError;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all pending migrations from `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), StorageError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
