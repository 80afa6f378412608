//! Embedded libsql persistence for glossaries and the candidate ledger.
//!
//! `TursoClient` owns the database file; `initialize_schema` must run once
//! before the client is handed to a `TermStore`.

mod backend;
mod candidates;
mod client;
mod glossary;
mod schema;

pub use client::{RetryPolicy, TursoClient, TursoError, DATABASE_FILE};
pub use schema::initialize_schema;

use crate::storage::{StoreError, TermStore};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Open the database at `db_path`, bring its schema up to date and wrap it in a store handle
pub async fn open_store(
    db_path: PathBuf,
    retry: RetryPolicy,
    timeout: Duration,
) -> Result<TermStore, StoreError> {
    let client = TursoClient::open(db_path)
        .await
        .map_err(|e| StoreError::Unavailable(e.to_string()))?
        .with_retry_policy(retry);
    initialize_schema(&client)
        .await
        .map_err(|e| StoreError::Unavailable(e.to_string()))?;
    Ok(TermStore::new(Arc::new(client), timeout))
}
