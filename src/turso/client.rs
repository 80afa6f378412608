// Turso/libsql client - embedded SQLite connection management
//
// Every operation opens its own connection with a busy timeout, so concurrent
// callers (and other processes on the same file) are serialized by SQLite's
// locking rather than by in-process state.

use libsql::{Builder, Connection, Database};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::storage::StoreError;

/// Database file name used inside a data directory
pub const DATABASE_FILE: &str = "glosario.db";

/// Error types for libsql operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TursoError {
    /// Database could not be opened or connected
    #[error("Database connection failed: {0}")]
    Connection(String),
    /// A constraint rejected the statement
    #[error("Constraint violation: {0}")]
    Constraint(String),
    /// The database is locked by another writer
    #[error("Database busy: {0}")]
    Busy(String),
    /// Any other statement failure
    #[error("Query failed: {0}")]
    Query(String),
    /// A stored value could not be decoded
    #[error("Failed to decode row: {0}")]
    Decode(String),
}

impl From<libsql::Error> for TursoError {
    fn from(error: libsql::Error) -> Self {
        let message = error.to_string();
        let lowered = message.to_lowercase();
        if lowered.contains("database is locked") || lowered.contains("busy") {
            TursoError::Busy(message)
        } else if lowered.contains("constraint") {
            TursoError::Constraint(message)
        } else {
            TursoError::Query(message)
        }
    }
}

impl TursoError {
    /// Uniqueness races resolve on retry as an update; other constraints never will
    fn is_uniqueness_race(&self) -> bool {
        match self {
            TursoError::Constraint(message) => {
                let lowered = message.to_lowercase();
                lowered.contains("unique") || lowered.contains("primary key")
            }
            _ => false,
        }
    }
}

/// Bounded retry for lock contention and uniqueness races
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one
    pub max_attempts: u32,
    /// Base delay; attempt n waits n * backoff
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            backoff: Duration::from_millis(20),
        }
    }
}

/// Client for the embedded glossary database
pub struct TursoClient {
    db: Database,
    db_path: PathBuf,
    retry: RetryPolicy,
    busy_timeout: Duration,
}

impl std::fmt::Debug for TursoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TursoClient")
            .field("db_path", &self.db_path)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl TursoClient {
    /// Open (or create) the database inside a data directory.
    pub async fn new(data_dir: PathBuf) -> Result<Self, TursoError> {
        std::fs::create_dir_all(&data_dir).map_err(|e| {
            TursoError::Connection(format!("Failed to create data directory {:?}: {}", data_dir, e))
        })?;
        Self::open(data_dir.join(DATABASE_FILE)).await
    }

    /// Open (or create) the database at an explicit file path.
    pub async fn open(db_path: PathBuf) -> Result<Self, TursoError> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    TursoError::Connection(format!("Failed to create {:?}: {}", parent, e))
                })?;
            }
        }

        let db = Builder::new_local(&db_path)
            .build()
            .await
            .map_err(|e| TursoError::Connection(e.to_string()))?;

        let client = Self {
            db,
            db_path,
            retry: RetryPolicy::default(),
            busy_timeout: Duration::from_secs(5),
        };

        // WAL lets readers proceed while a document transaction is writing
        let conn = client.connect().await?;
        pragma(&conn, "PRAGMA journal_mode = WAL").await?;

        crate::debug!("Opened glossary database at {:?}", client.db_path);
        Ok(client)
    }

    /// Override the retry policy (builder pattern)
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Override how long a connection waits on a locked database (builder pattern)
    pub fn with_busy_timeout(mut self, busy_timeout: Duration) -> Self {
        self.busy_timeout = busy_timeout;
        self
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Open a fresh connection with the busy timeout applied
    pub(crate) async fn connect(&self) -> Result<Connection, TursoError> {
        let conn = self
            .db
            .connect()
            .map_err(|e| TursoError::Connection(e.to_string()))?;
        pragma(
            &conn,
            &format!("PRAGMA busy_timeout = {}", self.busy_timeout.as_millis()),
        )
        .await?;
        Ok(conn)
    }

    /// Run an operation, retrying contention with linear backoff.
    ///
    /// Busy databases and uniqueness races are retried up to the policy's
    /// attempt budget, then surface as `ConflictRetryExhausted`.
    pub(crate) async fn with_retry<T, F, Fut>(
        &self,
        operation: &str,
        mut attempt: F,
    ) -> Result<T, StoreError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, TursoError>>,
    {
        let mut attempts = 0;
        loop {
            attempts += 1;
            let error = match attempt().await {
                Ok(value) => return Ok(value),
                Err(error) => error,
            };

            let contended = matches!(error, TursoError::Busy(_)) || error.is_uniqueness_race();
            if !contended {
                crate::error!("Storage operation '{}' failed: {}", operation, error);
                return Err(match error {
                    TursoError::Connection(message) => StoreError::Unavailable(message),
                    TursoError::Decode(message) => StoreError::Corrupt(message),
                    other => StoreError::Query(other.to_string()),
                });
            }

            if attempts >= self.retry.max_attempts {
                crate::warn!(
                    "Storage operation '{}' gave up after {} attempts: {}",
                    operation,
                    attempts,
                    error
                );
                return Err(StoreError::ConflictRetryExhausted {
                    operation: operation.to_string(),
                    attempts,
                });
            }

            crate::debug!(
                "Storage operation '{}' conflicted (attempt {}): {}",
                operation,
                attempts,
                error
            );
            tokio::time::sleep(self.retry.backoff * attempts).await;
        }
    }
}

/// Run a PRAGMA and step its result row so the setting takes effect
async fn pragma(conn: &Connection, sql: &str) -> Result<(), TursoError> {
    let mut rows = conn.query(sql, ()).await?;
    rows.next().await?;
    Ok(())
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
