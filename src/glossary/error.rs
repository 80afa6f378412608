// Caller-facing error taxonomy for detection and curation

use crate::storage::StoreError;

/// Errors surfaced by the detection engine and curation controller
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CurationError {
    /// Malformed input (empty document, empty term)
    #[error("Invalid input: {0}")]
    Validation(String),
    /// Promotion target is not currently in the candidate ledger
    #[error("Term '{0}' is not a candidate")]
    NotACandidate(String),
    /// Persistence layer unreachable, timed out, or returned unreadable data
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
    /// An atomic upsert could not be resolved under contention
    #[error("Operation '{operation}' gave up after {attempts} conflicting attempts")]
    ConflictRetryExhausted { operation: String, attempts: u32 },
}

impl CurationError {
    /// Whether the caller may retry the same operation unchanged
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CurationError::StorageUnavailable(_) | CurationError::ConflictRetryExhausted { .. }
        )
    }
}

impl From<StoreError> for CurationError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::ConflictRetryExhausted {
                operation,
                attempts,
            } => CurationError::ConflictRetryExhausted {
                operation,
                attempts,
            },
            other => CurationError::StorageUnavailable(other.to_string()),
        }
    }
}
