//! Storage abstraction layer for glossaries and the candidate ledger.
//!
//! Backends implement [`TermStoreBackend`]; the rest of the crate talks to
//! them through [`TermStore`], which bounds every call by a timeout so a
//! stalled backend surfaces as a retryable error instead of hanging.
//!
//! ## Usage
//!
//! ```ignore
//! use crate::storage::{MemoryTermStore, TermStore};
//!
//! let store = TermStore::new(Arc::new(MemoryTermStore::new()), Duration::from_secs(5));
//! let candidates = store.list_candidates(&CandidateFilter::default()).await?;
//! ```

mod memory;
mod traits;

pub use memory::MemoryTermStore;
pub use traits::{
    CandidateOccurrence, DocumentChanges, DocumentOutcome, PromotionOutcome, RecordOutcome,
    StoreError, StoreStatistics, TermStoreBackend,
};

use crate::glossary::{CandidateEntry, CandidateFilter, Glossary, GlossaryEntry};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Default limit for a single storage call
pub const DEFAULT_STORAGE_TIMEOUT: Duration = Duration::from_secs(5);

/// Shared, cloneable handle to a storage backend with a per-call timeout
#[derive(Clone)]
pub struct TermStore {
    backend: Arc<dyn TermStoreBackend>,
    timeout: Duration,
}

impl std::fmt::Debug for TermStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TermStore")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl TermStore {
    pub fn new(backend: Arc<dyn TermStoreBackend>, timeout: Duration) -> Self {
        Self { backend, timeout }
    }

    /// In-memory store with the default timeout
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryTermStore::new()), DEFAULT_STORAGE_TIMEOUT)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn timed<T, F>(&self, operation: &'static str, future: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        match tokio::time::timeout(self.timeout, future).await {
            Ok(result) => result,
            Err(_) => {
                crate::error!(
                    "Storage operation '{}' timed out after {:?}",
                    operation,
                    self.timeout
                );
                Err(StoreError::Timeout {
                    operation: operation.to_string(),
                    limit: self.timeout,
                })
            }
        }
    }

    pub async fn apply_document(
        &self,
        changes: &DocumentChanges,
    ) -> Result<DocumentOutcome, StoreError> {
        self.timed("apply_document", self.backend.apply_document(changes))
            .await
    }

    pub async fn get_candidate(&self, term: &str) -> Result<Option<CandidateEntry>, StoreError> {
        self.timed("get_candidate", self.backend.get_candidate(term))
            .await
    }

    pub async fn list_candidates(
        &self,
        filter: &CandidateFilter,
    ) -> Result<Vec<CandidateEntry>, StoreError> {
        self.timed("list_candidates", self.backend.list_candidates(filter))
            .await
    }

    pub async fn remove_candidate(&self, term: &str) -> Result<bool, StoreError> {
        self.timed("remove_candidate", self.backend.remove_candidate(term))
            .await
    }

    pub async fn promote_candidate(
        &self,
        term: &str,
        glossary: Glossary,
        category: Option<String>,
    ) -> Result<PromotionOutcome, StoreError> {
        self.timed(
            "promote_candidate",
            self.backend.promote_candidate(term, glossary, category),
        )
        .await
    }

    pub async fn get_glossary_entry(&self, term: &str) -> Result<Option<GlossaryEntry>, StoreError> {
        self.timed("get_glossary_entry", self.backend.get_glossary_entry(term))
            .await
    }

    pub async fn list_glossary(&self, glossary: Glossary) -> Result<Vec<GlossaryEntry>, StoreError> {
        self.timed("list_glossary", self.backend.list_glossary(glossary))
            .await
    }

    pub async fn statistics(&self) -> Result<StoreStatistics, StoreError> {
        self.timed("statistics", self.backend.statistics()).await
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
