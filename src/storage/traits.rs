//! Storage backend trait for glossary and candidate persistence.
//!
//! The trait defines the atomic operations the curation engine relies on,
//! decoupling it from the specific storage implementation. The primary
//! implementation is TursoClient; MemoryTermStore backs ephemeral use and tests.

use crate::glossary::{CandidateEntry, CandidateFilter, Glossary, GlossaryEntry};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

/// Error types for storage backends
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    /// Backend unreachable (connection, I/O)
    #[error("Storage backend unavailable: {0}")]
    Unavailable(String),
    /// Operation did not finish within the configured limit
    #[error("Storage operation '{operation}' timed out after {limit:?}")]
    Timeout { operation: String, limit: Duration },
    /// Contention did not clear within the retry budget
    #[error("Storage operation '{operation}' still conflicting after {attempts} attempts")]
    ConflictRetryExhausted { operation: String, attempts: u32 },
    /// Backend rejected the statement
    #[error("Storage query failed: {0}")]
    Query(String),
    /// Stored data could not be decoded
    #[error("Stored data is corrupt: {0}")]
    Corrupt(String),
}

/// One term's occurrences within a single document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateOccurrence {
    pub term: String,
    /// Snippet around the first occurrence in the document
    pub context_snippet: String,
    pub seen_at: DateTime<Utc>,
    /// How many times the term occurred (at least 1)
    pub count: u64,
}

/// Every side effect of one document, applied atomically
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentChanges {
    /// Pre-seeded glossary terms recognized for the first time; inserted if absent
    pub glossary_seeds: Vec<GlossaryEntry>,
    /// Candidate occurrences to upsert
    pub occurrences: Vec<CandidateOccurrence>,
}

impl DocumentChanges {
    pub fn is_empty(&self) -> bool {
        self.glossary_seeds.is_empty() && self.occurrences.is_empty()
    }
}

/// Effect of recording one occurrence
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RecordOutcome {
    /// New candidate row created
    Inserted,
    /// Existing candidate row bumped
    Updated,
    /// Term already lives in a glossary; nothing written
    Shadowed,
}

/// Result of applying a document's changes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentOutcome {
    /// Seeded terms that were actually inserted into a glossary
    pub seeded: Vec<String>,
    /// Per-occurrence outcome, in input order
    pub recorded: Vec<(String, RecordOutcome)>,
}

/// Result of a promotion attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromotionOutcome {
    /// Candidate moved into the target glossary
    Promoted(GlossaryEntry),
    /// Term was already in a glossary; existing entry kept, candidate removed
    AlreadyKnown(GlossaryEntry),
    /// No candidate row exists for the term
    NotACandidate,
}

/// Row counts across the three partitions
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StoreStatistics {
    pub economic_terms: u64,
    pub argentine_terms: u64,
    pub candidates: u64,
    pub candidate_occurrences: u64,
}

/// Backend trait for glossary and candidate storage.
///
/// Every mutating method must be atomic: either all of its writes land or none do,
/// and the same canonical term never lands in two partitions.
#[async_trait]
pub trait TermStoreBackend: Send + Sync {
    /// Apply seeds and candidate upserts for one document in a single transaction.
    async fn apply_document(&self, changes: &DocumentChanges) -> Result<DocumentOutcome, StoreError>;

    /// Get a candidate by canonical term.
    async fn get_candidate(&self, term: &str) -> Result<Option<CandidateEntry>, StoreError>;

    /// List candidates ordered by first_seen, then term.
    async fn list_candidates(
        &self,
        filter: &CandidateFilter,
    ) -> Result<Vec<CandidateEntry>, StoreError>;

    /// Delete a candidate. Returns false if it was already absent.
    async fn remove_candidate(&self, term: &str) -> Result<bool, StoreError>;

    /// Move a candidate into a glossary, keeping its first_seen.
    async fn promote_candidate(
        &self,
        term: &str,
        glossary: Glossary,
        category: Option<String>,
    ) -> Result<PromotionOutcome, StoreError>;

    /// Get a glossary entry by canonical term, whichever glossary holds it.
    async fn get_glossary_entry(&self, term: &str) -> Result<Option<GlossaryEntry>, StoreError>;

    /// List one glossary ordered by first_seen, then term.
    async fn list_glossary(&self, glossary: Glossary) -> Result<Vec<GlossaryEntry>, StoreError>;

    /// Count rows in every partition.
    async fn statistics(&self) -> Result<StoreStatistics, StoreError>;
}

#[cfg(test)]
#[path = "traits_test.rs"]
mod tests;
