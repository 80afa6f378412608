// Candidate ledger - unseen canonical forms awaiting review
//
// A thin typed facade over the store: validation and logging happen here,
// atomicity is the backend's job.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::error::CurationError;
use super::types::{storage_precision, CandidateEntry, CandidateFilter};
use crate::storage::{
    CandidateOccurrence, DocumentChanges, DocumentOutcome, RecordOutcome, StoreStatistics,
    TermStore,
};

/// Totals over the candidate partition
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LedgerStatistics {
    pub candidates: u64,
    pub occurrences: u64,
}

impl From<StoreStatistics> for LedgerStatistics {
    fn from(stats: StoreStatistics) -> Self {
        Self {
            candidates: stats.candidates,
            occurrences: stats.candidate_occurrences,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CandidateLedger {
    store: TermStore,
}

impl CandidateLedger {
    pub fn new(store: TermStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &TermStore {
        &self.store
    }

    /// Record one occurrence of a canonical term.
    ///
    /// Inserts on first sight, otherwise bumps last_seen and the count.
    /// The snippet of the first occurrence is kept.
    pub async fn record_occurrence(
        &self,
        canonical: &str,
        snippet: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<RecordOutcome, CurationError> {
        if canonical.is_empty() {
            return Err(CurationError::Validation(
                "Cannot record an empty term".to_string(),
            ));
        }

        let changes = DocumentChanges {
            glossary_seeds: Vec::new(),
            occurrences: vec![CandidateOccurrence {
                term: canonical.to_string(),
                context_snippet: snippet.to_string(),
                seen_at: storage_precision(timestamp),
                count: 1,
            }],
        };
        let outcome = self.record_document(&changes).await?;

        outcome
            .recorded
            .into_iter()
            .next()
            .map(|(_, recorded)| recorded)
            .ok_or_else(|| {
                CurationError::StorageUnavailable(format!(
                    "Store reported no outcome for '{}'",
                    canonical
                ))
            })
    }

    /// Apply every side effect of one document atomically
    pub async fn record_document(
        &self,
        changes: &DocumentChanges,
    ) -> Result<DocumentOutcome, CurationError> {
        if let Some(empty) = changes.occurrences.iter().find(|o| o.term.is_empty() || o.count == 0) {
            return Err(CurationError::Validation(format!(
                "Invalid occurrence for term '{}' (count {})",
                empty.term, empty.count
            )));
        }

        let outcome = self.store.apply_document(changes).await?;
        for (term, recorded) in &outcome.recorded {
            if *recorded == RecordOutcome::Inserted {
                crate::info!("New candidate term: {}", term);
            }
        }
        Ok(outcome)
    }

    /// Delete a candidate. Returns false if it was not in the ledger.
    pub async fn remove(&self, canonical: &str) -> Result<bool, CurationError> {
        Ok(self.store.remove_candidate(canonical).await?)
    }

    pub async fn get(&self, canonical: &str) -> Result<Option<CandidateEntry>, CurationError> {
        Ok(self.store.get_candidate(canonical).await?)
    }

    pub async fn list(&self, filter: &CandidateFilter) -> Result<Vec<CandidateEntry>, CurationError> {
        Ok(self.store.list_candidates(filter).await?)
    }

    pub async fn statistics(&self) -> Result<LedgerStatistics, CurationError> {
        Ok(self.store.statistics().await?.into())
    }
}

#[cfg(test)]
#[path = "ledger_test.rs"]
mod tests;
