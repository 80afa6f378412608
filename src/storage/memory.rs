// In-memory term store
// A single map keyed by canonical term holds all three partitions, so a term
// can never live in two of them; one lock makes every operation atomic.

use super::traits::{
    CandidateOccurrence, DocumentChanges, DocumentOutcome, PromotionOutcome, RecordOutcome,
    StoreError, StoreStatistics, TermStoreBackend,
};
use crate::glossary::{CandidateEntry, CandidateFilter, Glossary, GlossaryEntry};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;

/// What a canonical term currently is
#[derive(Debug, Clone, PartialEq, Eq)]
enum StoredTerm {
    Glossary(GlossaryEntry),
    Candidate(CandidateEntry),
}

/// Process-local backend for ephemeral runs and tests
#[derive(Debug, Default)]
pub struct MemoryTermStore {
    terms: Mutex<HashMap<String, StoredTerm>>,
}

impl MemoryTermStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with glossary entries already present
    pub fn with_glossary_entries(entries: impl IntoIterator<Item = GlossaryEntry>) -> Self {
        let store = Self::new();
        {
            let mut terms = store.terms.lock();
            for entry in entries {
                terms
                    .entry(entry.term.clone())
                    .or_insert(StoredTerm::Glossary(entry));
            }
        }
        store
    }

    fn record(terms: &mut HashMap<String, StoredTerm>, occurrence: &CandidateOccurrence) -> RecordOutcome {
        match terms.get_mut(&occurrence.term) {
            Some(StoredTerm::Glossary(_)) => RecordOutcome::Shadowed,
            Some(StoredTerm::Candidate(existing)) => {
                existing.last_seen = existing.last_seen.max(occurrence.seen_at);
                existing.occurrences += occurrence.count;
                RecordOutcome::Updated
            }
            None => {
                terms.insert(
                    occurrence.term.clone(),
                    StoredTerm::Candidate(CandidateEntry {
                        term: occurrence.term.clone(),
                        first_seen: occurrence.seen_at,
                        last_seen: occurrence.seen_at,
                        context_snippet: occurrence.context_snippet.clone(),
                        occurrences: occurrence.count,
                    }),
                );
                RecordOutcome::Inserted
            }
        }
    }
}

#[async_trait]
impl TermStoreBackend for MemoryTermStore {
    async fn apply_document(&self, changes: &DocumentChanges) -> Result<DocumentOutcome, StoreError> {
        let mut terms = self.terms.lock();
        let mut outcome = DocumentOutcome::default();

        for seed in &changes.glossary_seeds {
            // Seeds replace a stale candidate but never an existing glossary entry
            if !matches!(terms.get(&seed.term), Some(StoredTerm::Glossary(_))) {
                terms.insert(seed.term.clone(), StoredTerm::Glossary(seed.clone()));
                outcome.seeded.push(seed.term.clone());
            }
        }

        for occurrence in &changes.occurrences {
            let recorded = Self::record(&mut terms, occurrence);
            outcome.recorded.push((occurrence.term.clone(), recorded));
        }

        Ok(outcome)
    }

    async fn get_candidate(&self, term: &str) -> Result<Option<CandidateEntry>, StoreError> {
        Ok(match self.terms.lock().get(term) {
            Some(StoredTerm::Candidate(entry)) => Some(entry.clone()),
            _ => None,
        })
    }

    async fn list_candidates(
        &self,
        filter: &CandidateFilter,
    ) -> Result<Vec<CandidateEntry>, StoreError> {
        let mut entries: Vec<CandidateEntry> = self
            .terms
            .lock()
            .values()
            .filter_map(|stored| match stored {
                StoredTerm::Candidate(entry) if filter.matches(entry) => Some(entry.clone()),
                _ => None,
            })
            .collect();

        entries.sort_by(|a, b| a.first_seen.cmp(&b.first_seen).then_with(|| a.term.cmp(&b.term)));
        if let Some(limit) = filter.limit {
            entries.truncate(limit);
        }
        Ok(entries)
    }

    async fn remove_candidate(&self, term: &str) -> Result<bool, StoreError> {
        let mut terms = self.terms.lock();
        if matches!(terms.get(term), Some(StoredTerm::Candidate(_))) {
            terms.remove(term);
            return Ok(true);
        }
        Ok(false)
    }

    async fn promote_candidate(
        &self,
        term: &str,
        glossary: Glossary,
        category: Option<String>,
    ) -> Result<PromotionOutcome, StoreError> {
        let mut terms = self.terms.lock();
        let candidate = match terms.get(term) {
            Some(StoredTerm::Candidate(candidate)) => candidate.clone(),
            // The single map cannot hold a candidate and a glossary entry for the same term
            _ => return Ok(PromotionOutcome::NotACandidate),
        };

        let entry = GlossaryEntry {
            term: candidate.term,
            glossary,
            category,
            first_seen: candidate.first_seen,
        };
        terms.insert(term.to_string(), StoredTerm::Glossary(entry.clone()));
        Ok(PromotionOutcome::Promoted(entry))
    }

    async fn get_glossary_entry(&self, term: &str) -> Result<Option<GlossaryEntry>, StoreError> {
        Ok(match self.terms.lock().get(term) {
            Some(StoredTerm::Glossary(entry)) => Some(entry.clone()),
            _ => None,
        })
    }

    async fn list_glossary(&self, glossary: Glossary) -> Result<Vec<GlossaryEntry>, StoreError> {
        let mut entries: Vec<GlossaryEntry> = self
            .terms
            .lock()
            .values()
            .filter_map(|stored| match stored {
                StoredTerm::Glossary(entry) if entry.glossary == glossary => Some(entry.clone()),
                _ => None,
            })
            .collect();

        entries.sort_by(|a, b| a.first_seen.cmp(&b.first_seen).then_with(|| a.term.cmp(&b.term)));
        Ok(entries)
    }

    async fn statistics(&self) -> Result<StoreStatistics, StoreError> {
        let terms = self.terms.lock();
        let mut stats = StoreStatistics::default();
        for stored in terms.values() {
            match stored {
                StoredTerm::Glossary(entry) => match entry.glossary {
                    Glossary::Economic => stats.economic_terms += 1,
                    Glossary::Argentine => stats.argentine_terms += 1,
                },
                StoredTerm::Candidate(entry) => {
                    stats.candidates += 1;
                    stats.candidate_occurrences += entry.occurrences;
                }
            }
        }
        Ok(stats)
    }
}

#[cfg(test)]
#[path = "memory_test.rs"]
mod tests;
