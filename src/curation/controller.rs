// Curation controller - moves terms out of the candidate ledger
//
// Every glossary change is followed by a registry reload so detection stops
// flagging the term; the window in between is accepted and self-heals.

use serde::Serialize;
use std::sync::Arc;

use crate::events::{self, CurationEventEmitter, LogEventEmitter};
use crate::glossary::{
    CandidateEntry, CandidateFilter, CandidateLedger, CurationError, Glossary, GlossaryEntry,
    TermRegistry,
};
use crate::storage::{PromotionOutcome, StoreStatistics};
use crate::text::normalize_phrase;

/// Category used for economic promotions that did not name one
pub const MANUAL_CATEGORY: &str = "manual";

/// Successful promotion result
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "outcome", content = "entry", rename_all = "camelCase")]
pub enum Promotion {
    /// The candidate is now a glossary entry
    Promoted(GlossaryEntry),
    /// The term was already in a glossary; that entry was kept
    AlreadyKnown(GlossaryEntry),
}

impl Promotion {
    pub fn entry(&self) -> &GlossaryEntry {
        match self {
            Promotion::Promoted(entry) | Promotion::AlreadyKnown(entry) => entry,
        }
    }
}

/// Store counts plus the size of the current registry snapshot
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CurationStatistics {
    #[serde(flatten)]
    pub store: StoreStatistics,
    /// Terms the registry recognizes, seeds included
    pub known_terms: usize,
}

pub struct CurationController {
    registry: Arc<TermRegistry>,
    ledger: CandidateLedger,
    emitter: Arc<dyn CurationEventEmitter>,
}

impl std::fmt::Debug for CurationController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CurationController")
            .field("ledger", &self.ledger)
            .finish_non_exhaustive()
    }
}

/// Canonicalize user input, rejecting anything that normalizes to nothing
fn canonical(term: &str) -> Result<String, CurationError> {
    let canonical = normalize_phrase(term);
    if canonical.is_empty() {
        return Err(CurationError::Validation(format!(
            "'{}' has no canonical form",
            term
        )));
    }
    Ok(canonical)
}

impl CurationController {
    pub fn new(registry: Arc<TermRegistry>, ledger: CandidateLedger) -> Self {
        Self {
            registry,
            ledger,
            emitter: Arc::new(LogEventEmitter),
        }
    }

    /// Replace the default log emitter (builder pattern)
    pub fn with_emitter(mut self, emitter: Arc<dyn CurationEventEmitter>) -> Self {
        self.emitter = emitter;
        self
    }

    async fn refresh_registry(&self) {
        if let Err(error) = self.registry.reload(self.ledger.store()).await {
            crate::warn!("Registry reload failed, snapshot stays stale: {}", error);
        }
    }

    /// Promote a candidate into a glossary.
    ///
    /// Economic entries without a category get "manual"; a category given for
    /// an Argentine entry is dropped.
    pub async fn promote(
        &self,
        term: &str,
        target: Glossary,
        category: Option<&str>,
    ) -> Result<Promotion, CurationError> {
        let canonical = canonical(term)?;
        let category = category.map(str::trim).filter(|c| !c.is_empty());
        let category = match target {
            Glossary::Economic => Some(category.unwrap_or(MANUAL_CATEGORY).to_string()),
            Glossary::Argentine => {
                if let Some(ignored) = category {
                    crate::warn!(
                        "Ignoring category '{}' for Argentine term '{}'",
                        ignored,
                        canonical
                    );
                }
                None
            }
        };

        let outcome = self
            .ledger
            .store()
            .promote_candidate(&canonical, target, category)
            .await?;

        let promotion = match outcome {
            PromotionOutcome::Promoted(entry) => {
                crate::info!("Promoted '{}' to the {} glossary", entry.term, entry.glossary);
                self.emitter
                    .emit_glossary_updated(events::glossary_updated("promote", entry.glossary, &entry.term));
                Promotion::Promoted(entry)
            }
            PromotionOutcome::AlreadyKnown(entry) => {
                crate::info!(
                    "'{}' was already in the {} glossary; candidate removed",
                    entry.term,
                    entry.glossary
                );
                Promotion::AlreadyKnown(entry)
            }
            PromotionOutcome::NotACandidate => {
                return Err(CurationError::NotACandidate(canonical));
            }
        };

        self.emitter
            .emit_candidates_updated(events::candidates_updated("promote", vec![canonical]));
        self.refresh_registry().await;
        Ok(promotion)
    }

    /// Remove a candidate without creating a glossary entry.
    ///
    /// Returns whether anything was removed; an absent candidate is not an error.
    pub async fn discard(&self, term: &str) -> Result<bool, CurationError> {
        let canonical = canonical(term)?;
        let removed = self.ledger.remove(&canonical).await?;

        if removed {
            crate::info!("Discarded candidate '{}'", canonical);
            self.emitter
                .emit_candidates_updated(events::candidates_updated("discard", vec![canonical]));
        } else {
            crate::debug!("Discard of '{}' was a no-op", canonical);
        }
        Ok(removed)
    }

    /// Reload the registry and drop every candidate it now recognizes.
    ///
    /// Resolves the race where a term is promoted while a detection pass
    /// with an older snapshot records it again.
    pub async fn reconcile(&self) -> Result<Vec<String>, CurationError> {
        let snapshot = self.registry.reload(self.ledger.store()).await?;
        let candidates = self.ledger.list(&CandidateFilter::default()).await?;

        let mut removed = Vec::new();
        for candidate in candidates {
            if snapshot.classify(&candidate.term).is_known()
                && self.ledger.remove(&candidate.term).await?
            {
                removed.push(candidate.term);
            }
        }

        if removed.is_empty() {
            crate::debug!("Reconcile found no stale candidates");
        } else {
            crate::info!("Reconcile removed {} known terms from the ledger", removed.len());
            self.emitter
                .emit_candidates_updated(events::candidates_updated("reconcile", removed.clone()));
        }
        Ok(removed)
    }

    pub async fn list_candidates(
        &self,
        filter: &CandidateFilter,
    ) -> Result<Vec<CandidateEntry>, CurationError> {
        self.ledger.list(filter).await
    }

    pub async fn list_glossary(&self, glossary: Glossary) -> Result<Vec<GlossaryEntry>, CurationError> {
        Ok(self.ledger.store().list_glossary(glossary).await?)
    }

    pub async fn statistics(&self) -> Result<CurationStatistics, CurationError> {
        Ok(CurationStatistics {
            store: self.ledger.store().statistics().await?,
            known_terms: self.registry.snapshot().len(),
        })
    }
}

#[cfg(test)]
#[path = "controller_test.rs"]
mod tests;
