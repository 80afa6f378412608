// Term registry - immutable snapshot of every known term, swapped on reload
//
// Readers clone the Arc and classify against it without holding the lock, so
// a reload never blocks a detection pass that is already running.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use super::error::CurationError;
use super::types::{Glossary, GlossaryEntry, TermStatus};
use crate::storage::TermStore;
use crate::text::normalize_phrase;

/// Category given to economic terms that enter the glossary from the seed list
pub const SEED_ECONOMIC_CATEGORY: &str = "economic";

/// Economic terms recognized before anything has been promoted
pub const DEFAULT_ECONOMIC_SEEDS: &[&str] = &[
    "inflación",
    "pobreza",
    "desempleo",
    "reservas",
    "dólar",
    "peso",
    "PIB",
    "déficit",
    "superávit",
    "tarifas",
    "subsidios",
    "impuestos",
];

/// Colloquial expressions recognized before anything has been promoted
pub const DEFAULT_ARGENTINE_SEEDS: &[&str] = &[
    "laburo", "guita", "quilombo", "bondi", "mango", "fiaca", "che", "posta", "macana", "changas",
];

/// Seed lists as configured (raw, not yet normalized)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedTerms {
    pub economic: Vec<String>,
    pub argentine: Vec<String>,
}

impl Default for SeedTerms {
    fn default() -> Self {
        Self {
            economic: DEFAULT_ECONOMIC_SEEDS.iter().map(|s| s.to_string()).collect(),
            argentine: DEFAULT_ARGENTINE_SEEDS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl SeedTerms {
    pub fn none() -> Self {
        Self {
            economic: Vec::new(),
            argentine: Vec::new(),
        }
    }
}

/// What the registry knows about one canonical term
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownTerm {
    pub glossary: Glossary,
    pub category: Option<String>,
    /// False while the term only comes from a seed list
    pub persisted: bool,
}

/// Immutable view of both glossaries at one point in time
#[derive(Debug, Clone, Default)]
pub struct RegistrySnapshot {
    terms: HashMap<String, KnownTerm>,
    max_words: usize,
}

impl RegistrySnapshot {
    /// Build a snapshot from stored entries plus seed lists.
    ///
    /// Stored entries always win over seeds. A term seeded into both lists stays economic.
    pub fn build(stored: impl IntoIterator<Item = GlossaryEntry>, seeds: &SeedTerms) -> Self {
        let mut snapshot = Self::default();

        for entry in stored {
            snapshot.insert(
                entry.term,
                KnownTerm {
                    glossary: entry.glossary,
                    category: entry.category,
                    persisted: true,
                },
            );
        }

        let seeded = seeds
            .economic
            .iter()
            .map(|raw| (raw, Glossary::Economic))
            .chain(seeds.argentine.iter().map(|raw| (raw, Glossary::Argentine)));

        for (raw, glossary) in seeded {
            let term = normalize_phrase(raw);
            if term.is_empty() {
                crate::warn!("Ignoring seed term '{}' with empty canonical form", raw);
                continue;
            }
            match snapshot.terms.get(&term) {
                Some(existing) if existing.glossary != glossary && !existing.persisted => {
                    crate::warn!(
                        "Seed term '{}' listed in both glossaries; keeping {}",
                        term,
                        existing.glossary
                    );
                }
                Some(_) => {}
                None => {
                    let category = match glossary {
                        Glossary::Economic => Some(SEED_ECONOMIC_CATEGORY.to_string()),
                        Glossary::Argentine => None,
                    };
                    snapshot.insert(
                        term,
                        KnownTerm {
                            glossary,
                            category,
                            persisted: false,
                        },
                    );
                }
            }
        }

        snapshot
    }

    fn insert(&mut self, term: String, known: KnownTerm) {
        let words = term.split(' ').count();
        self.max_words = self.max_words.max(words);
        self.terms.entry(term).or_insert(known);
    }

    pub fn classify(&self, canonical: &str) -> TermStatus {
        match self.terms.get(canonical) {
            Some(known) => TermStatus::KnownIn(known.glossary),
            None => TermStatus::Unknown,
        }
    }

    pub fn lookup(&self, canonical: &str) -> Option<&KnownTerm> {
        self.terms.get(canonical)
    }

    /// Word count of the longest registered term (0 when empty)
    pub fn max_words(&self) -> usize {
        self.max_words
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Shared registry of known terms.
///
/// Pass it around as `Arc<TermRegistry>`; anything that changes a glossary
/// must call [`TermRegistry::reload`] afterwards.
#[derive(Debug)]
pub struct TermRegistry {
    snapshot: RwLock<Arc<RegistrySnapshot>>,
    seeds: SeedTerms,
    /// Held across read and swap so an older read never replaces a newer snapshot
    reload_lock: tokio::sync::Mutex<()>,
}

impl TermRegistry {
    /// Create a registry that knows only the seed lists until the first reload
    pub fn new(seeds: SeedTerms) -> Self {
        let snapshot = RegistrySnapshot::build(Vec::new(), &seeds);
        Self {
            snapshot: RwLock::new(Arc::new(snapshot)),
            seeds,
            reload_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Current snapshot; stays valid even if a reload swaps in a newer one
    pub fn snapshot(&self) -> Arc<RegistrySnapshot> {
        self.snapshot.read().clone()
    }

    pub fn classify(&self, canonical: &str) -> TermStatus {
        self.snapshot.read().classify(canonical)
    }

    /// Rebuild the snapshot from both stored glossaries and the seed lists.
    ///
    /// Concurrent reloads run one at a time, so the last swap always holds the
    /// latest read.
    pub async fn reload(&self, store: &TermStore) -> Result<Arc<RegistrySnapshot>, CurationError> {
        let _guard = self.reload_lock.lock().await;
        let mut stored = Vec::new();
        for glossary in Glossary::ALL {
            stored.extend(store.list_glossary(glossary).await?);
        }
        let persisted = stored.len();

        let snapshot = Arc::new(RegistrySnapshot::build(stored, &self.seeds));
        *self.snapshot.write() = snapshot.clone();

        crate::info!(
            "Term registry reloaded: {} known terms ({} persisted, longest {} words)",
            snapshot.len(),
            persisted,
            snapshot.max_words()
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;
