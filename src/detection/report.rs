// Per-document detection report

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::glossary::Glossary;

/// A known term seen in the document and how often
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RecognizedTerm {
    pub glossary: Glossary,
    pub count: u64,
}

/// Outcome of classifying every token of one document
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DetectionReport {
    /// Known terms keyed by canonical form
    pub recognized: BTreeMap<String, RecognizedTerm>,
    /// Unknown terms recorded in the candidate ledger
    pub new_candidates: BTreeSet<String>,
    /// Subset of `new_candidates` this document inserted into the ledger
    pub first_seen_candidates: BTreeSet<String>,
    /// Raw tokens in the document
    pub tokens_seen: usize,
    /// Single tokens dropped as noise
    pub tokens_skipped: usize,
}

impl DetectionReport {
    pub fn is_empty(&self) -> bool {
        self.recognized.is_empty() && self.new_candidates.is_empty() && self.tokens_seen == 0
    }

    /// Occurrences of a recognized term (0 if it was not recognized)
    pub fn recognized_count(&self, term: &str) -> u64 {
        self.recognized.get(term).map_or(0, |r| r.count)
    }

    pub(crate) fn recognize(&mut self, term: &str, glossary: Glossary) {
        self.recognized
            .entry(term.to_string())
            .or_insert(RecognizedTerm { glossary, count: 0 })
            .count += 1;
    }
}
