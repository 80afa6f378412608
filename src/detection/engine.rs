// Detection engine - classifies every token of a document
//
// Flow: tokenize -> normalize -> greedy longest phrase match -> single-token
// screening -> classify against the registry snapshot -> one atomic write
// of every side effect.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;

use super::report::DetectionReport;
use super::screening::ScreeningRules;
use crate::events::{self, CurationEventEmitter, LogEventEmitter};
use crate::glossary::{
    storage_precision, CandidateLedger, CurationError, GlossaryEntry, KnownTerm, RegistrySnapshot,
    TermRegistry,
};
use crate::storage::{CandidateOccurrence, DocumentChanges, RecordOutcome};
use crate::text::{context_window, normalize, tokenize, Token, DEFAULT_CONTEXT_WIDTH};

/// Side effects collected while scanning one document
#[derive(Default)]
struct PendingChanges {
    seeds: Vec<GlossaryEntry>,
    occurrences: Vec<CandidateOccurrence>,
    index: HashMap<String, usize>,
}

impl PendingChanges {
    /// Queue a seeded term for insertion the first time it shows up in the document
    fn seed(&mut self, term: &str, known: &KnownTerm, seen_at: DateTime<Utc>) {
        if known.persisted || self.seeds.iter().any(|seed| seed.term == term) {
            return;
        }
        self.seeds.push(GlossaryEntry {
            term: term.to_string(),
            glossary: known.glossary,
            category: known.category.clone(),
            first_seen: seen_at,
        });
    }

    /// Count an occurrence; the first one in the document provides the snippet
    fn occurrence(&mut self, term: &str, snippet: impl FnOnce() -> String, seen_at: DateTime<Utc>) {
        if let Some(&idx) = self.index.get(term) {
            self.occurrences[idx].count += 1;
            return;
        }
        self.index.insert(term.to_string(), self.occurrences.len());
        self.occurrences.push(CandidateOccurrence {
            term: term.to_string(),
            context_snippet: snippet(),
            seen_at,
            count: 1,
        });
    }

    fn into_changes(self) -> DocumentChanges {
        DocumentChanges {
            glossary_seeds: self.seeds,
            occurrences: self.occurrences,
        }
    }
}

pub struct DetectionEngine {
    registry: Arc<TermRegistry>,
    ledger: CandidateLedger,
    rules: ScreeningRules,
    context_width: usize,
    emitter: Arc<dyn CurationEventEmitter>,
}

impl std::fmt::Debug for DetectionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DetectionEngine")
            .field("rules", &self.rules)
            .field("context_width", &self.context_width)
            .finish_non_exhaustive()
    }
}

impl DetectionEngine {
    pub fn new(registry: Arc<TermRegistry>, ledger: CandidateLedger, rules: ScreeningRules) -> Self {
        Self {
            registry,
            ledger,
            rules,
            context_width: DEFAULT_CONTEXT_WIDTH,
            emitter: Arc::new(LogEventEmitter),
        }
    }

    /// Characters captured on each side of a candidate (builder pattern)
    pub fn with_context_width(mut self, context_width: usize) -> Self {
        self.context_width = context_width;
        self
    }

    /// Replace the default log emitter (builder pattern)
    pub fn with_emitter(mut self, emitter: Arc<dyn CurationEventEmitter>) -> Self {
        self.emitter = emitter;
        self
    }

    pub fn registry(&self) -> &Arc<TermRegistry> {
        &self.registry
    }

    /// Detect terms in a document, stamping occurrences with the current time
    pub async fn detect(&self, text: &str) -> Result<DetectionReport, CurationError> {
        self.detect_at(text, Utc::now()).await
    }

    /// Detect terms in a document with an explicit occurrence timestamp.
    ///
    /// Blank documents produce an empty report without touching storage.
    /// On a storage error nothing from this document is applied.
    pub async fn detect_at(
        &self,
        text: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<DetectionReport, CurationError> {
        if text.trim().is_empty() {
            crate::warn!("Skipping detection of an empty document");
            return Ok(DetectionReport::default());
        }

        let seen_at = storage_precision(timestamp);
        let snapshot = self.registry.snapshot();
        let tokens: Vec<(Token<'_>, String)> = tokenize(text)
            .map(|token| (token, normalize(token.raw)))
            .collect();

        let (mut report, pending) = self.scan(text, &tokens, &snapshot, seen_at);
        let changes = pending.into_changes();
        if changes.is_empty() {
            crate::debug!("Detection found nothing to record ({} tokens)", report.tokens_seen);
            return Ok(report);
        }

        let outcome = match self.ledger.record_document(&changes).await {
            Ok(outcome) => outcome,
            Err(error) => {
                crate::error!("Detection pass failed, document discarded: {}", error);
                return Err(error);
            }
        };

        for (term, recorded) in &outcome.recorded {
            match recorded {
                RecordOutcome::Inserted => {
                    report.first_seen_candidates.insert(term.clone());
                }
                RecordOutcome::Updated => {}
                // The store already knows it; the snapshot was stale
                RecordOutcome::Shadowed => {
                    crate::debug!("'{}' is already in a glossary, not a candidate", term);
                    report.new_candidates.remove(term);
                }
            }
        }

        for term in &outcome.seeded {
            if let Some(known) = snapshot.lookup(term) {
                self.emitter
                    .emit_glossary_updated(events::glossary_updated("seed", known.glossary, term));
            }
        }
        if !outcome.seeded.is_empty() {
            crate::info!("Persisted {} seeded glossary terms", outcome.seeded.len());
        }
        if outcome.seeded.len() < changes.glossary_seeds.len() {
            crate::debug!(
                "{} queued seeds were already stored elsewhere",
                changes.glossary_seeds.len() - outcome.seeded.len()
            );
        }
        // Queued seeds must show as persisted in later snapshots, whoever stored them
        if !changes.glossary_seeds.is_empty() {
            if let Err(error) = self.registry.reload(self.ledger.store()).await {
                crate::warn!("Registry reload after seeding failed: {}", error);
            }
        }

        if !report.first_seen_candidates.is_empty() {
            self.emitter.emit_candidates_updated(events::candidates_updated(
                "detect",
                report.first_seen_candidates.iter().cloned().collect(),
            ));
        }

        crate::info!(
            "Detection complete: {} tokens, {} recognized terms, {} candidates ({} new)",
            report.tokens_seen,
            report.recognized.len(),
            report.new_candidates.len(),
            report.first_seen_candidates.len()
        );
        Ok(report)
    }

    /// Classify every token against the snapshot without touching storage
    fn scan(
        &self,
        text: &str,
        tokens: &[(Token<'_>, String)],
        snapshot: &RegistrySnapshot,
        seen_at: DateTime<Utc>,
    ) -> (DetectionReport, PendingChanges) {
        let mut report = DetectionReport {
            tokens_seen: tokens.len(),
            ..DetectionReport::default()
        };
        let mut pending = PendingChanges::default();

        let mut pos = 0;
        while pos < tokens.len() {
            if let Some((term, width)) = longest_phrase(&tokens[pos..], snapshot) {
                if let Some(known) = snapshot.lookup(&term) {
                    report.recognize(&term, known.glossary);
                    pending.seed(&term, known, seen_at);
                }
                pos += width;
                continue;
            }

            let (token, form) = &tokens[pos];
            pos += 1;

            if self.rules.screen(form).is_some() {
                report.tokens_skipped += 1;
                continue;
            }

            match snapshot.lookup(form) {
                Some(known) => {
                    report.recognize(form, known.glossary);
                    pending.seed(form, known, seen_at);
                }
                None => {
                    pending.occurrence(
                        form,
                        || context_window(text, token.start, token.end, self.context_width),
                        seen_at,
                    );
                    report.new_candidates.insert(form.clone());
                }
            }
        }

        (report, pending)
    }
}

/// Longest known multi-word phrase starting at the first token, with its width in tokens
fn longest_phrase(tokens: &[(Token<'_>, String)], snapshot: &RegistrySnapshot) -> Option<(String, usize)> {
    let widest = snapshot.max_words().min(tokens.len());
    (2..=widest).rev().find_map(|width| {
        let window = &tokens[..width];
        // Clause punctuation between words, or a punctuation-only token, breaks a phrase
        if window.iter().skip(1).any(|(token, _)| token.breaks_phrase)
            || window.iter().any(|(_, form)| form.is_empty())
        {
            return None;
        }
        let phrase = window
            .iter()
            .map(|(_, form)| form.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        snapshot.lookup(&phrase).is_some().then_some((phrase, width))
    })
}

#[cfg(test)]
#[path = "engine_test.rs"]
mod tests;
