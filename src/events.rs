// Curation events for downstream notification
// Defines event payloads and emission trait for testability

use serde::Serialize;

use crate::glossary::Glossary;

/// Candidate ledger event names
pub mod candidate_events {
    pub const CANDIDATES_UPDATED: &str = "candidates_updated";

    /// Payload for candidates_updated event
    #[derive(Debug, Clone, serde::Serialize, PartialEq)]
    #[serde(rename_all = "camelCase")]
    pub struct CandidatesUpdatedPayload {
        /// What changed the ledger: "detect", "promote", "discard" or "reconcile"
        pub action: String,
        /// Canonical terms added or removed
        pub terms: Vec<String>,
        /// ISO 8601 timestamp of the change
        pub timestamp: String,
    }
}

/// Glossary event names
pub mod glossary_events {
    pub const GLOSSARY_UPDATED: &str = "glossary_updated";

    /// Payload for glossary_updated event
    #[derive(Debug, Clone, serde::Serialize, PartialEq)]
    #[serde(rename_all = "camelCase")]
    pub struct GlossaryUpdatedPayload {
        /// "promote" or "seed"
        pub action: String,
        pub glossary: super::Glossary,
        pub term: String,
        /// ISO 8601 timestamp of the change
        pub timestamp: String,
    }
}

/// Trait for emitting curation events
/// Allows mocking in tests while the binary logs them
pub trait CurationEventEmitter: Send + Sync {
    /// Emit candidates_updated event
    fn emit_candidates_updated(&self, payload: candidate_events::CandidatesUpdatedPayload);

    /// Emit glossary_updated event
    fn emit_glossary_updated(&self, payload: glossary_events::GlossaryUpdatedPayload);
}

/// Emitter that writes every event to the log as JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct LogEventEmitter;

impl LogEventEmitter {
    fn log<T: Serialize + std::fmt::Debug>(name: &str, payload: &T) {
        match serde_json::to_string(payload) {
            Ok(json) => crate::info!("event {}: {}", name, json),
            Err(_) => crate::info!("event {}: {:?}", name, payload),
        }
    }
}

impl CurationEventEmitter for LogEventEmitter {
    fn emit_candidates_updated(&self, payload: candidate_events::CandidatesUpdatedPayload) {
        Self::log(candidate_events::CANDIDATES_UPDATED, &payload);
    }

    fn emit_glossary_updated(&self, payload: glossary_events::GlossaryUpdatedPayload) {
        Self::log(glossary_events::GLOSSARY_UPDATED, &payload);
    }
}

/// Build a candidates_updated payload stamped with the current time
pub fn candidates_updated(action: &str, terms: Vec<String>) -> candidate_events::CandidatesUpdatedPayload {
    candidate_events::CandidatesUpdatedPayload {
        action: action.to_string(),
        terms,
        timestamp: current_timestamp(),
    }
}

/// Build a glossary_updated payload stamped with the current time
pub fn glossary_updated(
    action: &str,
    glossary: Glossary,
    term: &str,
) -> glossary_events::GlossaryUpdatedPayload {
    glossary_events::GlossaryUpdatedPayload {
        action: action.to_string(),
        glossary,
        term: term.to_string(),
        timestamp: current_timestamp(),
    }
}

/// Get the current timestamp in ISO 8601 format
pub fn current_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

#[cfg(test)]
#[path = "events_test.rs"]
pub(crate) mod tests;
