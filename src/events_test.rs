use super::*;
use std::sync::{Arc, Mutex};

/// Mock emitter that records all emitted events for testing
#[derive(Default)]
pub struct MockEventEmitter {
    pub candidates_events: Arc<Mutex<Vec<candidate_events::CandidatesUpdatedPayload>>>,
    pub glossary_events: Arc<Mutex<Vec<glossary_events::GlossaryUpdatedPayload>>>,
}

impl MockEventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Actions of every candidates_updated event, in order
    pub fn candidate_actions(&self) -> Vec<String> {
        self.candidates_events
            .lock()
            .unwrap()
            .iter()
            .map(|p| p.action.clone())
            .collect()
    }
}

impl CurationEventEmitter for MockEventEmitter {
    fn emit_candidates_updated(&self, payload: candidate_events::CandidatesUpdatedPayload) {
        self.candidates_events.lock().unwrap().push(payload);
    }

    fn emit_glossary_updated(&self, payload: glossary_events::GlossaryUpdatedPayload) {
        self.glossary_events.lock().unwrap().push(payload);
    }
}

#[test]
fn test_event_names() {
    assert_eq!(candidate_events::CANDIDATES_UPDATED, "candidates_updated");
    assert_eq!(glossary_events::GLOSSARY_UPDATED, "glossary_updated");
}

#[test]
fn test_glossary_payload_serializes_camel_case() {
    let payload = glossary_updated("promote", Glossary::Argentine, "chamuyo");
    let json = serde_json::to_value(&payload).unwrap();

    assert_eq!(json["action"], "promote");
    assert_eq!(json["glossary"], "argentine");
    assert_eq!(json["term"], "chamuyo");
    assert!(json["timestamp"].as_str().unwrap().contains('T'));
}

#[test]
fn test_candidates_payload_keeps_term_order() {
    let payload = candidates_updated("detect", vec!["zeta".into(), "alfa".into()]);
    assert_eq!(payload.terms, vec!["zeta", "alfa"]);
}

#[test]
fn test_mock_emitter_records_events() {
    let emitter = MockEventEmitter::new();
    emitter.emit_candidates_updated(candidates_updated("discard", vec!["bondi".into()]));
    emitter.emit_glossary_updated(glossary_updated("seed", Glossary::Economic, "pib"));

    assert_eq!(emitter.candidate_actions(), vec!["discard"]);
    assert_eq!(emitter.glossary_events.lock().unwrap().len(), 1);
}

#[test]
fn test_log_emitter_accepts_events() {
    let emitter = LogEventEmitter;
    emitter.emit_candidates_updated(candidates_updated("reconcile", Vec::new()));
    emitter.emit_glossary_updated(glossary_updated("promote", Glossary::Economic, "cepo"));
}
