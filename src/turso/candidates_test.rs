use super::*;
use crate::turso::initialize_schema;
use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;
use tempfile::TempDir;

async fn setup_client() -> (TursoClient, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let client = TursoClient::new(temp_dir.path().to_path_buf())
        .await
        .expect("Failed to create client");
    initialize_schema(&client)
        .await
        .expect("Failed to initialize schema");
    (client, temp_dir)
}

fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
}

fn occurrence(term: &str, secs: i64) -> CandidateOccurrence {
    CandidateOccurrence {
        term: term.to_string(),
        context_snippet: format!("... {} ...", term),
        seen_at: at(secs),
        count: 1,
    }
}

fn occurrences(items: Vec<CandidateOccurrence>) -> DocumentChanges {
    DocumentChanges {
        glossary_seeds: Vec::new(),
        occurrences: items,
    }
}

fn seed(term: &str, glossary: Glossary) -> GlossaryEntry {
    GlossaryEntry {
        term: term.to_string(),
        glossary,
        category: match glossary {
            Glossary::Economic => Some("economic".to_string()),
            Glossary::Argentine => None,
        },
        first_seen: at(0),
    }
}

#[tokio::test]
async fn test_apply_document_inserts_then_updates() {
    let (client, _temp) = setup_client().await;

    let first = client
        .apply_document(&occurrences(vec![occurrence("boludez", 0)]))
        .await
        .unwrap();
    assert_eq!(first.recorded, vec![("boludez".to_string(), RecordOutcome::Inserted)]);

    let mut later = occurrence("boludez", 60);
    later.context_snippet = "otra frase".to_string();
    later.count = 2;
    let second = client.apply_document(&occurrences(vec![later])).await.unwrap();
    assert_eq!(second.recorded[0].1, RecordOutcome::Updated);

    let entry = client.get_candidate("boludez").await.unwrap().unwrap();
    assert_eq!(entry.first_seen, at(0));
    assert_eq!(entry.last_seen, at(60));
    assert_eq!(entry.context_snippet, "... boludez ...");
    assert_eq!(entry.occurrences, 3);
}

#[tokio::test]
async fn test_last_seen_is_monotonic() {
    let (client, _temp) = setup_client().await;
    client
        .apply_document(&occurrences(vec![occurrence("fiaca", 100)]))
        .await
        .unwrap();
    client
        .apply_document(&occurrences(vec![occurrence("fiaca", 5)]))
        .await
        .unwrap();

    let entry = client.get_candidate("fiaca").await.unwrap().unwrap();
    assert_eq!(entry.last_seen, at(100));
}

#[tokio::test]
async fn test_glossary_terms_are_shadowed() {
    let (client, _temp) = setup_client().await;
    let changes = DocumentChanges {
        glossary_seeds: vec![seed("inflacion", Glossary::Economic)],
        occurrences: vec![occurrence("inflacion", 1)],
    };

    let outcome = client.apply_document(&changes).await.unwrap();

    assert_eq!(outcome.seeded, vec!["inflacion".to_string()]);
    assert_eq!(outcome.recorded[0].1, RecordOutcome::Shadowed);
    assert!(client.get_candidate("inflacion").await.unwrap().is_none());
}

#[tokio::test]
async fn test_seed_evicts_stale_candidate() {
    let (client, _temp) = setup_client().await;
    client
        .apply_document(&occurrences(vec![occurrence("guita", 0)]))
        .await
        .unwrap();

    let outcome = client
        .apply_document(&DocumentChanges {
            glossary_seeds: vec![seed("guita", Glossary::Argentine)],
            occurrences: Vec::new(),
        })
        .await
        .unwrap();

    assert_eq!(outcome.seeded, vec!["guita".to_string()]);
    assert!(client.get_candidate("guita").await.unwrap().is_none());

    // Seeding again is a no-op
    let again = client
        .apply_document(&DocumentChanges {
            glossary_seeds: vec![seed("guita", Glossary::Argentine)],
            occurrences: Vec::new(),
        })
        .await
        .unwrap();
    assert!(again.seeded.is_empty());
}

#[tokio::test]
async fn test_failed_document_rolls_back_every_write() {
    let (client, _temp) = setup_client().await;
    let mut empty = occurrence("x", 1);
    empty.term = String::new();

    let result = client
        .apply_document(&occurrences(vec![occurrence("macana", 0), empty]))
        .await;

    assert!(matches!(result, Err(StoreError::Query(_))), "got {:?}", result);
    assert!(client.get_candidate("macana").await.unwrap().is_none());
}

#[tokio::test]
async fn test_list_candidates_filters() {
    let (client, _temp) = setup_client().await;
    client
        .apply_document(&occurrences(vec![
            occurrence("mango", 20),
            occurrence("macana", 10),
            occurrence("bondi", 10),
            occurrence("posta", 30),
        ]))
        .await
        .unwrap();

    let all: Vec<String> = client
        .list_candidates(&CandidateFilter::default())
        .await
        .unwrap()
        .into_iter()
        .map(|entry| entry.term)
        .collect();
    assert_eq!(all, vec!["bondi", "macana", "mango", "posta"]);

    let prefixed: Vec<String> = client
        .list_candidates(&CandidateFilter::with_prefix("ma"))
        .await
        .unwrap()
        .into_iter()
        .map(|entry| entry.term)
        .collect();
    assert_eq!(prefixed, vec!["macana", "mango"]);

    let recent = client
        .list_candidates(&CandidateFilter {
            seen_since: Some(at(15)),
            limit: Some(1),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].term, "mango");
}

#[tokio::test]
async fn test_remove_candidate_is_idempotent() {
    let (client, _temp) = setup_client().await;
    client
        .apply_document(&occurrences(vec![occurrence("changas", 0)]))
        .await
        .unwrap();

    assert!(client.remove_candidate("changas").await.unwrap());
    assert!(!client.remove_candidate("changas").await.unwrap());
    assert!(client.get_candidate("changas").await.unwrap().is_none());
}

#[tokio::test]
async fn test_promote_moves_candidate_into_glossary() {
    let (client, _temp) = setup_client().await;
    client
        .apply_document(&occurrences(vec![occurrence("cepo", 7)]))
        .await
        .unwrap();

    let outcome = client
        .promote_candidate("cepo", Glossary::Economic, Some("manual".to_string()))
        .await
        .unwrap();

    let expected = GlossaryEntry {
        term: "cepo".to_string(),
        glossary: Glossary::Economic,
        category: Some("manual".to_string()),
        first_seen: at(7),
    };
    assert_eq!(outcome, PromotionOutcome::Promoted(expected.clone()));
    assert!(client.get_candidate("cepo").await.unwrap().is_none());
    assert_eq!(client.get_glossary_entry("cepo").await.unwrap(), Some(expected));
}

#[tokio::test]
async fn test_promote_unknown_term_is_not_a_candidate() {
    let (client, _temp) = setup_client().await;
    let outcome = client
        .promote_candidate("nada", Glossary::Argentine, None)
        .await
        .unwrap();
    assert_eq!(outcome, PromotionOutcome::NotACandidate);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_documents_produce_one_row() {
    let (client, _temp) = setup_client().await;
    let client = Arc::new(client);

    let mut tasks = tokio::task::JoinSet::new();
    for secs in 0..8 {
        let client = client.clone();
        tasks.spawn(async move {
            client
                .apply_document(&occurrences(vec![occurrence("quilombo", secs)]))
                .await
        });
    }

    let mut inserted = 0;
    while let Some(result) = tasks.join_next().await {
        let outcome = result.unwrap().expect("document should apply");
        if outcome.recorded[0].1 == RecordOutcome::Inserted {
            inserted += 1;
        }
    }

    assert_eq!(inserted, 1);
    let entries = client
        .list_candidates(&CandidateFilter::default())
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].occurrences, 8);
    assert_eq!(entries[0].last_seen, at(7));
}
