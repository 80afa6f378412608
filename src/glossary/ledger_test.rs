use super::*;
use crate::storage::{MemoryTermStore, StoreError, DEFAULT_STORAGE_TIMEOUT};
use chrono::TimeZone;
use std::sync::Arc;

fn ledger() -> CandidateLedger {
    CandidateLedger::new(TermStore::in_memory())
}

fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
}

#[tokio::test]
async fn test_record_occurrence_keeps_first_snippet() {
    let ledger = ledger();

    let first = ledger
        .record_occurrence("boludez", "apareció boludez como palabra rara", at(0))
        .await
        .unwrap();
    let second = ledger
        .record_occurrence("boludez", "otra boludez", at(10))
        .await
        .unwrap();

    assert_eq!(first, RecordOutcome::Inserted);
    assert_eq!(second, RecordOutcome::Updated);

    let entry = ledger.get("boludez").await.unwrap().unwrap();
    assert_eq!(entry.context_snippet, "apareció boludez como palabra rara");
    assert_eq!(entry.first_seen, at(0));
    assert_eq!(entry.last_seen, at(10));
    assert_eq!(entry.occurrences, 2);
}

#[tokio::test]
async fn test_record_occurrence_rejects_empty_term() {
    let result = ledger().record_occurrence("", "snippet", at(0)).await;
    assert!(matches!(result, Err(CurationError::Validation(_))));
}

#[tokio::test]
async fn test_record_occurrence_truncates_to_storage_precision() {
    let ledger = ledger();
    let precise = at(0) + chrono::Duration::nanoseconds(1_234_567);
    ledger.record_occurrence("yeta", "", precise).await.unwrap();

    let entry = ledger.get("yeta").await.unwrap().unwrap();
    assert_eq!(entry.first_seen, at(0) + chrono::Duration::microseconds(1_234));
}

#[tokio::test]
async fn test_remove_reports_whether_anything_was_deleted() {
    let ledger = ledger();
    ledger.record_occurrence("chamuyo", "", at(0)).await.unwrap();

    assert!(ledger.remove("chamuyo").await.unwrap());
    assert!(!ledger.remove("chamuyo").await.unwrap());
}

#[tokio::test]
async fn test_statistics_sum_occurrences() {
    let ledger = ledger();
    for secs in 0..3 {
        ledger.record_occurrence("trucho", "", at(secs)).await.unwrap();
    }
    ledger.record_occurrence("garca", "", at(0)).await.unwrap();

    assert_eq!(
        ledger.statistics().await.unwrap(),
        LedgerStatistics {
            candidates: 2,
            occurrences: 4,
        }
    );
    assert_eq!(ledger.list(&CandidateFilter::with_prefix("tr")).await.unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_records_converge_on_max_last_seen() {
    let ledger = Arc::new(CandidateLedger::new(TermStore::new(
        Arc::new(MemoryTermStore::new()),
        DEFAULT_STORAGE_TIMEOUT,
    )));

    let mut tasks = tokio::task::JoinSet::new();
    for secs in [5, 90, 12, 40, 3, 77, 61, 20] {
        let ledger = ledger.clone();
        tasks.spawn(async move { ledger.record_occurrence("quilombo", "", at(secs)).await });
    }
    while let Some(result) = tasks.join_next().await {
        result.unwrap().unwrap();
    }

    let entries = ledger.list(&CandidateFilter::default()).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].last_seen, at(90));
    assert_eq!(entries[0].occurrences, 8);
}

#[test]
fn test_conflict_exhaustion_maps_to_retryable_error() {
    let error: CurationError = StoreError::ConflictRetryExhausted {
        operation: "apply_document".to_string(),
        attempts: 5,
    }
    .into();
    assert!(error.is_retryable());
    assert!(matches!(error, CurationError::ConflictRetryExhausted { attempts: 5, .. }));
}
