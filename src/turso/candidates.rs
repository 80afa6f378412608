// Candidate ledger operations using Turso/libsql
//
// Writes run inside IMMEDIATE transactions so the write lock is taken up
// front; a concurrent writer waits on busy_timeout instead of failing a
// lock upgrade halfway through.

use libsql::{params, Connection, Row, Transaction, TransactionBehavior};

use super::client::{TursoClient, TursoError};
use super::glossary::glossary_entry_from_row;
use crate::glossary::{
    format_timestamp, parse_timestamp, CandidateEntry, CandidateFilter, Glossary, GlossaryEntry,
};
use crate::storage::{
    CandidateOccurrence, DocumentChanges, DocumentOutcome, PromotionOutcome, RecordOutcome,
    StoreError,
};

const CANDIDATE_COLUMNS: &str = "term, first_seen, last_seen, context_snippet, occurrences";

/// Decode a candidate row selected with CANDIDATE_COLUMNS
pub(crate) fn candidate_from_row(row: &Row) -> Result<CandidateEntry, TursoError> {
    let decode = |e: libsql::Error| TursoError::Decode(e.to_string());
    let first_seen: String = row.get(1).map_err(decode)?;
    let last_seen: String = row.get(2).map_err(decode)?;
    let occurrences: i64 = row.get(4).map_err(decode)?;

    Ok(CandidateEntry {
        term: row.get(0).map_err(decode)?,
        first_seen: parse_timestamp(&first_seen).map_err(TursoError::Decode)?,
        last_seen: parse_timestamp(&last_seen).map_err(TursoError::Decode)?,
        context_snippet: row.get(3).map_err(decode)?,
        occurrences: u64::try_from(occurrences)
            .map_err(|_| TursoError::Decode(format!("Negative occurrence count {}", occurrences)))?,
    })
}

async fn exists(conn: &Connection, sql: &str, term: &str) -> Result<bool, TursoError> {
    let mut rows = conn.query(sql, params![term]).await?;
    Ok(rows.next().await?.is_some())
}

/// Commit on success, roll back on failure
async fn finish<T>(tx: Transaction, result: Result<T, TursoError>) -> Result<T, TursoError> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(error) => {
            if let Err(rollback_error) = tx.rollback().await {
                crate::warn!("Rollback failed after '{}': {}", error, rollback_error);
            }
            Err(error)
        }
    }
}

async fn insert_seeds(
    conn: &Connection,
    seeds: &[GlossaryEntry],
    outcome: &mut DocumentOutcome,
) -> Result<(), TursoError> {
    for seed in seeds {
        let inserted = conn
            .execute(
                r#"INSERT INTO glossary_entry (term, glossary, category, first_seen)
                   VALUES (?1, ?2, ?3, ?4)
                   ON CONFLICT(term) DO NOTHING"#,
                params![
                    seed.term.clone(),
                    seed.glossary.as_str(),
                    seed.category.clone(),
                    format_timestamp(&seed.first_seen)
                ],
            )
            .await?;

        if inserted > 0 {
            // A seed that was sitting in the ledger leaves it in the same transaction
            conn.execute(
                "DELETE FROM candidate_term WHERE term = ?1",
                params![seed.term.clone()],
            )
            .await?;
            outcome.seeded.push(seed.term.clone());
        }
    }
    Ok(())
}

async fn record_occurrence(
    conn: &Connection,
    occurrence: &CandidateOccurrence,
) -> Result<RecordOutcome, TursoError> {
    if exists(conn, "SELECT 1 FROM glossary_entry WHERE term = ?1", &occurrence.term).await? {
        return Ok(RecordOutcome::Shadowed);
    }

    let existed = exists(conn, "SELECT 1 FROM candidate_term WHERE term = ?1", &occurrence.term).await?;

    conn.execute(
        r#"INSERT INTO candidate_term (term, first_seen, last_seen, context_snippet, occurrences)
           VALUES (?1, ?2, ?2, ?3, ?4)
           ON CONFLICT(term) DO UPDATE SET
               last_seen = max(candidate_term.last_seen, excluded.last_seen),
               occurrences = candidate_term.occurrences + excluded.occurrences"#,
        params![
            occurrence.term.clone(),
            format_timestamp(&occurrence.seen_at),
            occurrence.context_snippet.clone(),
            occurrence.count as i64
        ],
    )
    .await?;

    Ok(if existed {
        RecordOutcome::Updated
    } else {
        RecordOutcome::Inserted
    })
}

async fn apply_changes(
    conn: &Connection,
    changes: &DocumentChanges,
) -> Result<DocumentOutcome, TursoError> {
    let mut outcome = DocumentOutcome::default();
    insert_seeds(conn, &changes.glossary_seeds, &mut outcome).await?;
    for occurrence in &changes.occurrences {
        let recorded = record_occurrence(conn, occurrence).await?;
        outcome.recorded.push((occurrence.term.clone(), recorded));
    }
    Ok(outcome)
}

async fn promote(
    conn: &Connection,
    term: &str,
    glossary: Glossary,
    category: Option<&str>,
) -> Result<PromotionOutcome, TursoError> {
    let mut rows = conn
        .query(
            &format!("SELECT {} FROM candidate_term WHERE term = ?1", CANDIDATE_COLUMNS),
            params![term],
        )
        .await?;
    let candidate = match rows.next().await? {
        Some(row) => candidate_from_row(&row)?,
        None => return Ok(PromotionOutcome::NotACandidate),
    };

    let entry = GlossaryEntry {
        term: candidate.term,
        glossary,
        category: category.map(str::to_string),
        first_seen: candidate.first_seen,
    };

    let inserted = conn
        .execute(
            r#"INSERT INTO glossary_entry (term, glossary, category, first_seen)
               VALUES (?1, ?2, ?3, ?4)
               ON CONFLICT(term) DO NOTHING"#,
            params![
                entry.term.clone(),
                entry.glossary.as_str(),
                entry.category.clone(),
                format_timestamp(&entry.first_seen)
            ],
        )
        .await?;

    conn.execute("DELETE FROM candidate_term WHERE term = ?1", params![term])
        .await?;

    if inserted > 0 {
        return Ok(PromotionOutcome::Promoted(entry));
    }

    // Another path put the term in a glossary first; keep that entry
    let mut rows = conn
        .query(
            "SELECT term, glossary, category, first_seen FROM glossary_entry WHERE term = ?1",
            params![term],
        )
        .await?;
    match rows.next().await? {
        Some(row) => Ok(PromotionOutcome::AlreadyKnown(glossary_entry_from_row(&row)?)),
        None => Err(TursoError::Query(format!(
            "Glossary entry for '{}' vanished during promotion",
            term
        ))),
    }
}

impl TursoClient {
    /// Apply one document's seeds and candidate upserts atomically.
    ///
    /// Either every row lands or none does; a conflict retries the whole document.
    pub async fn apply_document(
        &self,
        changes: &DocumentChanges,
    ) -> Result<DocumentOutcome, StoreError> {
        if changes.is_empty() {
            return Ok(DocumentOutcome::default());
        }
        self.with_retry("apply_document", || async move {
            let conn = self.connect().await?;
            let tx = conn
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .await?;
            let result = apply_changes(&tx, changes).await;
            finish(tx, result).await
        })
        .await
    }

    /// Get a candidate by canonical term
    pub async fn get_candidate(&self, term: &str) -> Result<Option<CandidateEntry>, StoreError> {
        self.with_retry("get_candidate", || async move {
            let conn = self.connect().await?;
            let mut rows = conn
                .query(
                    &format!("SELECT {} FROM candidate_term WHERE term = ?1", CANDIDATE_COLUMNS),
                    params![term],
                )
                .await?;
            match rows.next().await? {
                Some(row) => Ok(Some(candidate_from_row(&row)?)),
                None => Ok(None),
            }
        })
        .await
    }

    /// List candidates ordered by first_seen, then term
    pub async fn list_candidates(
        &self,
        filter: &CandidateFilter,
    ) -> Result<Vec<CandidateEntry>, StoreError> {
        let prefix = filter.prefix.clone();
        let since = filter.seen_since.as_ref().map(format_timestamp);
        let limit = filter.limit.map_or(-1, |limit| limit as i64);

        self.with_retry("list_candidates", || {
            let prefix = prefix.clone();
            let since = since.clone();
            async move {
                let conn = self.connect().await?;
                let mut rows = conn
                    .query(
                        &format!(
                            r#"SELECT {} FROM candidate_term
                               WHERE (?1 IS NULL OR substr(term, 1, length(?1)) = ?1)
                                 AND (?2 IS NULL OR last_seen >= ?2)
                               ORDER BY first_seen, term
                               LIMIT ?3"#,
                            CANDIDATE_COLUMNS
                        ),
                        params![prefix, since, limit],
                    )
                    .await?;

                let mut entries = Vec::new();
                while let Some(row) = rows.next().await? {
                    entries.push(candidate_from_row(&row)?);
                }
                Ok(entries)
            }
        })
        .await
    }

    /// Delete a candidate. Returns false if there was nothing to delete.
    pub async fn remove_candidate(&self, term: &str) -> Result<bool, StoreError> {
        self.with_retry("remove_candidate", || async move {
            let conn = self.connect().await?;
            let deleted = conn
                .execute("DELETE FROM candidate_term WHERE term = ?1", params![term])
                .await?;
            Ok(deleted > 0)
        })
        .await
    }

    /// Move a candidate into a glossary in one transaction, keeping its first_seen
    pub async fn promote_candidate(
        &self,
        term: &str,
        glossary: Glossary,
        category: Option<String>,
    ) -> Result<PromotionOutcome, StoreError> {
        let category = category.as_deref();
        self.with_retry("promote_candidate", || async move {
            let conn = self.connect().await?;
            let tx = conn
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .await?;
            let result = promote(&tx, term, glossary, category).await;
            finish(tx, result).await
        })
        .await
    }
}

#[cfg(test)]
#[path = "candidates_test.rs"]
mod tests;
