// Glossary reads and partition statistics using Turso/libsql

use libsql::{params, Row};

use super::client::{TursoClient, TursoError};
use crate::glossary::{parse_timestamp, Glossary, GlossaryEntry};
use crate::storage::{StoreError, StoreStatistics};

/// Decode a row selected as (term, glossary, category, first_seen)
pub(crate) fn glossary_entry_from_row(row: &Row) -> Result<GlossaryEntry, TursoError> {
    let decode = |e: libsql::Error| TursoError::Decode(e.to_string());
    let glossary: String = row.get(1).map_err(decode)?;
    let first_seen: String = row.get(3).map_err(decode)?;

    Ok(GlossaryEntry {
        term: row.get(0).map_err(decode)?,
        glossary: glossary.parse::<Glossary>().map_err(TursoError::Decode)?,
        category: row.get::<Option<String>>(2).map_err(decode)?,
        first_seen: parse_timestamp(&first_seen).map_err(TursoError::Decode)?,
    })
}

fn count_from_row(row: &Row, idx: i32) -> Result<u64, TursoError> {
    let value: i64 = row
        .get(idx)
        .map_err(|e| TursoError::Decode(e.to_string()))?;
    u64::try_from(value).map_err(|_| TursoError::Decode(format!("Negative count {}", value)))
}

impl TursoClient {
    /// Get a glossary entry by canonical term, whichever glossary holds it
    pub async fn get_glossary_entry(&self, term: &str) -> Result<Option<GlossaryEntry>, StoreError> {
        self.with_retry("get_glossary_entry", || async move {
            let conn = self.connect().await?;
            let mut rows = conn
                .query(
                    "SELECT term, glossary, category, first_seen FROM glossary_entry WHERE term = ?1",
                    params![term],
                )
                .await?;
            match rows.next().await? {
                Some(row) => Ok(Some(glossary_entry_from_row(&row)?)),
                None => Ok(None),
            }
        })
        .await
    }

    /// List one glossary ordered by first_seen, then term
    pub async fn list_glossary(&self, glossary: Glossary) -> Result<Vec<GlossaryEntry>, StoreError> {
        self.with_retry("list_glossary", || async move {
            let conn = self.connect().await?;
            let mut rows = conn
                .query(
                    r#"SELECT term, glossary, category, first_seen FROM glossary_entry
                       WHERE glossary = ?1
                       ORDER BY first_seen, term"#,
                    params![glossary.as_str()],
                )
                .await?;

            let mut entries = Vec::new();
            while let Some(row) = rows.next().await? {
                entries.push(glossary_entry_from_row(&row)?);
            }
            Ok(entries)
        })
        .await
    }

    /// Count rows in every partition with a single consistent read
    pub async fn statistics(&self) -> Result<StoreStatistics, StoreError> {
        self.with_retry("statistics", || async move {
            let conn = self.connect().await?;
            let mut rows = conn
                .query(
                    r#"SELECT
                         (SELECT COUNT(*) FROM glossary_entry WHERE glossary = 'economic'),
                         (SELECT COUNT(*) FROM glossary_entry WHERE glossary = 'argentine'),
                         (SELECT COUNT(*) FROM candidate_term),
                         (SELECT COALESCE(SUM(occurrences), 0) FROM candidate_term)"#,
                    (),
                )
                .await?;
            let row = rows
                .next()
                .await?
                .ok_or_else(|| TursoError::Query("Statistics query returned no row".to_string()))?;

            Ok(StoreStatistics {
                economic_terms: count_from_row(&row, 0)?,
                argentine_terms: count_from_row(&row, 1)?,
                candidates: count_from_row(&row, 2)?,
                candidate_occurrences: count_from_row(&row, 3)?,
            })
        })
        .await
    }
}

#[cfg(test)]
#[path = "glossary_test.rs"]
mod tests;
