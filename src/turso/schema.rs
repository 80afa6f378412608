// Database schema definitions and migration system
//
// Glossary entries for both glossaries share one table keyed by term, so the
// primary key keeps the two glossaries disjoint. Candidates live in their own
// table; moving a term between them always happens inside one transaction.

use libsql::Connection;

use super::client::{TursoClient, TursoError};

/// Current schema version
pub(crate) const SCHEMA_VERSION: i32 = 2;

/// SQL statements to create all tables (each as a separate string)
const CREATE_TABLES: &[&str] = &[
    // Promoted and seeded glossary terms
    r#"CREATE TABLE IF NOT EXISTS glossary_entry (
        term TEXT PRIMARY KEY CHECK (length(term) > 0),
        glossary TEXT NOT NULL CHECK (glossary IN ('economic', 'argentine')),
        category TEXT,
        first_seen TEXT NOT NULL
    )"#,
    r#"CREATE INDEX IF NOT EXISTS idx_glossary_entry_listing ON glossary_entry(glossary, first_seen)"#,
    // Unknown terms awaiting review
    r#"CREATE TABLE IF NOT EXISTS candidate_term (
        term TEXT PRIMARY KEY CHECK (length(term) > 0),
        first_seen TEXT NOT NULL,
        last_seen TEXT NOT NULL,
        context_snippet TEXT NOT NULL,
        occurrences INTEGER NOT NULL DEFAULT 1
    )"#,
    r#"CREATE INDEX IF NOT EXISTS idx_candidate_term_first_seen ON candidate_term(first_seen)"#,
];

/// Initialize the database schema.
///
/// Creates all tables if they don't exist and runs any pending migrations.
/// Call once after the TursoClient is created.
pub async fn initialize_schema(client: &TursoClient) -> Result<(), TursoError> {
    let conn = client.connect().await?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (version INTEGER PRIMARY KEY)",
        (),
    )
    .await?;

    let current_version = get_schema_version(&conn).await?;

    if current_version == 0 {
        crate::info!("Initializing glossary database schema (version {})", SCHEMA_VERSION);
        for statement in CREATE_TABLES {
            conn.execute(statement, ()).await?;
        }
        set_schema_version(&conn, SCHEMA_VERSION).await?;
        crate::info!("Glossary database schema initialized successfully");
    } else if current_version < SCHEMA_VERSION {
        crate::info!(
            "Migrating glossary database from version {} to {}",
            current_version,
            SCHEMA_VERSION
        );
        run_migrations(&conn, current_version, SCHEMA_VERSION).await?;
        // Tables introduced after the old version are created fresh
        for statement in CREATE_TABLES {
            conn.execute(statement, ()).await?;
        }
        crate::info!("Glossary database migration complete");
    } else {
        crate::debug!("Glossary database schema is up to date (version {})", current_version);
    }

    Ok(())
}

/// Get the current schema version. Returns 0 for a database with no recorded version.
pub(crate) async fn get_schema_version(conn: &Connection) -> Result<i32, TursoError> {
    let mut rows = conn
        .query(
            "SELECT version FROM schema_version ORDER BY version DESC LIMIT 1",
            (),
        )
        .await?;

    match rows.next().await? {
        Some(row) => {
            let version: i64 = row.get(0).map_err(|e| TursoError::Decode(e.to_string()))?;
            Ok(version as i32)
        }
        None => Ok(0),
    }
}

async fn set_schema_version(conn: &Connection, version: i32) -> Result<(), TursoError> {
    conn.execute(
        "INSERT OR REPLACE INTO schema_version (version) VALUES (?1)",
        libsql::params![version as i64],
    )
    .await?;
    Ok(())
}

/// Run migrations from one version to another.
async fn run_migrations(
    conn: &Connection,
    from_version: i32,
    to_version: i32,
) -> Result<(), TursoError> {
    for version in (from_version + 1)..=to_version {
        match version {
            2 => migrate_v1_to_v2(conn).await?,
            _ => crate::debug!("No migration needed for version {}", version),
        }
        set_schema_version(conn, version).await?;
    }
    Ok(())
}

/// Migrate from schema version 1 to 2.
/// Version 1 candidates only kept first_seen and a snippet; add recency and counts.
async fn migrate_v1_to_v2(conn: &Connection) -> Result<(), TursoError> {
    crate::info!("Running migration v1 -> v2: adding last_seen and occurrences to candidate_term");
    conn.execute(
        "ALTER TABLE candidate_term ADD COLUMN last_seen TEXT NOT NULL DEFAULT ''",
        (),
    )
    .await?;
    conn.execute(
        "ALTER TABLE candidate_term ADD COLUMN occurrences INTEGER NOT NULL DEFAULT 1",
        (),
    )
    .await?;
    conn.execute("UPDATE candidate_term SET last_seen = first_seen", ())
        .await?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_candidate_term_first_seen ON candidate_term(first_seen)",
        (),
    )
    .await?;
    Ok(())
}

#[cfg(test)]
#[path = "schema_test.rs"]
mod tests;
