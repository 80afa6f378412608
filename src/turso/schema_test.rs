use super::*;
use tempfile::TempDir;

async fn setup_client() -> (TursoClient, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let client = TursoClient::new(temp_dir.path().to_path_buf())
        .await
        .expect("Failed to create client");
    (client, temp_dir)
}

async fn table_exists(conn: &Connection, name: &str) -> bool {
    let mut rows = conn
        .query(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
            libsql::params![name],
        )
        .await
        .unwrap();
    rows.next().await.unwrap().is_some()
}

#[tokio::test]
async fn test_fresh_database_gets_current_schema() {
    let (client, _temp) = setup_client().await;
    initialize_schema(&client).await.unwrap();

    let conn = client.connect().await.unwrap();
    assert!(table_exists(&conn, "glossary_entry").await);
    assert!(table_exists(&conn, "candidate_term").await);
    assert_eq!(get_schema_version(&conn).await.unwrap(), SCHEMA_VERSION);
}

#[tokio::test]
async fn test_initialize_is_idempotent() {
    let (client, _temp) = setup_client().await;
    initialize_schema(&client).await.unwrap();
    initialize_schema(&client).await.unwrap();

    let conn = client.connect().await.unwrap();
    assert_eq!(get_schema_version(&conn).await.unwrap(), SCHEMA_VERSION);
}

#[tokio::test]
async fn test_glossary_column_rejects_unknown_names() {
    let (client, _temp) = setup_client().await;
    initialize_schema(&client).await.unwrap();
    let conn = client.connect().await.unwrap();

    let result = conn
        .execute(
            "INSERT INTO glossary_entry (term, glossary, first_seen) VALUES ('x', 'lunfardo', 't')",
            (),
        )
        .await;
    assert!(result.is_err());

    let result = conn
        .execute(
            "INSERT INTO candidate_term (term, first_seen, last_seen, context_snippet) VALUES ('', 't', 't', '')",
            (),
        )
        .await;
    assert!(result.is_err(), "empty terms must be rejected");
}

#[tokio::test]
async fn test_migrates_version_one_candidates() {
    let (client, _temp) = setup_client().await;
    {
        let conn = client.connect().await.unwrap();
        conn.execute(
            "CREATE TABLE schema_version (version INTEGER PRIMARY KEY)",
            (),
        )
        .await
        .unwrap();
        conn.execute("INSERT INTO schema_version (version) VALUES (1)", ())
            .await
            .unwrap();
        conn.execute(
            "CREATE TABLE candidate_term (term TEXT PRIMARY KEY, first_seen TEXT NOT NULL, context_snippet TEXT NOT NULL)",
            (),
        )
        .await
        .unwrap();
        conn.execute(
            "INSERT INTO candidate_term VALUES ('boludez', '2024-03-01T10:00:00.000000Z', 'una boludez')",
            (),
        )
        .await
        .unwrap();
    }

    initialize_schema(&client).await.unwrap();

    let conn = client.connect().await.unwrap();
    assert_eq!(get_schema_version(&conn).await.unwrap(), 2);
    assert!(table_exists(&conn, "glossary_entry").await);

    let mut rows = conn
        .query(
            "SELECT last_seen, occurrences FROM candidate_term WHERE term = 'boludez'",
            (),
        )
        .await
        .unwrap();
    let row = rows.next().await.unwrap().expect("candidate kept");
    assert_eq!(row.get::<String>(0).unwrap(), "2024-03-01T10:00:00.000000Z");
    assert_eq!(row.get::<i64>(1).unwrap(), 1);
}
