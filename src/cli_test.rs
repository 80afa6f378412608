use super::*;
use serial_test::serial;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

struct Workspace {
    dir: TempDir,
    config: NamedTempFile,
}

impl Workspace {
    fn new() -> Self {
        let mut config = NamedTempFile::new().unwrap();
        config.write_all(b"{}").unwrap();
        Self {
            dir: TempDir::new().unwrap(),
            config,
        }
    }

    fn args(&self, command: &[&str]) -> CliArgs {
        let db = self.dir.path().join("glosario.db");
        let mut argv = vec![
            "glosario".to_string(),
            "--config".to_string(),
            self.config.path().display().to_string(),
            "--db".to_string(),
            db.display().to_string(),
        ];
        argv.extend(command.iter().map(|s| s.to_string()));
        CliArgs::try_parse_from(argv).unwrap()
    }

    fn document(&self, name: &str, text: &str) -> String {
        let path = self.dir.path().join(name);
        std::fs::write(&path, text).unwrap();
        path.display().to_string()
    }
}

#[test]
fn test_parse_promote_with_category() {
    let args = CliArgs::try_parse_from([
        "glosario", "promote", "Cepo", "economic", "--category", "regulación",
    ])
    .unwrap();

    assert_eq!(
        args.command,
        Command::Promote {
            term: "Cepo".to_string(),
            glossary: Glossary::Economic,
            category: Some("regulación".to_string()),
        }
    );
    assert!(args.config.is_none());
}

#[test]
fn test_parse_rejects_unknown_glossary() {
    assert!(CliArgs::try_parse_from(["glosario", "glossary", "lunfardo"]).is_err());
}

#[test]
fn test_parse_candidates_filters_and_global_flags() {
    let args = CliArgs::try_parse_from([
        "glosario",
        "candidates",
        "--prefix",
        "bo",
        "--since",
        "2024-03-01T00:00:00Z",
        "--limit",
        "5",
        "--db",
        "/tmp/x.db",
    ])
    .unwrap();

    assert_eq!(args.db, Some(PathBuf::from("/tmp/x.db")));
    match args.command {
        Command::Candidates { prefix, since, limit } => {
            assert_eq!(prefix.as_deref(), Some("bo"));
            assert_eq!(since.map(|s| s.to_rfc3339()), Some("2024-03-01T00:00:00+00:00".to_string()));
            assert_eq!(limit, Some(5));
        }
        other => panic!("unexpected command {:?}", other),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
#[serial]
async fn test_detect_then_curate_through_the_cli() {
    let ws = Workspace::new();
    let doc = ws.document(
        "discurso.txt",
        "La inflación y el desempleo crecieron, pero apareció 'boludez' como palabra rara",
    );

    let output = execute(ws.args(&["detect", &doc])).await.unwrap();
    let report = &output[0]["report"];
    assert_eq!(output[0]["source"], doc);
    assert_eq!(report["recognized"]["inflacion"]["glossary"], "economic");
    assert!(report["newCandidates"]
        .as_array()
        .unwrap()
        .iter()
        .any(|t| t == "boludez"));

    let candidates = execute(ws.args(&["candidates", "--prefix", "bol"])).await.unwrap();
    assert_eq!(candidates.as_array().unwrap().len(), 1);
    assert_eq!(candidates[0]["term"], "boludez");

    let promotion = execute(ws.args(&["promote", "boludez", "argentine"])).await.unwrap();
    assert_eq!(promotion["outcome"], "promoted");
    assert_eq!(promotion["entry"]["term"], "boludez");

    let argentine = execute(ws.args(&["glossary", "argentine"])).await.unwrap();
    assert!(argentine.as_array().unwrap().iter().any(|e| e["term"] == "boludez"));

    let discard = execute(ws.args(&["discard", "boludez"])).await.unwrap();
    assert_eq!(discard["removed"], false);

    let stats = execute(ws.args(&["stats"])).await.unwrap();
    assert_eq!(stats["argentineTerms"], 1);
    assert_eq!(stats["economicTerms"], 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
#[serial]
async fn test_missing_document_is_an_input_error() {
    let ws = Workspace::new();
    let missing = ws.dir.path().join("nope.txt").display().to_string();

    let result = execute(ws.args(&["detect", &missing])).await;
    assert!(matches!(result, Err(CliError::Input { .. })));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
#[serial]
async fn test_promote_unknown_term_fails() {
    let ws = Workspace::new();

    let result = execute(ws.args(&["promote", "inexistente", "economic"])).await;
    assert!(matches!(
        result,
        Err(CliError::Curation(CurationError::NotACandidate(_)))
    ));

    let reconcile = execute(ws.args(&["reconcile"])).await.unwrap();
    assert_eq!(reconcile["removed"], serde_json::json!([]));
}
