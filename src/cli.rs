// Command-line surface over the curation engine
// Every command prints one JSON document on stdout.

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

use crate::curation::CurationController;
use crate::detection::{DetectionEngine, DetectionReport};
use crate::glossary::{CandidateFilter, CandidateLedger, CurationError, Glossary, TermRegistry};
use crate::storage::StoreError;
use crate::transcription::normalize_transcript;
use crate::turso;
use crate::util::{CurationSettings, SettingsError};

/// Source label used when the document comes from stdin
const STDIN_SOURCE: &str = "-";

#[derive(Parser, Debug, Clone)]
#[command(
    name = "glosario",
    version,
    about = "Glosario - economic and Argentine glossary curation"
)]
pub struct CliArgs {
    /// Settings file (defaults to the platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Database file; wins over settings and GLOSARIO_DB_PATH
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Detect known terms and record candidates; reads stdin without files
    Detect { files: Vec<PathBuf> },
    /// List pending candidates
    Candidates {
        /// Only terms starting with this prefix
        #[arg(long)]
        prefix: Option<String>,
        /// Only terms seen at or after this RFC 3339 instant
        #[arg(long)]
        since: Option<DateTime<Utc>>,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// List one glossary (economic or argentine)
    Glossary { glossary: Glossary },
    /// Move a candidate into a glossary
    Promote {
        term: String,
        glossary: Glossary,
        /// Economic category; defaults to "manual"
        #[arg(long)]
        category: Option<String>,
    },
    /// Drop a candidate
    Discard { term: String },
    /// Remove candidates that are already known
    Reconcile,
    /// Glossary and ledger counts
    Stats,
}

/// Error types for CLI execution
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Curation(#[from] CurationError),
    #[error("Failed to read {source_name}: {message}")]
    Input { source_name: String, message: String },
    #[error("Failed to encode output: {0}")]
    Output(#[from] serde_json::Error),
}

/// Detection result for one input document
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentReport {
    pub source: String,
    pub report: DetectionReport,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DiscardOutput<'a> {
    term: &'a str,
    removed: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReconcileOutput {
    removed: Vec<String>,
}

/// Engine and controller sharing one registry and store
struct Session {
    engine: DetectionEngine,
    controller: CurationController,
}

impl Session {
    async fn open(args: &CliArgs) -> Result<Self, CliError> {
        let settings = CurationSettings::load(args.config.as_deref())?;
        let db_path = args
            .db
            .clone()
            .unwrap_or_else(|| settings.resolved_database_path());
        crate::debug!("Using database {:?}", db_path);

        let store =
            turso::open_store(db_path, settings.retry_policy(), settings.storage_timeout()).await?;
        let registry = Arc::new(TermRegistry::new(settings.seed_terms()));
        registry.reload(&store).await?;

        let engine = DetectionEngine::new(
            registry.clone(),
            CandidateLedger::new(store.clone()),
            settings.screening_rules(),
        )
        .with_context_width(settings.context_width);
        let controller = CurationController::new(registry, CandidateLedger::new(store));

        Ok(Self { engine, controller })
    }
}

async fn read_document(path: Option<&PathBuf>) -> Result<(String, String), CliError> {
    match path {
        Some(path) => {
            let source_name = path.display().to_string();
            let text = tokio::fs::read_to_string(path)
                .await
                .map_err(|e| CliError::Input {
                    source_name: source_name.clone(),
                    message: e.to_string(),
                })?;
            Ok((source_name, text))
        }
        None => {
            let read = tokio::task::spawn_blocking(|| {
                let mut text = String::new();
                std::io::Read::read_to_string(&mut std::io::stdin(), &mut text).map(|_| text)
            })
            .await
            .map_err(|e| e.to_string())
            .and_then(|result| result.map_err(|e| e.to_string()));
            let text = read.map_err(|message| CliError::Input {
                source_name: STDIN_SOURCE.to_string(),
                message,
            })?;
            Ok((STDIN_SOURCE.to_string(), text))
        }
    }
}

/// Run one command and return its JSON output
pub async fn execute(args: CliArgs) -> Result<serde_json::Value, CliError> {
    let session = Session::open(&args).await?;

    let output = match &args.command {
        Command::Detect { files } => {
            let sources: Vec<Option<&PathBuf>> = if files.is_empty() {
                vec![None]
            } else {
                files.iter().map(Some).collect()
            };

            let mut reports = Vec::with_capacity(sources.len());
            for path in sources {
                let (source, text) = read_document(path).await?;
                let report = session.engine.detect(&normalize_transcript(&text)).await?;
                reports.push(DocumentReport { source, report });
            }
            serde_json::to_value(reports)?
        }
        Command::Candidates {
            prefix,
            since,
            limit,
        } => {
            let filter = CandidateFilter {
                prefix: prefix.clone(),
                seen_since: *since,
                limit: *limit,
            };
            serde_json::to_value(session.controller.list_candidates(&filter).await?)?
        }
        Command::Glossary { glossary } => {
            serde_json::to_value(session.controller.list_glossary(*glossary).await?)?
        }
        Command::Promote {
            term,
            glossary,
            category,
        } => {
            let promotion = session
                .controller
                .promote(term, *glossary, category.as_deref())
                .await?;
            serde_json::to_value(promotion)?
        }
        Command::Discard { term } => {
            let removed = session.controller.discard(term).await?;
            serde_json::to_value(DiscardOutput { term, removed })?
        }
        Command::Reconcile => {
            let removed = session.controller.reconcile().await?;
            serde_json::to_value(ReconcileOutput { removed })?
        }
        Command::Stats => serde_json::to_value(session.controller.statistics().await?)?,
    };

    Ok(output)
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
