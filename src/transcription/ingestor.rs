// TranscriptIngestor - audio in, detection report out
// Handles: transcription (bounded and timed) -> transcript cleanup -> detection

use async_trait::async_trait;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

use super::normalize::normalize_transcript;
use crate::detection::{DetectionEngine, DetectionReport};
use crate::glossary::CurationError;

/// Maximum concurrent transcriptions allowed
const MAX_CONCURRENT_TRANSCRIPTIONS: usize = 2;

/// Default transcription timeout in seconds
pub const DEFAULT_TRANSCRIPTION_TIMEOUT_SECS: u64 = 60;

/// Error types for transcription
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TranscriptionError {
    /// The transcriber could not produce text
    #[error("Transcription failed: {0}")]
    Failed(String),
    /// The transcriber did not answer in time
    #[error("Transcription timed out after {0:?}")]
    Timeout(Duration),
    /// The ingestor was closed
    #[error("Transcription unavailable: {0}")]
    Unavailable(String),
}

/// Speech-to-text collaborator; audio decoding is its concern
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio: &Path) -> Result<String, TranscriptionError>;
}

/// Error from either half of an ingest
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IngestError {
    #[error(transparent)]
    Transcription(#[from] TranscriptionError),
    #[error(transparent)]
    Curation(#[from] CurationError),
}

/// A transcript and what detection found in it
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IngestResult {
    pub transcript: String,
    pub report: DetectionReport,
}

/// Feeds transcriber output into the detection engine
pub struct TranscriptIngestor {
    transcriber: Arc<dyn Transcriber>,
    engine: Arc<DetectionEngine>,
    /// Semaphore to limit concurrent transcriptions
    semaphore: Arc<Semaphore>,
    timeout: Duration,
}

impl TranscriptIngestor {
    pub fn new(transcriber: Arc<dyn Transcriber>, engine: Arc<DetectionEngine>) -> Self {
        Self {
            transcriber,
            engine,
            semaphore: Arc::new(Semaphore::new(MAX_CONCURRENT_TRANSCRIPTIONS)),
            timeout: Duration::from_secs(DEFAULT_TRANSCRIPTION_TIMEOUT_SECS),
        }
    }

    /// Set custom transcription timeout (builder pattern)
    pub fn with_transcription_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Transcribe an audio file and run detection on the cleaned transcript
    pub async fn ingest(&self, audio: &Path) -> Result<IngestResult, IngestError> {
        let raw = {
            let _permit = self
                .semaphore
                .acquire()
                .await
                .map_err(|e| TranscriptionError::Unavailable(e.to_string()))?;

            crate::debug!("Transcribing {:?}", audio);
            match tokio::time::timeout(self.timeout, self.transcriber.transcribe(audio)).await {
                Ok(result) => result?,
                Err(_) => {
                    crate::error!("Transcription of {:?} timed out after {:?}", audio, self.timeout);
                    return Err(TranscriptionError::Timeout(self.timeout).into());
                }
            }
        };

        self.ingest_text(&raw).await
    }

    /// Run detection on text that was already transcribed
    pub async fn ingest_text(&self, raw: &str) -> Result<IngestResult, IngestError> {
        let transcript = normalize_transcript(raw);
        let report = self.engine.detect(&transcript).await?;
        Ok(IngestResult { transcript, report })
    }
}

#[cfg(test)]
#[path = "ingestor_test.rs"]
mod tests;
