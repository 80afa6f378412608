// Transcription seam - turns audio into text for detection

mod ingestor;
mod normalize;

pub use ingestor::{
    IngestError, IngestResult, TranscriptIngestor, Transcriber, TranscriptionError,
    DEFAULT_TRANSCRIPTION_TIMEOUT_SECS,
};
pub use normalize::normalize_transcript;
