use super::*;
use crate::detection::ScreeningRules;
use crate::glossary::{CandidateLedger, SeedTerms, TermRegistry};
use crate::storage::{MemoryTermStore, TermStore, DEFAULT_STORAGE_TIMEOUT};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

struct MockTranscriber {
    result: Result<String, TranscriptionError>,
    delay: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockTranscriber {
    fn returning(text: &str) -> Self {
        Self {
            result: Ok(text.to_string()),
            delay: Duration::ZERO,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    fn failing(message: &str) -> Self {
        Self {
            result: Err(TranscriptionError::Failed(message.to_string())),
            ..Self::returning("")
        }
    }

    fn slow(text: &str, delay: Duration) -> Self {
        Self {
            delay,
            ..Self::returning(text)
        }
    }
}

#[async_trait]
impl Transcriber for MockTranscriber {
    async fn transcribe(&self, _audio: &Path) -> Result<String, TranscriptionError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.result.clone()
    }
}

fn engine() -> (Arc<DetectionEngine>, TermStore) {
    let store = TermStore::new(Arc::new(MemoryTermStore::new()), DEFAULT_STORAGE_TIMEOUT);
    let engine = DetectionEngine::new(
        Arc::new(TermRegistry::new(SeedTerms::default())),
        CandidateLedger::new(store.clone()),
        ScreeningRules::spanish(),
    );
    (Arc::new(engine), store)
}

#[tokio::test]
async fn test_ingest_runs_detection_on_clean_transcript() {
    let (engine, store) = engine();
    let transcriber = Arc::new(MockTranscriber::returning("▁La▁inflación▁y▁el▁chamuyo"));
    let ingestor = TranscriptIngestor::new(transcriber, engine);

    let result = ingestor.ingest(&PathBuf::from("audio.wav")).await.unwrap();

    assert_eq!(result.transcript, "La inflación y el chamuyo");
    assert_eq!(result.report.recognized_count("inflacion"), 1);
    assert!(result.report.new_candidates.contains("chamuyo"));
    assert!(store.get_candidate("chamuyo").await.unwrap().is_some());
}

#[tokio::test]
async fn test_transcriber_failure_is_propagated() {
    let (engine, store) = engine();
    let ingestor = TranscriptIngestor::new(Arc::new(MockTranscriber::failing("bad header")), engine);

    let result = ingestor.ingest(&PathBuf::from("broken.wav")).await;

    assert_eq!(
        result,
        Err(IngestError::Transcription(TranscriptionError::Failed(
            "bad header".to_string()
        )))
    );
    assert!(store.list_candidates(&Default::default()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_slow_transcriber_times_out() {
    let (engine, _store) = engine();
    let transcriber = Arc::new(MockTranscriber::slow("tarde", Duration::from_millis(500)));
    let ingestor = TranscriptIngestor::new(transcriber, engine)
        .with_transcription_timeout(Duration::from_millis(20));

    let result = ingestor.ingest(&PathBuf::from("long.wav")).await;

    assert_eq!(
        result,
        Err(IngestError::Transcription(TranscriptionError::Timeout(
            Duration::from_millis(20)
        )))
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_transcriptions_are_bounded() {
    let (engine, _store) = engine();
    let transcriber = Arc::new(MockTranscriber::slow("mucho laburo", Duration::from_millis(30)));
    let ingestor = Arc::new(TranscriptIngestor::new(transcriber.clone(), engine));

    let mut tasks = tokio::task::JoinSet::new();
    for i in 0..6 {
        let ingestor = ingestor.clone();
        tasks.spawn(async move { ingestor.ingest(&PathBuf::from(format!("{}.wav", i))).await });
    }
    while let Some(joined) = tasks.join_next().await {
        assert!(joined.unwrap().is_ok());
    }

    assert!(transcriber.max_in_flight.load(Ordering::SeqCst) <= MAX_CONCURRENT_TRANSCRIPTIONS);
}

#[tokio::test]
async fn test_ingest_text_skips_transcriber() {
    let (engine, _store) = engine();
    let ingestor = TranscriptIngestor::new(Arc::new(MockTranscriber::failing("unused")), engine);

    let result = ingestor.ingest_text("  la   guita \n").await.unwrap();

    assert_eq!(result.transcript, "la guita");
    assert_eq!(result.report.recognized_count("guita"), 1);
}
