//! Ingestion: audio files in, index records saved.

use super::records::build_records;
use crate::embedding::Embedder;
use crate::error::{Error, Result};
use crate::topics::TopicExtractor;
use crate::transcription::{segment_texts, Transcriber};
use crate::vector_store::VectorStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Supported audio file extensions.
const AUDIO_EXTENSIONS: &[&str] = &[
    "mp3", "wav", "flac", "aac", "ogg", "opus", "m4a", "wma", "aiff", "alac",
];

/// Supported video file extensions (the service extracts the audio track).
const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "mkv", "avi", "mov", "webm", "flv", "wmv", "m4v", "mpeg", "mpg", "3gp",
];

/// Check if path has a supported media extension.
fn is_media_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_lowercase();
            AUDIO_EXTENSIONS.contains(&ext.as_str()) || VIDEO_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Verify a batch before any work starts. Reports the first offending path.
pub fn verify_audio_files(paths: &[PathBuf]) -> Result<()> {
    if paths.is_empty() {
        return Err(Error::InvalidInput("No files given to ingest".to_string()));
    }

    for path in paths {
        let shown = path.display();
        if !path.is_file() {
            return Err(Error::InvalidInput(format!(
                "File: {} is not valid or does not exist",
                shown
            )));
        }
        if !is_media_file(path) {
            return Err(Error::InvalidInput(format!(
                "File: {} is not a recognized audio or video file",
                shown
            )));
        }
        if let Err(e) = std::fs::File::open(path) {
            return Err(Error::InvalidInput(format!(
                "File: {} is not readable: {}",
                shown, e
            )));
        }
    }
    Ok(())
}

/// Outcome of a successful ingestion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReport {
    /// Number of files transcribed.
    pub files: usize,
    /// Number of sentences across all files.
    pub segments: usize,
    /// Number of records the store accepted.
    pub records_saved: usize,
}

/// Transcribe, label, encode and store a batch of audio files.
pub struct IngestPipeline {
    transcriber: Arc<dyn Transcriber>,
    topics: Arc<dyn TopicExtractor>,
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
    topic_top_k: usize,
}

impl IngestPipeline {
    pub fn new(
        transcriber: Arc<dyn Transcriber>,
        topics: Arc<dyn TopicExtractor>,
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn VectorStore>,
    ) -> Self {
        Self {
            transcriber,
            topics,
            embedder,
            store,
            topic_top_k: 5,
        }
    }

    /// Set how many keywords each record carries.
    pub fn with_topic_top_k(mut self, top_k: usize) -> Self {
        self.topic_top_k = top_k;
        self
    }

    /// Run the full ingestion for `files`.
    ///
    /// Nothing reaches the store unless every earlier stage succeeded, and the whole record
    /// batch is handed over in a single call.
    #[instrument(skip(self, files), fields(files = files.len()))]
    pub async fn run(&self, files: &[PathBuf]) -> Result<IngestReport> {
        info!(stage = "verify", "stage started");
        verify_audio_files(files).inspect_err(|e| fail("verify", e))?;

        info!(stage = "transcribe", files = files.len(), "stage started");
        let segments = self
            .transcriber
            .transcribe_many(files)
            .await
            .inspect_err(|e| fail("transcribe", e))?;
        info!(stage = "transcribe", segments = segments.len(), "stage completed");

        if segments.is_empty() {
            info!("No sentences transcribed, nothing to index");
            return Ok(IngestReport {
                files: files.len(),
                segments: 0,
                records_saved: 0,
            });
        }

        let texts = segment_texts(&segments);

        info!(stage = "topics", texts = texts.len(), "stage started");
        let topics = self
            .topics
            .get_topics(&texts, self.topic_top_k)
            .await
            .inspect_err(|e| fail("topics", e))?;
        info!(stage = "topics", topic_sets = topics.len(), "stage completed");

        info!(stage = "encode", texts = texts.len(), "stage started");
        let embeddings = self
            .embedder
            .encode(&texts)
            .await
            .and_then(|vectors| self.check_dimensions(vectors))
            .inspect_err(|e| fail("encode", e))?;
        info!(stage = "encode", embeddings = embeddings.len(), "stage completed");

        info!(stage = "build", "stage started");
        let records =
            build_records(&segments, topics, embeddings).inspect_err(|e| fail("build", e))?;
        info!(stage = "build", records = records.len(), "stage completed");

        info!(stage = "save", records = records.len(), "stage started");
        let records_saved = self
            .store
            .save(&records)
            .await
            .inspect_err(|e| fail("save", e))
            .map_err(|e| match e {
                Error::Store(_) => e,
                other => Error::Store(other.to_string()),
            })?;
        info!(stage = "save", records_saved, "stage completed");

        Ok(IngestReport {
            files: files.len(),
            segments: segments.len(),
            records_saved,
        })
    }

    fn check_dimensions(&self, vectors: Vec<Vec<f32>>) -> Result<Vec<Vec<f32>>> {
        let expected = self.embedder.dimensions();
        match vectors.iter().position(|v| v.len() != expected) {
            Some(i) => Err(Error::Embedding(format!(
                "Embedding {} has dimension {}, expected {}",
                i,
                vectors[i].len(),
                expected
            ))),
            None => Ok(vectors),
        }
    }
}

fn fail(stage: &'static str, err: &Error) {
    error!(stage, error = %err, "stage failed");
}
