//! AssemblyAI transcription implementation.
//!
//! Each file is uploaded, submitted for transcription, polled until it settles, and then
//! split into sentences by the service.

use super::{transcribe_in_order, Transcriber, TranscriptSegment};
use crate::config::TranscriptionSettings;
use crate::error::{Error, Result};
use crate::http::http_client;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, instrument};
use url::Url;

#[derive(Debug, Deserialize)]
struct UploadResponse {
    upload_url: String,
}

#[derive(Debug, Serialize)]
struct TranscriptRequest<'a> {
    audio_url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    language_code: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum TranscriptStatus {
    Queued,
    Processing,
    Completed,
    Error,
}

#[derive(Debug, Deserialize)]
struct TranscriptResponse {
    id: String,
    status: TranscriptStatus,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Sentence {
    text: String,
}

#[derive(Debug, Deserialize)]
struct SentencesResponse {
    sentences: Vec<Sentence>,
}

/// AssemblyAI-based transcriber.
pub struct AssemblyAiTranscriber {
    client: reqwest::Client,
    api_key: String,
    base_url: Url,
    language_code: Option<String>,
    poll_interval: Duration,
    max_wait: Duration,
    max_concurrent_files: usize,
}

impl AssemblyAiTranscriber {
    /// Create a new transcriber from settings and an explicit API key.
    pub fn new(api_key: &str, settings: &TranscriptionSettings, timeout: Duration) -> Result<Self> {
        let mut base = settings.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base).map_err(|e| {
            Error::Config(format!("Invalid AssemblyAI base URL '{}': {}", settings.base_url, e))
        })?;

        Ok(Self {
            client: http_client(timeout)?,
            api_key: api_key.to_string(),
            base_url,
            language_code: settings.language_code.clone(),
            poll_interval: Duration::from_millis(settings.poll_interval_ms),
            max_wait: Duration::from_secs(settings.max_wait_secs),
            max_concurrent_files: settings.max_concurrent_files.max(1),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| Error::Config(format!("Invalid AssemblyAI endpoint '{}': {}", path, e)))
    }

    fn fail(audio_path: &Path, reason: impl std::fmt::Display) -> Error {
        Error::Transcription {
            file: audio_path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    async fn upload(&self, audio_path: &Path) -> Result<String> {
        let bytes = tokio::fs::read(audio_path)
            .await
            .map_err(|e| Self::fail(audio_path, format!("could not read file: {}", e)))?;

        debug!(bytes = bytes.len(), "Uploading audio");

        let response: UploadResponse = self
            .client
            .post(self.endpoint("v2/upload")?)
            .header("authorization", &self.api_key)
            .header("content-type", "application/octet-stream")
            .body(bytes)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| Self::fail(audio_path, format!("upload failed: {}", e)))?
            .json()
            .await
            .map_err(|e| Self::fail(audio_path, format!("bad upload response: {}", e)))?;

        Ok(response.upload_url)
    }

    async fn submit(&self, audio_path: &Path, audio_url: &str) -> Result<TranscriptResponse> {
        let request = TranscriptRequest {
            audio_url,
            language_code: self.language_code.as_deref(),
        };

        self.client
            .post(self.endpoint("v2/transcript")?)
            .header("authorization", &self.api_key)
            .json(&request)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| Self::fail(audio_path, format!("submit failed: {}", e)))?
            .json()
            .await
            .map_err(|e| Self::fail(audio_path, format!("bad submit response: {}", e)))
    }

    async fn poll(&self, audio_path: &Path, transcript_id: &str) -> Result<()> {
        let url = self.endpoint(&format!("v2/transcript/{}", transcript_id))?;
        let deadline = Instant::now() + self.max_wait;

        loop {
            let transcript: TranscriptResponse = self
                .client
                .get(url.clone())
                .header("authorization", &self.api_key)
                .send()
                .await
                .and_then(|r| r.error_for_status())
                .map_err(|e| Self::fail(audio_path, format!("status check failed: {}", e)))?
                .json()
                .await
                .map_err(|e| Self::fail(audio_path, format!("bad status response: {}", e)))?;

            settle(&transcript).map_err(|reason| Self::fail(audio_path, reason))?;
            if transcript.status == TranscriptStatus::Completed {
                return Ok(());
            }

            if Instant::now() + self.poll_interval > deadline {
                return Err(Self::fail(
                    audio_path,
                    format!("not completed within {}s", self.max_wait.as_secs()),
                ));
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    async fn sentences(&self, audio_path: &Path, transcript_id: &str) -> Result<Vec<String>> {
        let response: SentencesResponse = self
            .client
            .get(self.endpoint(&format!("v2/transcript/{}/sentences", transcript_id))?)
            .header("authorization", &self.api_key)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| Self::fail(audio_path, format!("sentence fetch failed: {}", e)))?
            .json()
            .await
            .map_err(|e| Self::fail(audio_path, format!("bad sentences response: {}", e)))?;

        Ok(sentence_texts(response))
    }
}

/// Map a terminal error status to a failure reason. Non-terminal statuses pass.
fn settle(transcript: &TranscriptResponse) -> std::result::Result<(), String> {
    match transcript.status {
        TranscriptStatus::Error => Err(format!(
            "transcript {} errored: {}",
            transcript.id,
            transcript.error.as_deref().unwrap_or("unknown error")
        )),
        _ => Ok(()),
    }
}

fn sentence_texts(response: SentencesResponse) -> Vec<String> {
    response
        .sentences
        .into_iter()
        .map(|s| s.text.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[async_trait]
impl Transcriber for AssemblyAiTranscriber {
    #[instrument(skip(self), fields(audio_path = %audio_path.display()))]
    async fn transcribe(&self, audio_path: &Path) -> Result<Vec<String>> {
        let upload_url = self.upload(audio_path).await?;
        let transcript = self.submit(audio_path, &upload_url).await?;
        debug!(transcript_id = %transcript.id, "Transcript submitted");

        self.poll(audio_path, &transcript.id).await?;
        let sentences = self.sentences(audio_path, &transcript.id).await?;

        info!(sentences = sentences.len(), "File transcribed");
        for sentence in &sentences {
            debug!(sentence = %sentence, "Sentence found");
        }
        Ok(sentences)
    }

    #[instrument(skip(self, audio_paths), fields(files = audio_paths.len()))]
    async fn transcribe_many(&self, audio_paths: &[PathBuf]) -> Result<Vec<TranscriptSegment>> {
        transcribe_in_order(audio_paths, self.max_concurrent_files, |path| {
            self.transcribe(path)
        })
        .await
    }
}
