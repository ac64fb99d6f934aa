//! Scripted collaborators for pipeline tests.

use crate::embedding::Embedder;
use crate::error::{Error, Result};
use crate::topics::TopicExtractor;
use crate::transcription::Transcriber;
use crate::vector_store::{IndexRecord, Match, MetadataFilter, VectorStore};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Returns canned sentences per file name; unknown names fail.
#[derive(Default)]
pub struct ScriptedTranscriber {
    pub sentences: HashMap<String, Vec<String>>,
    pub calls: Mutex<Vec<PathBuf>>,
}

impl ScriptedTranscriber {
    pub fn with(mut self, file_name: &str, sentences: &[&str]) -> Self {
        self.sentences.insert(
            file_name.to_string(),
            sentences.iter().map(|s| s.to_string()).collect(),
        );
        self
    }
}

#[async_trait]
impl Transcriber for ScriptedTranscriber {
    async fn transcribe(&self, audio_path: &Path) -> Result<Vec<String>> {
        self.calls.lock().unwrap().push(audio_path.to_path_buf());
        let name = audio_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        self.sentences
            .get(name)
            .cloned()
            .ok_or_else(|| Error::Transcription {
                file: audio_path.to_path_buf(),
                reason: "unsupported audio".to_string(),
            })
    }
}

/// Labels each text with its first word, recording every batch it sees.
#[derive(Default)]
pub struct RecordingTopics {
    pub batches: Mutex<Vec<Vec<String>>>,
    /// Drop the last keyword list to simulate a misaligned model.
    pub drop_last: bool,
}

#[async_trait]
impl TopicExtractor for RecordingTopics {
    async fn get_topics(&self, texts: &[String], top_k: usize) -> Result<Vec<Vec<String>>> {
        self.batches.lock().unwrap().push(texts.to_vec());
        let mut topics: Vec<Vec<String>> = texts
            .iter()
            .map(|t| t.split_whitespace().take(top_k).map(str::to_string).collect())
            .collect();
        if self.drop_last {
            topics.pop();
        }
        Ok(topics)
    }
}

/// Encodes text `i` of a batch as `[i, len(text), 0, ...]`.
pub struct RecordingEmbedder {
    pub dimensions: usize,
    pub batches: Mutex<Vec<Vec<String>>>,
}

impl RecordingEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            batches: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Embedder for RecordingEmbedder {
    async fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.batches.lock().unwrap().push(texts.to_vec());
        Ok(texts
            .iter()
            .enumerate()
            .map(|(i, t)| {
                let mut v = vec![0.0; self.dimensions];
                v[0] = i as f32;
                v[1] = t.len() as f32;
                v
            })
            .collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// Records the last query and answers with fixed matches; can be told to fail.
#[derive(Default)]
pub struct ScriptedStore {
    pub matches: Vec<Match>,
    pub fail: bool,
    pub saved: Mutex<Vec<IndexRecord>>,
    pub queries: Mutex<Vec<(Vec<f32>, Option<MetadataFilter>, usize)>>,
}

#[async_trait]
impl VectorStore for ScriptedStore {
    async fn save(&self, records: &[IndexRecord]) -> Result<usize> {
        if self.fail {
            return Err(Error::Store("quota exceeded".to_string()));
        }
        self.saved.lock().unwrap().extend(records.iter().cloned());
        Ok(records.len())
    }

    async fn query(
        &self,
        vector: &[f32],
        filter: Option<&MetadataFilter>,
        top_k: usize,
    ) -> Result<Vec<Match>> {
        self.queries
            .lock()
            .unwrap()
            .push((vector.to_vec(), filter.cloned(), top_k));
        if self.fail {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "connection reset by peer",
            )));
        }
        Ok(self.matches.iter().take(top_k).cloned().collect())
    }
}
