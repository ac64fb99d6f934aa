//! Data models for transcription.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One sentence of transcribed text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Sentence text.
    pub text: String,
    /// File the sentence was transcribed from.
    pub source: PathBuf,
}

impl TranscriptSegment {
    /// Create a new transcript segment.
    pub fn new(text: impl Into<String>, source: impl Into<PathBuf>) -> Self {
        Self {
            text: text.into(),
            source: source.into(),
        }
    }
}

/// Collect segment texts in order, the shape the topic and encoding stages consume.
pub fn segment_texts(segments: &[TranscriptSegment]) -> Vec<String> {
    segments.iter().map(|s| s.text.clone()).collect()
}
