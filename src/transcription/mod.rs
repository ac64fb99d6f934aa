//! Transcription module for voxdex.
//!
//! Turns audio files into ordered sentence lists. The default backend is AssemblyAI.

mod assemblyai;
mod models;

pub use assemblyai::AssemblyAiTranscriber;
pub use models::{segment_texts, TranscriptSegment};

use crate::error::Result;
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use std::future::Future;
use std::path::{Path, PathBuf};

/// Trait for transcription services.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe one audio file into its sentences, in spoken order.
    async fn transcribe(&self, audio_path: &Path) -> Result<Vec<String>>;

    /// Transcribe several files into one flattened segment list.
    ///
    /// Order is file order, then sentence order. Any failing file fails the whole batch.
    async fn transcribe_many(&self, audio_paths: &[PathBuf]) -> Result<Vec<TranscriptSegment>> {
        transcribe_in_order(audio_paths, 1, |path| self.transcribe(path)).await
    }
}

/// Run `transcribe` over every file with at most `max_concurrent` in flight.
///
/// Files may finish in any order; segments come back in input file order. The first
/// failure to arrive fails the batch.
pub async fn transcribe_in_order<'a, F, Fut>(
    audio_paths: &'a [PathBuf],
    max_concurrent: usize,
    transcribe: F,
) -> Result<Vec<TranscriptSegment>>
where
    F: Fn(&'a Path) -> Fut,
    Fut: Future<Output = Result<Vec<String>>>,
{
    let pending: Vec<_> = audio_paths
        .iter()
        .enumerate()
        .map(|(idx, path)| {
            let sentences = transcribe(path.as_path());
            async move { (idx, sentences.await) }
        })
        .collect();

    let mut stream = stream::iter(pending).buffer_unordered(max_concurrent.max(1));
    let mut results: Vec<(usize, Vec<String>)> = Vec::with_capacity(audio_paths.len());
    while let Some((idx, result)) = stream.next().await {
        results.push((idx, result?));
    }

    // Restore input file order
    results.sort_by_key(|(idx, _)| *idx);

    Ok(results
        .into_iter()
        .flat_map(|(idx, sentences)| {
            let source = audio_paths[idx].clone();
            sentences
                .into_iter()
                .map(move |text| TranscriptSegment::new(text, source.clone()))
        })
        .collect())
}
