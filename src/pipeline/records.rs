//! Assembly of index records from aligned segment, topic and embedding batches.

use crate::error::{Error, Result};
use crate::transcription::TranscriptSegment;
use crate::vector_store::IndexRecord;

/// Zip three aligned batches into records, position by position.
///
/// Record `i` takes its keywords from `topics[i]` and its values from `embeddings[i]`.
/// The batches must have identical lengths; anything else is an alignment error rather
/// than a silent truncation to the shortest batch.
pub fn build_records(
    segments: &[TranscriptSegment],
    topics: Vec<Vec<String>>,
    embeddings: Vec<Vec<f32>>,
) -> Result<Vec<IndexRecord>> {
    if segments.len() != topics.len() || segments.len() != embeddings.len() {
        return Err(Error::Alignment {
            segments: segments.len(),
            topics: topics.len(),
            embeddings: embeddings.len(),
        });
    }

    Ok(topics
        .into_iter()
        .zip(embeddings)
        .map(|(keywords, values)| IndexRecord::new(keywords, values))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn segments(n: usize) -> Vec<TranscriptSegment> {
        (0..n)
            .map(|i| TranscriptSegment::new(format!("sentence {}", i), "a.mp3"))
            .collect()
    }

    fn topics(n: usize) -> Vec<Vec<String>> {
        (0..n).map(|i| vec![format!("kw{}", i)]).collect()
    }

    fn embeddings(n: usize) -> Vec<Vec<f32>> {
        (0..n).map(|i| vec![i as f32, 1.0]).collect()
    }

    #[test]
    fn test_positional_mapping_and_unique_ids() {
        let records = build_records(&segments(4), topics(4), embeddings(4)).unwrap();

        assert_eq!(records.len(), 4);
        for (i, record) in records.iter().enumerate() {
            assert_eq!(record.metadata.text, vec![format!("kw{}", i)]);
            assert_eq!(record.values, vec![i as f32, 1.0]);
        }

        let ids: HashSet<_> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn test_empty_batch_gives_no_records() {
        let records = build_records(&[], Vec::new(), Vec::new()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_any_length_mismatch_is_rejected() {
        for (s, t, e) in [(3, 3, 2), (3, 2, 3), (2, 3, 3), (0, 1, 0), (4, 2, 1)] {
            let err = build_records(&segments(s), topics(t), embeddings(e)).unwrap_err();
            match err {
                Error::Alignment {
                    segments,
                    topics,
                    embeddings,
                } => assert_eq!((segments, topics, embeddings), (s, t, e)),
                other => panic!("unexpected error: {other}"),
            }
        }
    }
}
