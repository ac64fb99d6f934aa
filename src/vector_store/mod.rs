//! Vector store abstraction for voxdex.
//!
//! Provides a trait-based interface for different vector database backends. Every store is
//! scoped to one namespace chosen at construction time.

#[cfg(test)]
mod memory;
mod pinecone;
mod sqlite;

#[cfg(test)]
pub use memory::MemoryVectorStore;
pub use pinecone::PineconeVectorStore;
pub use sqlite::SqliteVectorStore;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Metadata stored alongside each vector.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordMetadata {
    /// Topic keywords of the segment.
    #[serde(default)]
    pub text: Vec<String>,
}

/// The persisted unit: identifier, keyword metadata and embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexRecord {
    /// Fresh UUID v4, never derived from content.
    pub id: String,
    pub metadata: RecordMetadata,
    pub values: Vec<f32>,
}

impl IndexRecord {
    /// Create a record with a newly generated id.
    pub fn new(keywords: Vec<String>, values: Vec<f32>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            metadata: RecordMetadata { text: keywords },
            values,
        }
    }
}

/// Inclusion filter: a record matches when any of its keywords is in the set.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataFilter {
    keywords: Vec<String>,
}

#[derive(Serialize)]
struct InClause<'a> {
    #[serde(rename = "$in")]
    values: &'a [String],
}

#[derive(Serialize)]
struct TextFilter<'a> {
    text: InClause<'a>,
}

impl MetadataFilter {
    /// Build a filter from keywords. No keywords means no filter.
    pub fn any_of<I, S>(keywords: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keywords: Vec<String> = keywords.into_iter().map(Into::into).collect();
        if keywords.is_empty() {
            None
        } else {
            Some(Self { keywords })
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Whether a record's metadata passes the filter.
    pub fn matches(&self, metadata: &RecordMetadata) -> bool {
        metadata.text.iter().any(|k| self.keywords.contains(k))
    }
}

/// Serializes as `{"text": {"$in": [...]}}`.
impl Serialize for MetadataFilter {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        TextFilter {
            text: InClause {
                values: &self.keywords,
            },
        }
        .serialize(serializer)
    }
}

/// One ranked search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: String,
    /// Similarity score (higher is better).
    pub score: f32,
    #[serde(default)]
    pub values: Vec<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<RecordMetadata>,
}

/// Trait for vector store implementations.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Persist a batch of records, returning how many were written.
    async fn save(&self, records: &[IndexRecord]) -> Result<usize>;

    /// Return up to `top_k` nearest records, best first, with scores and values.
    async fn query(
        &self,
        vector: &[f32],
        filter: Option<&MetadataFilter>,
        top_k: usize,
    ) -> Result<Vec<Match>>;
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

/// Score, filter, rank and truncate records. Shared by the local stores.
pub(crate) fn rank<'a, I>(
    records: I,
    vector: &[f32],
    filter: Option<&MetadataFilter>,
    top_k: usize,
) -> Vec<Match>
where
    I: IntoIterator<Item = &'a IndexRecord>,
{
    let mut matches: Vec<Match> = records
        .into_iter()
        .filter(|r| filter.map_or(true, |f| f.matches(&r.metadata)))
        .map(|r| Match {
            id: r.id.clone(),
            score: cosine_similarity(vector, &r.values),
            values: r.values.clone(),
            metadata: Some(r.metadata.clone()),
        })
        .collect();

    matches.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    matches.truncate(top_k);
    matches
}
