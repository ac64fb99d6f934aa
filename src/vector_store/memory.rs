//! In-memory vector store implementation.
//!
//! Useful for testing and small datasets.

use super::{rank, IndexRecord, Match, MetadataFilter, VectorStore};
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

type Namespaces = HashMap<String, Vec<IndexRecord>>;

/// In-memory vector store.
///
/// Handles created with [`MemoryVectorStore::in_namespace`] share storage, which makes
/// namespace isolation observable in tests.
#[derive(Clone)]
pub struct MemoryVectorStore {
    namespace: String,
    records: Arc<RwLock<Namespaces>>,
}

impl MemoryVectorStore {
    /// Create a new in-memory vector store.
    pub fn new(namespace: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// A handle on the same storage scoped to another namespace.
    pub fn in_namespace(&self, namespace: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            records: Arc::clone(&self.records),
        }
    }

    /// Number of records in this handle's namespace.
    pub fn len(&self) -> Result<usize> {
        let records = self
            .records
            .read()
            .map_err(|e| Error::Store(format!("Failed to acquire lock: {}", e)))?;
        Ok(records.get(&self.namespace).map_or(0, Vec::len))
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl Default for MemoryVectorStore {
    fn default() -> Self {
        Self::new("ns1")
    }
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn save(&self, records: &[IndexRecord]) -> Result<usize> {
        let mut store = self
            .records
            .write()
            .map_err(|e| Error::Store(format!("Failed to acquire lock: {}", e)))?;
        store
            .entry(self.namespace.clone())
            .or_default()
            .extend(records.iter().cloned());
        Ok(records.len())
    }

    async fn query(
        &self,
        vector: &[f32],
        filter: Option<&MetadataFilter>,
        top_k: usize,
    ) -> Result<Vec<Match>> {
        let store = self
            .records
            .read()
            .map_err(|e| Error::Retrieval(format!("Failed to acquire lock: {}", e)))?;

        Ok(match store.get(&self.namespace) {
            Some(records) => rank(records, vector, filter, top_k),
            None => Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(keywords: &[&str], values: Vec<f32>) -> IndexRecord {
        IndexRecord::new(keywords.iter().map(|s| s.to_string()).collect(), values)
    }

    #[tokio::test]
    async fn test_memory_vector_store() {
        let store = MemoryVectorStore::new("ns1");

        let saved = store
            .save(&[
                record(&["hello", "world"], vec![1.0, 0.0, 0.0]),
                record(&["goodbye"], vec![0.0, 1.0, 0.0]),
            ])
            .await
            .unwrap();
        assert_eq!(saved, 2);
        assert_eq!(store.len().unwrap(), 2);

        let results = store.query(&[1.0, 0.0, 0.0], None, 10).await.unwrap();
        assert_eq!(results.len(), 2);
        assert!(results[0].score > results[1].score);
        assert_eq!(
            results[0].metadata.as_ref().unwrap().text,
            vec!["hello", "world"]
        );
    }

    #[tokio::test]
    async fn test_filter_restricts_matches() {
        let store = MemoryVectorStore::default();
        store
            .save(&[
                record(&["foo"], vec![1.0, 0.0]),
                record(&["bar"], vec![0.9, 0.1]),
                record(&["baz"], vec![1.0, 0.0]),
            ])
            .await
            .unwrap();

        let filter = MetadataFilter::any_of(["foo", "bar"]).unwrap();
        let results = store.query(&[1.0, 0.0], Some(&filter), 10).await.unwrap();
        assert_eq!(results.len(), 2);
        assert!(results
            .iter()
            .all(|m| filter.matches(m.metadata.as_ref().unwrap())));
    }

    #[tokio::test]
    async fn test_namespaces_are_isolated() {
        let ns1 = MemoryVectorStore::new("ns1");
        let ns2 = ns1.in_namespace("ns2");

        ns1.save(&[record(&["a"], vec![1.0])]).await.unwrap();

        assert_eq!(ns1.query(&[1.0], None, 5).await.unwrap().len(), 1);
        assert!(ns2.query(&[1.0], None, 5).await.unwrap().is_empty());
        assert!(ns2.is_empty().unwrap());
    }
}
