//! SQLite-based vector store implementation.
//!
//! Uses SQLite with cosine similarity computed in Rust for simplicity.
//! For production use cases with large datasets, prefer a dedicated vector database.

use super::{rank, IndexRecord, Match, MetadataFilter, RecordMetadata, VectorStore};
use crate::error::{Error, Result};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info, instrument};

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS records (
        id TEXT PRIMARY KEY,
        namespace TEXT NOT NULL,
        keywords TEXT NOT NULL,
        embedding BLOB NOT NULL,
        indexed_at TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_records_namespace ON records(namespace);
"#;

/// SQLite-based vector store.
pub struct SqliteVectorStore {
    conn: Mutex<Connection>,
    namespace: String,
}

impl SqliteVectorStore {
    /// Create a new SQLite vector store.
    #[instrument(skip_all)]
    pub fn new(path: &Path, namespace: &str) -> Result<Self> {
        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        // Enable WAL mode for better concurrent performance
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch(SCHEMA)?;

        info!("Initialized SQLite vector store at {:?}", path);

        Ok(Self {
            conn: Mutex::new(conn),
            namespace: namespace.to_string(),
        })
    }

    /// Create an in-memory SQLite vector store (useful for testing).
    pub fn in_memory(namespace: &str) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Mutex::new(conn),
            namespace: namespace.to_string(),
        })
    }

    /// Serialize embedding to bytes.
    fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
        embedding.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    /// Deserialize embedding from bytes.
    fn bytes_to_embedding(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|chunk| {
                let arr: [u8; 4] = chunk.try_into().unwrap_or_default();
                f32::from_le_bytes(arr)
            })
            .collect()
    }

    /// Load every record in this store's namespace.
    fn load_namespace(&self) -> Result<Vec<IndexRecord>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| Error::Retrieval(format!("Failed to acquire lock: {}", e)))?;

        let mut stmt =
            conn.prepare("SELECT id, keywords, embedding FROM records WHERE namespace = ?1")?;

        let rows = stmt.query_map(params![self.namespace], |row| {
            let id: String = row.get(0)?;
            let keywords: String = row.get(1)?;
            let embedding: Vec<u8> = row.get(2)?;
            Ok((id, keywords, embedding))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (id, keywords, embedding) = row?;
            records.push(IndexRecord {
                id,
                metadata: RecordMetadata {
                    text: serde_json::from_str(&keywords)?,
                },
                values: Self::bytes_to_embedding(&embedding),
            });
        }
        Ok(records)
    }

    /// Number of records in this store's namespace.
    #[cfg(test)]
    pub fn count(&self) -> Result<usize> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| Error::Store(format!("Failed to acquire lock: {}", e)))?;

        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM records WHERE namespace = ?1",
            params![self.namespace],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

#[async_trait]
impl VectorStore for SqliteVectorStore {
    #[instrument(skip(self, records), fields(count = records.len()))]
    async fn save(&self, records: &[IndexRecord]) -> Result<usize> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| Error::Store(format!("Failed to acquire lock: {}", e)))?;

        // One transaction: either the whole batch becomes visible or none of it does
        let tx = conn.unchecked_transaction()?;
        let indexed_at = Utc::now().to_rfc3339();

        for record in records {
            tx.execute(
                r#"
                INSERT INTO records (id, namespace, keywords, embedding, indexed_at)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
                params![
                    record.id,
                    self.namespace,
                    serde_json::to_string(&record.metadata.text)?,
                    Self::embedding_to_bytes(&record.values),
                    indexed_at,
                ],
            )?;
        }

        tx.commit()?;
        debug!("Inserted {} records", records.len());
        Ok(records.len())
    }

    #[instrument(skip(self, vector, filter))]
    async fn query(
        &self,
        vector: &[f32],
        filter: Option<&MetadataFilter>,
        top_k: usize,
    ) -> Result<Vec<Match>> {
        let records = self.load_namespace()?;
        Ok(rank(&records, vector, filter, top_k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(keywords: &[&str], values: Vec<f32>) -> IndexRecord {
        IndexRecord::new(keywords.iter().map(|s| s.to_string()).collect(), values)
    }

    #[test]
    fn test_embedding_round_trip() {
        let values = vec![0.25f32, -1.5, 3.0];
        let bytes = SqliteVectorStore::embedding_to_bytes(&values);
        assert_eq!(bytes.len(), 12);
        assert_eq!(SqliteVectorStore::bytes_to_embedding(&bytes), values);
    }

    #[tokio::test]
    async fn test_save_and_query() {
        let store = SqliteVectorStore::in_memory("ns1").unwrap();
        let near = record(&["rust", "tokio"], vec![1.0, 0.0]);
        let far = record(&["pasta"], vec![0.0, 1.0]);

        assert_eq!(store.save(&[near.clone(), far.clone()]).await.unwrap(), 2);
        assert_eq!(store.count().unwrap(), 2);

        let matches = store.query(&[1.0, 0.1], None, 1).await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, near.id);
        assert_eq!(matches[0].values, near.values);
        assert_eq!(matches[0].metadata.as_ref().unwrap(), &near.metadata);
    }

    #[tokio::test]
    async fn test_filter_and_namespace() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vectors.db");

        let ns1 = SqliteVectorStore::new(&path, "ns1").unwrap();
        ns1.save(&[record(&["foo"], vec![1.0]), record(&["bar"], vec![1.0])])
            .await
            .unwrap();

        let filter = MetadataFilter::any_of(["bar"]).unwrap();
        let matches = ns1.query(&[1.0], Some(&filter), 10).await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].metadata.as_ref().unwrap().text, vec!["bar"]);

        let ns2 = SqliteVectorStore::new(&path, "ns2").unwrap();
        assert!(ns2.query(&[1.0], None, 10).await.unwrap().is_empty());
        assert_eq!(ns2.count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_failed_batch_leaves_nothing_behind() {
        let store = SqliteVectorStore::in_memory("ns1").unwrap();
        let dup = record(&["a"], vec![1.0]);

        // Duplicate primary key makes the second insert fail
        let result = store.save(&[dup.clone(), dup]).await;
        assert!(result.is_err());
        assert_eq!(store.count().unwrap(), 0);
    }
}
