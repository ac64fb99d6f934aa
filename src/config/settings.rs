//! Configuration settings for voxdex.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub transcription: TranscriptionSettings,
    pub topics: TopicSettings,
    pub embedding: EmbeddingSettings,
    pub vector_store: VectorStoreSettings,
    pub search: SearchSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Timeout applied to every outbound HTTP request.
    pub http_timeout_secs: u64,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            http_timeout_secs: crate::http::DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Transcription service settings (AssemblyAI).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionSettings {
    /// Base URL of the AssemblyAI API.
    pub base_url: String,
    /// Optional language code hint (e.g. "en_us"). None lets the service decide.
    pub language_code: Option<String>,
    /// Delay between transcript status polls.
    pub poll_interval_ms: u64,
    /// Upper bound on how long a single file may take to transcribe.
    pub max_wait_secs: u64,
    /// Maximum number of files transcribed concurrently.
    pub max_concurrent_files: usize,
}

impl Default for TranscriptionSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.assemblyai.com".to_string(),
            language_code: None,
            poll_interval_ms: 3000,
            max_wait_secs: 1800,
            max_concurrent_files: 3,
        }
    }
}

/// Topic extraction settings (LDA).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TopicSettings {
    /// Number of keywords kept per segment.
    pub top_k: usize,
    /// Fixed number of topics. None means one topic per text, capped by `max_topics`.
    pub num_topics: Option<usize>,
    /// Cap applied when the topic count is derived from the batch size.
    pub max_topics: usize,
    /// Gibbs sampling sweeps.
    pub iterations: usize,
    /// Seed for the sampler, so repeated runs give the same keywords.
    pub seed: u64,
    /// Words removed before fitting.
    pub stop_words: Vec<String>,
}

impl Default for TopicSettings {
    fn default() -> Self {
        Self {
            top_k: 5,
            num_topics: None,
            max_topics: 20,
            iterations: 200,
            seed: 42,
            stop_words: [
                "is", "of", "for", "the", "a", "an", "are", "in", "on", "at", "and", "to",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

/// Embedding provider type.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProvider {
    /// OpenAI embeddings API.
    #[default]
    OpenAI,
}

impl std::fmt::Display for EmbeddingProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmbeddingProvider::OpenAI => write!(f, "openai"),
        }
    }
}

/// Embedding generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Embedding provider.
    pub provider: EmbeddingProvider,
    /// Embedding model to use.
    pub model: String,
    /// Embedding dimensions. Query vectors must match this exactly.
    pub dimensions: usize,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: EmbeddingProvider::OpenAI,
            model: "text-embedding-3-small".to_string(),
            dimensions: 768,
        }
    }
}

/// Vector store provider type.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum StoreProvider {
    /// Pinecone serverless index.
    #[default]
    Pinecone,
    /// Local SQLite database.
    Sqlite,
}

impl std::fmt::Display for StoreProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreProvider::Pinecone => write!(f, "pinecone"),
            StoreProvider::Sqlite => write!(f, "sqlite"),
        }
    }
}

/// Vector store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorStoreSettings {
    /// Vector store provider.
    pub provider: StoreProvider,
    /// Index name.
    pub index: String,
    /// Namespace that partitions records within the index.
    pub namespace: String,
    /// Pinecone index host. Resolved from the control plane when unset.
    pub host: Option<String>,
    /// Pinecone control plane URL.
    pub control_plane_url: String,
    /// Pinecone API version header value.
    pub api_version: String,
    /// Path to SQLite database (for sqlite provider).
    pub sqlite_path: String,
}

impl Default for VectorStoreSettings {
    fn default() -> Self {
        Self {
            provider: StoreProvider::Pinecone,
            index: "test".to_string(),
            namespace: "ns1".to_string(),
            host: None,
            control_plane_url: "https://api.pinecone.io".to_string(),
            api_version: "2024-07".to_string(),
            sqlite_path: "~/.voxdex/vectors.db".to_string(),
        }
    }
}

/// Search command defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Maximum bytes read from the first line of a query CSV.
    pub max_line_bytes: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            max_line_bytes: 5_000_000,
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("voxdex")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded SQLite database path.
    pub fn sqlite_path(&self) -> PathBuf {
        Self::expand_path(&self.vector_store.sqlite_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.embedding.dimensions, 768);
        assert_eq!(settings.vector_store.index, "test");
        assert_eq!(settings.vector_store.namespace, "ns1");
        assert_eq!(settings.topics.top_k, 5);
        assert_eq!(settings.vector_store.provider, StoreProvider::Pinecone);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [vector_store]
            provider = "sqlite"
            namespace = "podcasts"

            [topics]
            num_topics = 4
            "#,
        )
        .unwrap();

        assert_eq!(settings.vector_store.provider, StoreProvider::Sqlite);
        assert_eq!(settings.vector_store.namespace, "podcasts");
        assert_eq!(settings.vector_store.index, "test");
        assert_eq!(settings.topics.num_topics, Some(4));
        assert_eq!(settings.topics.top_k, 5);
        assert_eq!(settings.embedding.dimensions, 768);
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        let settings = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(settings.general.http_timeout_secs, 300);
    }

    #[test]
    fn test_stale_data_dir_key_is_ignored() {
        let settings: Settings = toml::from_str(
            r#"
            [general]
            data_dir = "~/.voxdex"
            http_timeout_secs = 30
            "#,
        )
        .unwrap();
        assert_eq!(settings.general.http_timeout_secs, 30);
    }
}
