//! Pipeline orchestrator for voxdex.
//!
//! Builds the concrete collaborators from settings and credentials and hands them to the
//! ingestion and retrieval pipelines. Collaborators are built per pipeline, so a command
//! only connects to what it uses.

use crate::config::{Credentials, EmbeddingProvider, Settings, StoreProvider};
use crate::embedding::{Embedder, OpenAIEmbedder};
use crate::error::{Error, Result};
use crate::pipeline::{IngestPipeline, QueryNormalizer, RetrievalPipeline};
use crate::topics::LdaTopicExtractor;
use crate::transcription::AssemblyAiTranscriber;
use crate::vector_store::{PineconeVectorStore, SqliteVectorStore, VectorStore};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Settings and credentials for one invocation.
pub struct Orchestrator {
    settings: Settings,
    credentials: Credentials,
}

impl Orchestrator {
    pub fn new(settings: Settings, credentials: Credentials) -> Self {
        Self {
            settings,
            credentials,
        }
    }

    /// Get the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// A normalizer for the configured embedding dimensionality. Needs no network.
    pub fn query_normalizer(&self) -> QueryNormalizer {
        QueryNormalizer::new(self.settings.embedding.dimensions)
    }

    /// Build every collaborator ingestion needs. The store is connected last.
    pub async fn ingest_pipeline(&self) -> Result<IngestPipeline> {
        let transcriber = Arc::new(AssemblyAiTranscriber::new(
            &self.credentials.assembly_ai_api_key,
            &self.settings.transcription,
            self.timeout(),
        )?);
        let topics = Arc::new(LdaTopicExtractor::new(&self.settings.topics));
        let embedder = self.embedder()?;
        let store = self.vector_store().await?;

        info!(
            embedder = %self.settings.embedding.provider,
            store = %self.settings.vector_store.provider,
            namespace = %self.settings.vector_store.namespace,
            "Ingest pipeline ready"
        );

        Ok(IngestPipeline::new(transcriber, topics, embedder, store)
            .with_topic_top_k(self.settings.topics.top_k))
    }

    /// Connect the store for retrieval. Nothing else is built.
    pub async fn retrieval_pipeline(&self) -> Result<RetrievalPipeline> {
        let store = self.vector_store().await?;
        info!(
            store = %self.settings.vector_store.provider,
            namespace = %self.settings.vector_store.namespace,
            "Retrieval pipeline ready"
        );
        Ok(RetrievalPipeline::new(store))
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.settings.general.http_timeout_secs)
    }

    fn embedder(&self) -> Result<Arc<dyn Embedder>> {
        match self.settings.embedding.provider {
            EmbeddingProvider::OpenAI => {
                let api_key = self.credentials.openai_api_key.as_deref().ok_or_else(|| {
                    Error::Config("OPENAI_API_KEY is required for the openai embedder".to_string())
                })?;
                Ok(Arc::new(OpenAIEmbedder::new(
                    api_key,
                    &self.settings.embedding.model,
                    self.settings.embedding.dimensions,
                    self.timeout(),
                )?))
            }
        }
    }

    async fn vector_store(&self) -> Result<Arc<dyn VectorStore>> {
        let settings = &self.settings.vector_store;
        Ok(match settings.provider {
            StoreProvider::Pinecone => Arc::new(
                PineconeVectorStore::connect(
                    &self.credentials.pinecone_api_key,
                    settings,
                    self.timeout(),
                )
                .await?,
            ),
            StoreProvider::Sqlite => Arc::new(SqliteVectorStore::new(
                &self.settings.sqlite_path(),
                &settings.namespace,
            )?),
        })
    }
}
