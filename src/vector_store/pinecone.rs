//! Pinecone vector store implementation over the REST data plane.

use super::{IndexRecord, Match, MetadataFilter, VectorStore};
use crate::config::VectorStoreSettings;
use crate::error::{Error, Result};
use crate::http::http_client;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info, instrument};
use url::Url;

#[derive(Debug, Serialize)]
struct UpsertRequest<'a> {
    vectors: &'a [IndexRecord],
    namespace: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpsertResponse {
    #[serde(default)]
    upserted_count: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    namespace: &'a str,
    vector: &'a [f32],
    top_k: usize,
    include_values: bool,
    include_metadata: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<&'a MetadataFilter>,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<Match>,
}

#[derive(Debug, Deserialize)]
struct IndexDescription {
    host: String,
}

/// Pinecone-backed vector store scoped to one index and namespace.
pub struct PineconeVectorStore {
    client: reqwest::Client,
    api_key: String,
    api_version: String,
    host: Url,
    namespace: String,
}

impl PineconeVectorStore {
    /// Connect to an index, resolving its host through the control plane when not configured.
    #[instrument(skip(api_key, settings), fields(index = %settings.index))]
    pub async fn connect(
        api_key: &str,
        settings: &VectorStoreSettings,
        timeout: Duration,
    ) -> Result<Self> {
        let client = http_client(timeout)?;

        let host = match &settings.host {
            Some(host) => host.clone(),
            None => Self::describe_index(&client, api_key, settings).await?,
        };
        let host = host_url(&host)?;
        info!(host = %host, namespace = %settings.namespace, "Connected to Pinecone index");

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            api_version: settings.api_version.clone(),
            host,
            namespace: settings.namespace.clone(),
        })
    }

    async fn describe_index(
        client: &reqwest::Client,
        api_key: &str,
        settings: &VectorStoreSettings,
    ) -> Result<String> {
        let url = format!(
            "{}/indexes/{}",
            settings.control_plane_url.trim_end_matches('/'),
            settings.index
        );

        let description: IndexDescription = client
            .get(&url)
            .header("Api-Key", api_key)
            .header("X-Pinecone-API-Version", &settings.api_version)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                Error::Config(format!("Could not describe index '{}': {}", settings.index, e))
            })?
            .json()
            .await
            .map_err(|e| Error::Config(format!("Bad index description: {}", e)))?;

        Ok(description.host)
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.host
            .join(path)
            .map_err(|e| Error::Config(format!("Invalid Pinecone endpoint '{}': {}", path, e)))
    }

    fn query_request<'a>(
        &'a self,
        vector: &'a [f32],
        filter: Option<&'a MetadataFilter>,
        top_k: usize,
    ) -> QueryRequest<'a> {
        QueryRequest {
            namespace: &self.namespace,
            vector,
            top_k,
            include_values: true,
            include_metadata: true,
            filter,
        }
    }
}

/// Normalize a configured or described host into a base URL.
fn host_url(host: &str) -> Result<Url> {
    let with_scheme = if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    };
    let with_slash = if with_scheme.ends_with('/') {
        with_scheme
    } else {
        format!("{}/", with_scheme)
    };
    Url::parse(&with_slash)
        .map_err(|e| Error::Config(format!("Invalid Pinecone host '{}': {}", host, e)))
}

#[async_trait]
impl VectorStore for PineconeVectorStore {
    #[instrument(skip(self, records), fields(count = records.len(), namespace = %self.namespace))]
    async fn save(&self, records: &[IndexRecord]) -> Result<usize> {
        info!("Starting data upload");

        let request = UpsertRequest {
            vectors: records,
            namespace: &self.namespace,
        };

        let result = async {
            self.client
                .post(self.endpoint("vectors/upsert")?)
                .header("Api-Key", &self.api_key)
                .header("X-Pinecone-API-Version", &self.api_version)
                .json(&request)
                .send()
                .await
                .and_then(|r| r.error_for_status())?
                .json::<UpsertResponse>()
                .await
                .map_err(Error::from)
        }
        .await;

        match result {
            Ok(response) => {
                info!(upserted = response.upserted_count, "Upload completed");
                Ok(response.upserted_count)
            }
            Err(e) => {
                error!(error = %e, "Upload failed");
                Err(Error::Store(e.to_string()))
            }
        }
    }

    #[instrument(skip(self, vector, filter), fields(namespace = %self.namespace))]
    async fn query(
        &self,
        vector: &[f32],
        filter: Option<&MetadataFilter>,
        top_k: usize,
    ) -> Result<Vec<Match>> {
        let request = self.query_request(vector, filter, top_k);

        let response: QueryResponse = self
            .client
            .post(self.endpoint("query")?)
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", &self.api_version)
            .json(&request)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::Retrieval(e.to_string()))?
            .json()
            .await
            .map_err(|e| Error::Retrieval(format!("Bad query response: {}", e)))?;

        debug!(matches = response.matches.len(), "Query completed");
        Ok(response.matches)
    }
}
