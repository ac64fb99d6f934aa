//! Retrieval: a validated query in, ranked matches out.

use super::query::SearchQuery;
use crate::error::{Error, Result};
use crate::vector_store::{Match, VectorStore};
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Issues one similarity query per request and keeps the store's ranking.
pub struct RetrievalPipeline {
    store: Arc<dyn VectorStore>,
}

impl RetrievalPipeline {
    pub fn new(store: Arc<dyn VectorStore>) -> Self {
        Self { store }
    }

    /// Run a search. An empty result is a valid answer, not an error.
    #[instrument(skip(self, query), fields(top_k = query.top_k, filtered = query.filter.is_some()))]
    pub async fn run(&self, query: &SearchQuery) -> Result<Vec<Match>> {
        info!(stage = "query", "stage started");

        let matches = self
            .store
            .query(&query.vector, query.filter.as_ref(), query.top_k)
            .await
            .map_err(|e| {
                error!(stage = "query", error = %e, "stage failed");
                match e {
                    Error::Retrieval(_) => e,
                    other => Error::Retrieval(other.to_string()),
                }
            })?;

        info!(stage = "query", matches = matches.len(), "stage completed");
        Ok(matches)
    }
}
