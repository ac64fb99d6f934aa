//! Topic keyword extraction.
//!
//! Topics are fitted over a whole batch at once; the model needs enough documents to find
//! a meaningful topic distribution, so callers should never feed it one text at a time.

mod lda;
mod vectorizer;

pub use lda::{LdaModel, LdaTopicExtractor};
pub use vectorizer::{Corpus, CountVectorizer};

use crate::error::Result;
use async_trait::async_trait;

/// Trait for topic extraction.
#[async_trait]
pub trait TopicExtractor: Send + Sync {
    /// Return up to `top_k` keywords for each text, positionally aligned with `texts`.
    async fn get_topics(&self, texts: &[String], top_k: usize) -> Result<Vec<Vec<String>>>;
}
