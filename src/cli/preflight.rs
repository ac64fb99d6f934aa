//! Pre-flight checks before any command runs.
//!
//! Every variable a command needs is checked up front so a run never fails halfway
//! through for want of a credential.

use crate::config::{
    Credentials, EmbeddingProvider, Settings, ASSEMBLY_AI_API_KEY, OPENAI_API_KEY,
    PINECONE_API_KEY,
};
use crate::error::Result;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Ingestion transcribes, embeds and writes to the store.
    Save,
    /// Search only queries the store.
    Search,
}

/// Names of the environment variables an operation needs.
pub fn required_variables(operation: Operation, settings: &Settings) -> Vec<&'static str> {
    let mut vars = vec![PINECONE_API_KEY, ASSEMBLY_AI_API_KEY];
    if operation == Operation::Save {
        match settings.embedding.provider {
            EmbeddingProvider::OpenAI => vars.push(OPENAI_API_KEY),
        }
    }
    vars
}

/// Load the credentials an operation needs from the process environment.
pub fn check(operation: Operation, settings: &Settings) -> Result<Credentials> {
    Credentials::from_env(&required_variables(operation, settings))
}
