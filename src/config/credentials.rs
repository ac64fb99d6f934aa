//! API credentials, read from the environment once at startup.

use crate::error::{Error, Result};

pub const PINECONE_API_KEY: &str = "PINECONE_API_KEY";
pub const ASSEMBLY_AI_API_KEY: &str = "ASSEMBLY_AI_API_KEY";
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";

/// Secrets handed to each collaborator's constructor.
#[derive(Clone)]
pub struct Credentials {
    pub pinecone_api_key: String,
    pub assembly_ai_api_key: String,
    /// Only present when the command being run embeds text.
    pub openai_api_key: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("pinecone_api_key", &"<redacted>")
            .field("assembly_ai_api_key", &"<redacted>")
            .field("openai_api_key", &self.openai_api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Credentials {
    /// Read credentials from the process environment, requiring every name in `required`.
    pub fn from_env(required: &[&str]) -> Result<Self> {
        Self::from_lookup(required, |name| std::env::var(name).ok())
    }

    /// Read credentials through an arbitrary lookup. Every missing required variable is
    /// reported; an empty value counts as missing.
    pub fn from_lookup<F>(required: &[&str], lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.is_empty());

        let missing: Vec<String> = required
            .iter()
            .copied()
            .filter(|&name| get(name).is_none())
            .map(|name| format!("{} is not set in the environment", name))
            .collect();
        if !missing.is_empty() {
            return Err(Error::Config(format!(
                "Environment is not ready: {}",
                missing.join("; ")
            )));
        }

        Ok(Self {
            pinecone_api_key: get(PINECONE_API_KEY).unwrap_or_default(),
            assembly_ai_api_key: get(ASSEMBLY_AI_API_KEY).unwrap_or_default(),
            openai_api_key: get(OPENAI_API_KEY),
        })
    }
}
