//! Configuration module for voxdex.
//!
//! Handles loading application settings and the API credentials taken from the environment.

mod credentials;
mod settings;

pub use credentials::{Credentials, ASSEMBLY_AI_API_KEY, OPENAI_API_KEY, PINECONE_API_KEY};
pub use settings::{
    EmbeddingProvider, EmbeddingSettings, GeneralSettings, SearchSettings, Settings,
    StoreProvider, TopicSettings, TranscriptionSettings, VectorStoreSettings,
};
