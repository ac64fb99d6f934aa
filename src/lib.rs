//! voxdex - spoken-audio indexing and vector search
//!
//! Transcribes audio into sentences, labels every sentence with topic keywords drawn from
//! the whole batch, embeds it, and saves it to a vector index. A query is a raw vector read
//! from a CSV file, optionally narrowed to records sharing a keyword.
//!
//! # Architecture
//!
//! - `config` - Settings file and environment credentials
//! - `transcription` - Speech-to-text, one sentence per segment
//! - `topics` - Batch topic modelling and keyword extraction
//! - `embedding` - Text embedding generation
//! - `vector_store` - Vector index abstraction (Pinecone, SQLite)
//! - `pipeline` - Ingestion, query normalization and retrieval
//! - `orchestrator` - Wires concrete collaborators into the pipelines
//! - `http` - Shared HTTP client construction
//!
//! # Example
//!
//! ```rust,no_run
//! use voxdex::cli::preflight::{self, Operation};
//! use voxdex::config::Settings;
//! use voxdex::orchestrator::Orchestrator;
//! use std::path::PathBuf;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let credentials = preflight::check(Operation::Save, &settings)?;
//!     let orchestrator = Orchestrator::new(settings, credentials);
//!
//!     let report = orchestrator
//!         .ingest_pipeline()
//!         .await?
//!         .run(&[PathBuf::from("interview.mp3")])
//!         .await?;
//!     println!("Saved {} records", report.records_saved);
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod http;
pub mod openai;
pub mod orchestrator;
pub mod pipeline;
pub mod topics;
pub mod transcription;
pub mod vector_store;

pub use error::{Error, Result};
