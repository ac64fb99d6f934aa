//! The two pipelines: ingestion into the index and retrieval from it.
//!
//! They share no state. Ingestion always creates new records; retrieval is a pure read.

mod ingest;
mod query;
mod records;
mod retrieve;

#[cfg(test)]
pub(crate) mod testing;

pub use ingest::{verify_audio_files, IngestPipeline, IngestReport};
pub use query::{parse_top_k, parse_vector, read_query_line, QueryNormalizer, SearchQuery};
pub use records::build_records;
pub use retrieve::RetrievalPipeline;
