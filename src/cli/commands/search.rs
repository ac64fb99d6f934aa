//! Search command implementation.

use crate::cli::Output;
use crate::config::{Credentials, Settings};
use crate::orchestrator::Orchestrator;
use crate::pipeline::read_query_line;
use crate::vector_store::Match;
use anyhow::{Context, Result};
use std::path::Path;

/// Run the search command.
///
/// The query is read and validated before the store is contacted.
pub async fn run_search(
    file: &Path,
    metadata: &[String],
    top_k: &str,
    output: &Path,
    settings: Settings,
    credentials: Credentials,
) -> Result<()> {
    let orchestrator = Orchestrator::new(settings, credentials);

    let line = read_query_line(file, orchestrator.settings().search.max_line_bytes)?;
    let query = orchestrator.query_normalizer().normalize(&line, metadata, top_k)?;

    let pipeline = orchestrator.retrieval_pipeline().await?;
    let spinner = Output::spinner("Searching...");
    let result = pipeline.run(&query).await;
    spinner.finish_and_clear();
    let matches = result?;

    if matches.is_empty() {
        Output::warning("No matches found.");
        return Ok(());
    }

    Output::success(&format!("Found {} matches", matches.len()));
    for (i, m) in matches.iter().enumerate() {
        let keywords = m.metadata.as_ref().map(|md| md.text.as_slice()).unwrap_or(&[]);
        Output::search_match(i + 1, &m.id, m.score, keywords);
    }

    write_matches(output, &matches)?;
    Output::kv("Written to", &output.display().to_string());
    Ok(())
}

/// Write matches as a pretty-printed JSON array.
fn write_matches(path: &Path, matches: &[Match]) -> Result<()> {
    let json = serde_json::to_string_pretty(matches)?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write matches to {}", path.display()))?;
    Ok(())
}
