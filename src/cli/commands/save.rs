//! Save command implementation.

use crate::cli::Output;
use crate::config::{Credentials, Settings};
use crate::orchestrator::Orchestrator;
use anyhow::Result;
use std::path::PathBuf;

/// Run the save command.
pub async fn run_save(files: &[PathBuf], settings: Settings, credentials: Credentials) -> Result<()> {
    let orchestrator = Orchestrator::new(settings, credentials);
    let pipeline = orchestrator.ingest_pipeline().await?;

    Output::info(&format!("Ingesting {} file(s)", files.len()));
    let spinner = Output::spinner("Transcribing, extracting topics and embedding...");
    let result = pipeline.run(files).await;
    spinner.finish_and_clear();
    let report = result?;

    if report.records_saved == 0 {
        Output::warning("No sentences were transcribed. Nothing was saved.");
    } else {
        Output::success(&format!("Saved {} records", report.records_saved));
    }
    Output::kv("Files", &report.files.to_string());
    Output::kv("Sentences", &report.segments.to_string());
    Ok(())
}
