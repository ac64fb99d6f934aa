//! voxdex CLI entry point.

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use voxdex::cli::{commands, preflight, Cli, Commands, Output};
use voxdex::config::Settings;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("voxdex={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            Output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let settings = Settings::load_from(cli.config.as_ref())?;

    // No command runs without its credentials
    let credentials = preflight::check(cli.command.operation(), &settings)?;

    match &cli.command {
        Commands::Save { file } => {
            commands::run_save(file, settings, credentials).await?;
        }

        Commands::Search {
            file,
            metadata,
            top_k,
            output,
        } => {
            commands::run_search(file, metadata, top_k, output, settings, credentials).await?;
        }
    }

    Ok(())
}
