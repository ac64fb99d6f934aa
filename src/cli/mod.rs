//! CLI module for voxdex.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// voxdex - index spoken audio by topic and search it by vector
#[derive(Parser, Debug)]
#[command(name = "voxdex")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Transcribe audio files and save their sentences to the index
    Save {
        /// Audio files to ingest
        #[arg(short, long, required = true, num_args = 1..)]
        file: Vec<PathBuf>,
    },

    /// Search the index with a vector read from a .csv file
    Search {
        /// CSV file whose first line is the query vector
        #[arg(short, long)]
        file: PathBuf,

        /// Keywords to filter matches on
        #[arg(short, long, num_args = 1..)]
        metadata: Vec<String>,

        /// Number of matches to return
        #[arg(short = 'k', long = "top_k", default_value = "2", allow_hyphen_values = true)]
        top_k: String,

        /// Where to write the matches
        #[arg(short, long, default_value = "output.json")]
        output: PathBuf,
    },
}

impl Commands {
    /// The credential requirements of this command.
    pub fn operation(&self) -> preflight::Operation {
        match self {
            Commands::Save { .. } => preflight::Operation::Save,
            Commands::Search { .. } => preflight::Operation::Search,
        }
    }
}
