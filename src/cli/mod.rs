//! Command-line interface.
//!
//! The CLI is the caller boundary: role claims arrive as flags and the
//! capability gate runs here, before anything touches the pipeline.

pub mod commands;

use clap::{Parser, Subcommand};

/// HR query resolution service.
#[derive(Debug, Parser)]
#[command(name = "hrdesk", version, about)]
pub struct Cli {
    /// Emit machine-readable JSON instead of human-readable output
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Write the default configuration to .hrdesk/config.yaml
    Init(commands::init::InitArgs),
    /// Submit an employee query through the resolution pipeline
    Query(commands::query::QueryArgs),
    /// Ingest a policy document into the retrieval index
    Ingest(commands::ingest::IngestArgs),
    /// Show aggregated resolution analytics
    Analytics(commands::analytics::AnalyticsArgs),
}

/// Report a fatal error and exit non-zero.
pub fn handle_error(err: anyhow::Error, json: bool) {
    if json {
        let payload = serde_json::json!({ "error": format!("{err:#}") });
        eprintln!("{payload}");
    } else {
        eprintln!("Error: {err:#}");
    }
    std::process::exit(1);
}
