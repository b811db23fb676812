//! `hrdesk ingest` - upload a policy document.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;

use crate::adapters::vector::HttpDocumentStore;
use crate::domain::models::Category;
use crate::domain::ports::DocumentStore;
use crate::infrastructure::config::ConfigLoader;
use crate::services::{access, Capability};

use super::parse_role;

const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "docx", "doc", "txt", "md"];

#[derive(Debug, Args)]
pub struct IngestArgs {
    /// Document to ingest
    pub file: PathBuf,

    /// Declared document type (policy, handbook, form, ...)
    #[arg(long, default_value = "policy")]
    pub doc_type: String,

    /// Category tag applied to every indexed fragment
    #[arg(long)]
    pub category: Option<String>,

    /// Role claim
    #[arg(long, default_value = "employee")]
    pub role: String,
}

pub async fn execute(args: IngestArgs, json: bool) -> Result<()> {
    let role = parse_role(&args.role)?;
    access::authorize(role, Capability::DocumentManagement)?;

    let extension = args
        .file
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_lowercase();
    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        anyhow::bail!(
            "Unsupported file type '.{extension}'. Allowed: {}",
            ALLOWED_EXTENSIONS.join(", ")
        );
    }

    let category = match &args.category {
        Some(raw) => Some(Category::from_str(raw).with_context(|| {
            format!("Unknown category '{raw}'")
        })?),
        None => None,
    };

    let name = args
        .file
        .file_name()
        .and_then(|n| n.to_str())
        .context("File has no usable name")?
        .to_string();
    let bytes = std::fs::read(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    let config = ConfigLoader::load()?;
    let store = HttpDocumentStore::new(
        &config.retrieval,
        Duration::from_secs(config.timeouts.retrieve_secs),
    )?;

    let report = store
        .ingest(&name, &bytes, &args.doc_type, category)
        .await
        .context("Ingestion failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Document '{name}' ingested successfully");
        println!("  Document id: {}", report.document_id);
        println!("  Fragments:   {}", report.chunk_count);
    }

    Ok(())
}
