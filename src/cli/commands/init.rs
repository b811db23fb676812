//! `hrdesk init` - write the default configuration.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use crate::domain::models::Config;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Overwrite an existing configuration file
    #[arg(long)]
    pub force: bool,
}

pub async fn execute(args: InitArgs, json: bool) -> Result<()> {
    let dir = Path::new(".hrdesk");
    let path = dir.join("config.yaml");

    if path.exists() && !args.force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite",
            path.display()
        );
    }

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    let yaml = serde_yaml::to_string(&Config::default())
        .context("Failed to serialize default configuration")?;
    std::fs::write(&path, yaml)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    if json {
        println!(
            "{}",
            serde_json::json!({ "status": "created", "path": path.display().to_string() })
        );
    } else {
        println!("Wrote default configuration to {}", path.display());
        println!("Override settings in .hrdesk/local.yaml or via HRDESK_* environment variables.");
    }

    Ok(())
}
