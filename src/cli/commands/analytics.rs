//! `hrdesk analytics` - aggregated resolution statistics.

use anyhow::{Context, Result};
use clap::Args;
use comfy_table::{presets::UTF8_FULL, Table};

use crate::adapters::sqlite::{self, AnalyticsSummary, SqliteAnalyticsSink};
use crate::infrastructure::config::ConfigLoader;
use crate::services::{access, Capability};

use super::parse_role;

#[derive(Debug, Args)]
pub struct AnalyticsArgs {
    /// Role claim
    #[arg(long, default_value = "employee")]
    pub role: String,
}

pub async fn execute(args: AnalyticsArgs, json: bool) -> Result<()> {
    let role = parse_role(&args.role)?;
    access::authorize(role, Capability::AnalyticsView)?;

    let config = ConfigLoader::load()?;
    let pool = sqlite::connect(&config.database).await?;
    let sink = SqliteAnalyticsSink::new(pool);

    let summary = sink
        .summary()
        .await
        .context("Failed to aggregate analytics")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }

    Ok(())
}

fn print_summary(summary: &AnalyticsSummary) {
    println!("Resolution analytics");
    println!("  Total queries:     {}", summary.total_queries);
    println!("  Escalated:         {}", summary.escalated_queries);
    println!("  Escalation rate:   {:.1}%", summary.escalation_rate * 100.0);
    println!("  Avg confidence:    {:.3}", summary.avg_confidence);
    println!("  Avg response time: {:.0} ms", summary.avg_response_time_ms);

    if summary.category_distribution.is_empty() {
        return;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Category", "Queries"]);
    for (category, count) in &summary.category_distribution {
        table.add_row(vec![category.clone(), count.to_string()]);
    }
    println!("\n{table}");
}
