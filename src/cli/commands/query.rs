//! `hrdesk query` - run one query through the resolution pipeline.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;

use crate::adapters::llm::{ChatClient, LlmClassifier, LlmResponder};
use crate::adapters::sqlite::{self, SqliteAnalyticsSink};
use crate::adapters::vector::HttpRetriever;
use crate::domain::models::{Query, ResolutionOutcome, SinkStatus};
use crate::infrastructure::config::ConfigLoader;
use crate::services::{access, Capability, ResolutionPipeline};

use super::parse_role;

#[derive(Debug, Args)]
pub struct QueryArgs {
    /// The question to resolve
    #[arg(long)]
    pub text: String,

    /// Requester identity
    #[arg(long, default_value = "EMP001")]
    pub employee_id: String,

    /// Requester department
    #[arg(long, default_value = "General")]
    pub department: String,

    /// Role claim
    #[arg(long, default_value = "employee")]
    pub role: String,
}

pub async fn execute(args: QueryArgs, json: bool) -> Result<()> {
    let role = parse_role(&args.role)?;
    access::authorize(role, Capability::QuerySubmission)?;

    let config = ConfigLoader::load()?;

    let classify_client = ChatClient::new(
        &config.llm,
        Duration::from_secs(config.timeouts.classify_secs),
    )?;
    let respond_client = ChatClient::new(
        &config.llm,
        Duration::from_secs(config.timeouts.generate_secs),
    )?;

    let classifier = Arc::new(LlmClassifier::new(classify_client));
    let retriever = Arc::new(HttpRetriever::new(
        &config.retrieval,
        Duration::from_secs(config.timeouts.retrieve_secs),
    )?);
    let responder = Arc::new(LlmResponder::new(
        respond_client,
        config.llm.temperature,
        config.retrieval.max_context_fragments,
    ));

    let pool = sqlite::connect(&config.database).await?;
    let sink = Arc::new(SqliteAnalyticsSink::new(pool));

    let pipeline = ResolutionPipeline::new(classifier, retriever, responder, sink, &config);

    let query = Query::new(args.text, args.employee_id)
        .with_department(args.department)
        .with_role(role);

    let outcome = pipeline
        .resolve(query)
        .await
        .context("Failed to resolve query")?;

    print_outcome(&outcome, json);
    Ok(())
}

fn print_outcome(outcome: &ResolutionOutcome, json: bool) {
    let record = &outcome.record;

    if json {
        let payload = serde_json::json!({
            "session_id": record.id,
            "query": record.query.text,
            "response": record.response_text,
            "category": record.category.as_str(),
            "confidence": record.confidence,
            "escalated": record.verdict.escalated,
            "escalation_reason": record.verdict.reason.as_str(),
            "sources": record.sources,
            "response_time_ms": record.response_time_ms,
            "logged": outcome.sink.is_logged(),
        });
        println!("{}", serde_json::to_string_pretty(&payload).unwrap_or_default());
    } else {
        if let Some(response) = &record.response_text {
            println!("{response}");
        } else {
            println!("(no response generated)");
        }
        println!();
        println!("  Session:    {}", record.id);
        println!("  Category:   {}", record.category.as_str());
        println!("  Confidence: {:.3}", record.confidence);
        println!(
            "  Escalated:  {} ({})",
            record.verdict.escalated,
            record.verdict.reason.as_str()
        );
        if !record.sources.is_empty() {
            println!("  Sources:    {}", record.sources.join(", "));
        }
        println!("  Time:       {} ms", record.response_time_ms);
    }

    if let SinkStatus::Failed(detail) = &outcome.sink {
        eprintln!("Warning: analytics logging failed ({detail}). The response above is unaffected.");
    }
}
