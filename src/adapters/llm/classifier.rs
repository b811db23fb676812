//! LLM-backed classifier.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::domain::errors::{DomainResult, PipelineError};
use crate::domain::models::{Category, Classification};
use crate::domain::ports::Classifier;

use super::client::{ChatClient, ChatMessage};

/// Lexical cues that force the sensitivity flag regardless of what the
/// model returns. Mirrors the mandatory-human-handling triggers:
/// grievances, legal exposure, disciplinary matters, personal records.
const SENSITIVE_CUES: &[&str] = &[
    "harass",
    "discriminat",
    "grievance",
    "lawsuit",
    "legal dispute",
    "legal action",
    "compliance violation",
    "terminat",
    "disciplinary",
    "salary negotiation",
    "personal records",
];

const CLASSIFY_SYSTEM_PROMPT: &str = "\
You are an HR query classifier. Analyze the employee's question and return a JSON response.

Categories: leave_policy, reimbursement, insurance, onboarding, payroll, performance, \
code_of_conduct, remote_work, benefits, it_policy, general_policy, unknown

Mark sensitive=true for:
- Grievances, harassment, discrimination complaints
- Legal disputes or compliance violations
- Personal salary negotiations
- Termination or disciplinary actions
- Queries requiring access to personal employee records

Return ONLY valid JSON:
{
  \"category\": \"<category>\",
  \"intent\": \"<one-line description of what the employee wants>\",
  \"sensitive\": <true/false>
}";

#[derive(Debug, Deserialize)]
struct ClassifyPayload {
    category: String,
    #[serde(default)]
    intent: String,
    #[serde(default)]
    sensitive: bool,
}

/// Classifier that prompts the chat model for strict JSON.
///
/// Runs at temperature 0 so identical input yields identical output.
pub struct LlmClassifier {
    client: ChatClient,
}

impl LlmClassifier {
    pub fn new(client: ChatClient) -> Self {
        Self { client }
    }
}

/// Strip a markdown code fence if the model wrapped its JSON in one.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
    else {
        return trimmed;
    };
    inner.trim_end_matches("```").trim()
}

/// Check the raw text against the lexical cue list.
fn has_sensitive_cue(text: &str) -> bool {
    let lowered = text.to_lowercase();
    SENSITIVE_CUES.iter().any(|cue| lowered.contains(cue))
}

#[async_trait]
impl Classifier for LlmClassifier {
    async fn classify(&self, text: &str) -> DomainResult<Classification> {
        let messages = [
            ChatMessage::system(CLASSIFY_SYSTEM_PROMPT),
            ChatMessage::user(format!("Query: {text}")),
        ];

        let content = self
            .client
            .complete(&messages, 0.0)
            .await
            .map_err(|e| PipelineError::ClassificationUnavailable(e.to_string()))?;

        let payload: ClassifyPayload = serde_json::from_str(strip_code_fence(&content))
            .map_err(|e| {
                PipelineError::ClassificationUnavailable(format!(
                    "unparseable classifier output: {e}"
                ))
            })?;

        let category = Category::from_str(&payload.category).unwrap_or(Category::Unknown);

        // The cue list overrides the model: sensitivity can be forced on
        // lexically, never forced off.
        let sensitive = payload.sensitive || has_sensitive_cue(text);

        debug!(
            category = category.as_str(),
            sensitive, "query classified"
        );

        Ok(Classification::new(category, payload.intent, sensitive))
    }
}
