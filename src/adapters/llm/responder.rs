//! LLM-backed responder.

use async_trait::async_trait;
use tracing::debug;

use crate::domain::errors::{DomainResult, PipelineError};
use crate::domain::models::{GeneratedAnswer, Query, RetrievedContext};
use crate::domain::ports::Responder;

use super::client::{ChatClient, ChatMessage};

/// Responder that answers from retrieved policy fragments.
///
/// With context, the model is instructed to treat the fragments as its
/// only source of truth. Without context it produces a general answer
/// that directs the employee to HR; the confidence ceiling and the
/// policy-gap rule keep that answer from being returned as
/// authoritative. The backend emits no quality signal, so
/// `self_quality` stays absent.
pub struct LlmResponder {
    client: ChatClient,
    temperature: f32,
    max_context_fragments: usize,
}

impl LlmResponder {
    pub fn new(client: ChatClient, temperature: f32, max_context_fragments: usize) -> Self {
        Self {
            client,
            temperature,
            max_context_fragments,
        }
    }

    fn grounded_prompt(&self, query: &Query, context: &RetrievedContext) -> String {
        let blocks: Vec<String> = context
            .fragments
            .iter()
            .take(self.max_context_fragments)
            .enumerate()
            .map(|(i, fragment)| {
                format!(
                    "[Source {}: {} | Relevance: {:.3}]\n{}",
                    i + 1,
                    fragment.source,
                    fragment.relevance,
                    fragment.content
                )
            })
            .collect();

        format!(
            "You are an expert HR assistant. Answer the employee's question using ONLY \
             the provided policy documents as your source of truth.\n\n\
             Employee Context:\n- Role: {}\n- Department: {}\n\n\
             Guidelines:\n\
             1. Be clear, concise, and empathetic\n\
             2. Cite specific policy sections when possible\n\
             3. Use bullet points for multi-step processes\n\
             4. If information is partial, acknowledge what you know and what needs clarification\n\
             5. Always recommend consulting HR for personal matters\n\n\
             Policy Documents Context:\n{}",
            query.role.as_str(),
            query.department,
            blocks.join("\n\n---\n\n"),
        )
    }

    fn ungrounded_prompt(query: &Query) -> String {
        format!(
            "You are an expert HR assistant. No specific policy documents were found for \
             this query. Provide a general, helpful response about common HR practices but \
             clearly state that:\n\
             1. You couldn't find specific company policy for this topic\n\
             2. The employee should contact HR directly for authoritative information\n\n\
             Employee Context: Role: {}, Department: {}",
            query.role.as_str(),
            query.department,
        )
    }
}

#[async_trait]
impl Responder for LlmResponder {
    async fn respond(
        &self,
        query: &Query,
        context: &RetrievedContext,
    ) -> DomainResult<GeneratedAnswer> {
        let system_prompt = if context.is_empty() {
            Self::ungrounded_prompt(query)
        } else {
            self.grounded_prompt(query, context)
        };

        let messages = [
            ChatMessage::system(system_prompt),
            ChatMessage::user(query.text.clone()),
        ];

        let text = self
            .client
            .complete(&messages, self.temperature)
            .await
            .map_err(|e| PipelineError::GenerationUnavailable(e.to_string()))?;

        debug!(
            fragments = context.len(),
            chars = text.len(),
            "answer generated"
        );

        Ok(GeneratedAnswer::new(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{LlmConfig, RetrievedFragment, Role};
    use std::time::Duration;

    fn responder_for(url: &str) -> LlmResponder {
        let config = LlmConfig {
            base_url: url.to_string(),
            ..Default::default()
        };
        let client = ChatClient::new(&config, Duration::from_secs(5)).unwrap();
        LlmResponder::new(client, 0.2, 4)
    }

    #[test]
    fn test_grounded_prompt_caps_fragments() {
        let responder = responder_for("http://localhost");
        let query = Query::new("question", "EMP1").with_role(Role::Employee);
        let context = RetrievedContext::new(
            (0..6)
                .map(|i| RetrievedFragment::new("text", format!("doc{i}.md"), 0.9))
                .collect(),
        );

        let prompt = responder.grounded_prompt(&query, &context);
        assert!(prompt.contains("[Source 4:"));
        assert!(!prompt.contains("[Source 5:"));
    }

    #[tokio::test]
    async fn test_respond_success() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"choices":[{"message":{"role":"assistant","content":"You are entitled to 12 sick days."}}]}"#,
            )
            .create_async()
            .await;

        let responder = responder_for(&server.url());
        let query = Query::new("How many sick leaves do I get?", "EMP1");
        let context = RetrievedContext::new(vec![RetrievedFragment::new(
            "Employees receive 12 sick days per year.",
            "leave_policy.md",
            0.9,
        )]);

        let answer = responder.respond(&query, &context).await.unwrap();
        assert_eq!(answer.text, "You are entitled to 12 sick days.");
        assert!(answer.self_quality.is_none());
    }

    #[tokio::test]
    async fn test_respond_maps_backend_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let responder = responder_for(&server.url());
        let query = Query::new("question", "EMP1");

        let err = responder
            .respond(&query, &RetrievedContext::empty())
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::GenerationUnavailable(_)));
    }
}
