//! HTTP client for an OpenAI-compatible chat completions API.
//!
//! Both the classifier and the responder adapters share this client;
//! the original deployment points it at Groq's endpoint.

use anyhow::{Context, Result};
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::domain::models::LlmConfig;

/// Errors from the chat completions endpoint.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("API returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Response contained no choices")]
    EmptyResponse,
}

/// One chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

/// Reusable chat completions client with connection pooling.
#[derive(Clone)]
pub struct ChatClient {
    http_client: ReqwestClient,
    base_url: String,
    model: String,
    api_key: String,
    max_tokens: u32,
}

impl ChatClient {
    /// Build a client from configuration, reading the API key from the
    /// configured environment variable (empty when unset; the backend
    /// rejects unauthenticated calls on its own).
    pub fn new(config: &LlmConfig, timeout: Duration) -> Result<Self> {
        let http_client = ReqwestClient::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(10)
            .build()
            .context("Failed to build HTTP client")?;

        let api_key = std::env::var(&config.api_key_env).unwrap_or_default();

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
            max_tokens: config.max_tokens,
        })
    }

    /// Send a completion request and return the first choice's content.
    pub async fn complete(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
    ) -> Result<String, ChatError> {
        let request = ChatRequest {
            model: &self.model,
            messages,
            max_tokens: self.max_tokens,
            temperature,
        };

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ChatError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error response".to_string());
            return Err(ChatError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| ChatError::Request(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(ChatError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_for(url: &str) -> ChatClient {
        let config = LlmConfig {
            base_url: url.to_string(),
            ..LlmConfig::default()
        };
        ChatClient::new(&config, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_complete_returns_first_choice() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"hello"}}]}"#)
            .create_async()
            .await;

        let client = client_for(&server.url());
        let content = client
            .complete(&[ChatMessage::user("hi")], 0.2)
            .await
            .unwrap();

        assert_eq!(content, "hello");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_complete_maps_api_errors() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(503)
            .with_body("overloaded")
            .create_async()
            .await;

        let client = client_for(&server.url());
        let err = client
            .complete(&[ChatMessage::user("hi")], 0.2)
            .await
            .unwrap_err();

        assert!(matches!(err, ChatError::Api { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_complete_rejects_empty_choices() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let client = client_for(&server.url());
        let err = client
            .complete(&[ChatMessage::user("hi")], 0.2)
            .await
            .unwrap_err();

        assert!(matches!(err, ChatError::EmptyResponse));
    }
}
