//! Immutable service configuration.
//!
//! Constructed once at startup by the loader and passed explicitly into
//! the policy and assessor so decision code stays pure and independently
//! testable.

use serde::{Deserialize, Serialize};

use super::category::Category;

/// Main configuration structure for hrdesk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Escalation and confidence policy
    #[serde(default)]
    pub policy: PolicyConfig,

    /// Generative model endpoint
    #[serde(default)]
    pub llm: LlmConfig,

    /// Vector search service endpoint
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Per-stage timeouts for external calls
    #[serde(default)]
    pub timeouts: TimeoutsConfig,

    /// Bounded backoff for analytics sink writes
    #[serde(default)]
    pub sink_retry: SinkRetryConfig,

    /// Analytics database
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Escalation and confidence policy knobs.
///
/// `no_context_ceiling` must stay at or below
/// `escalation_threshold - confidence_margin`; the loader enforces this.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PolicyConfig {
    /// Confidence below this escalates with reason `low_confidence`
    #[serde(default = "default_escalation_threshold")]
    pub escalation_threshold: f64,

    /// Safety margin between the no-context ceiling and the threshold
    #[serde(default = "default_confidence_margin")]
    pub confidence_margin: f64,

    /// Confidence assigned when no supporting context exists
    #[serde(default = "default_no_context_ceiling")]
    pub no_context_ceiling: f64,

    /// Weight of max retrieval relevance in the confidence blend
    #[serde(default = "default_relevance_weight")]
    pub relevance_weight: f64,

    /// Categories that always escalate as multi-step processes
    #[serde(default = "default_always_complex")]
    pub always_complex: Vec<Category>,
}

fn default_escalation_threshold() -> f64 {
    0.6
}

fn default_confidence_margin() -> f64 {
    0.1
}

fn default_no_context_ceiling() -> f64 {
    0.2
}

fn default_relevance_weight() -> f64 {
    0.6
}

fn default_always_complex() -> Vec<Category> {
    vec![Category::Onboarding]
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            escalation_threshold: default_escalation_threshold(),
            confidence_margin: default_confidence_margin(),
            no_context_ceiling: default_no_context_ceiling(),
            relevance_weight: default_relevance_weight(),
            always_complex: default_always_complex(),
        }
    }
}

/// Generative model endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LlmConfig {
    /// Base URL of an OpenAI-compatible chat completions API
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,

    /// Model identifier
    #[serde(default = "default_llm_model")]
    pub model: String,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature for answer generation
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_llm_base_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_llm_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}

fn default_api_key_env() -> String {
    "HRDESK_LLM_API_KEY".to_string()
}

const fn default_max_tokens() -> u32 {
    4096
}

const fn default_temperature() -> f32 {
    0.2
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_llm_base_url(),
            model: default_llm_model(),
            api_key_env: default_api_key_env(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

/// Vector search service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RetrievalConfig {
    /// Base URL of the vector search service
    #[serde(default = "default_retrieval_base_url")]
    pub base_url: String,

    /// Collection holding the ingested policy documents
    #[serde(default = "default_collection")]
    pub collection: String,

    /// Fragments requested per query
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Fragments actually handed to the responder prompt
    #[serde(default = "default_max_context_fragments")]
    pub max_context_fragments: usize,
}

fn default_retrieval_base_url() -> String {
    "http://localhost:8100".to_string()
}

fn default_collection() -> String {
    "hr_policies".to_string()
}

const fn default_top_k() -> usize {
    6
}

const fn default_max_context_fragments() -> usize {
    4
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            base_url: default_retrieval_base_url(),
            collection: default_collection(),
            top_k: default_top_k(),
            max_context_fragments: default_max_context_fragments(),
        }
    }
}

/// Independent timeout per external-call stage.
///
/// A timeout is handled exactly like the corresponding backend
/// unavailability.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TimeoutsConfig {
    #[serde(default = "default_classify_secs")]
    pub classify_secs: u64,

    #[serde(default = "default_retrieve_secs")]
    pub retrieve_secs: u64,

    #[serde(default = "default_generate_secs")]
    pub generate_secs: u64,
}

const fn default_classify_secs() -> u64 {
    15
}

const fn default_retrieve_secs() -> u64 {
    10
}

const fn default_generate_secs() -> u64 {
    30
}

impl Default for TimeoutsConfig {
    fn default() -> Self {
        Self {
            classify_secs: default_classify_secs(),
            retrieve_secs: default_retrieve_secs(),
            generate_secs: default_generate_secs(),
        }
    }
}

/// Bounded backoff policy for analytics sink writes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SinkRetryConfig {
    #[serde(default = "default_sink_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_sink_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    #[serde(default = "default_sink_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

const fn default_sink_max_retries() -> u32 {
    3
}

const fn default_sink_initial_backoff_ms() -> u64 {
    100
}

const fn default_sink_max_backoff_ms() -> u64 {
    2_000
}

impl Default for SinkRetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_sink_max_retries(),
            initial_backoff_ms: default_sink_initial_backoff_ms(),
            max_backoff_ms: default_sink_max_backoff_ms(),
        }
    }
}

/// Analytics database configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DatabaseConfig {
    /// Path to the SQLite database file
    #[serde(default = "default_database_path")]
    pub path: String,

    /// Maximum number of pooled connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_database_path() -> String {
    ".hrdesk/analytics.db".to_string()
}

const fn default_max_connections() -> u32 {
    10
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            max_connections: default_max_connections(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}
