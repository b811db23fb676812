//! Configuration loading and validation.

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::Config;

/// Configuration error types.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid escalation_threshold: {0}. Must be within (0, 1]")]
    InvalidThreshold(f64),

    #[error("Invalid confidence_margin: {0}. Must be within [0, 1)")]
    InvalidMargin(f64),

    #[error(
        "Invalid no_context_ceiling: {0}. Must not exceed escalation_threshold - confidence_margin ({1})"
    )]
    InvalidCeiling(f64, f64),

    #[error("Invalid relevance_weight: {0}. Must be within [0, 1]")]
    InvalidRelevanceWeight(f64),

    #[error("Invalid timeout: {0} cannot be 0 seconds")]
    InvalidTimeout(&'static str),

    #[error(
        "Invalid backoff configuration: initial_backoff_ms ({0}) must not exceed max_backoff_ms ({1})"
    )]
    InvalidBackoff(u64, u64),

    #[error("Database path cannot be empty")]
    EmptyDatabasePath,

    #[error("Invalid max_connections: {0}. Must be at least 1")]
    InvalidMaxConnections(u32),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("LLM base_url cannot be empty")]
    EmptyLlmBaseUrl,

    #[error("Retrieval base_url cannot be empty")]
    EmptyRetrievalBaseUrl,

    #[error("Invalid top_k: {0}. Must be at least 1")]
    InvalidTopK(usize),
}

/// Configuration loader with hierarchical merging.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging.
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .hrdesk/config.yaml (project config, created by init)
    /// 3. .hrdesk/local.yaml (local overrides, optional)
    /// 4. Environment variables (HRDESK_* prefix, highest priority)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".hrdesk/config.yaml"))
            .merge(Yaml::file(".hrdesk/local.yaml"))
            .merge(Env::prefixed("HRDESK_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading.
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let policy = &config.policy;

        if policy.escalation_threshold <= 0.0 || policy.escalation_threshold > 1.0 {
            return Err(ConfigError::InvalidThreshold(policy.escalation_threshold));
        }

        if policy.confidence_margin < 0.0 || policy.confidence_margin >= 1.0 {
            return Err(ConfigError::InvalidMargin(policy.confidence_margin));
        }

        // The no-context ceiling must sit below the escalation threshold
        // by at least the margin, so evidence-free answers always route
        // to the policy-gap/low-confidence paths.
        let ceiling_bound = policy.escalation_threshold - policy.confidence_margin;
        if policy.no_context_ceiling < 0.0 || policy.no_context_ceiling > ceiling_bound {
            return Err(ConfigError::InvalidCeiling(
                policy.no_context_ceiling,
                ceiling_bound,
            ));
        }

        if policy.relevance_weight < 0.0 || policy.relevance_weight > 1.0 {
            return Err(ConfigError::InvalidRelevanceWeight(policy.relevance_weight));
        }

        if config.timeouts.classify_secs == 0 {
            return Err(ConfigError::InvalidTimeout("classify_secs"));
        }
        if config.timeouts.retrieve_secs == 0 {
            return Err(ConfigError::InvalidTimeout("retrieve_secs"));
        }
        if config.timeouts.generate_secs == 0 {
            return Err(ConfigError::InvalidTimeout("generate_secs"));
        }

        if config.sink_retry.initial_backoff_ms > config.sink_retry.max_backoff_ms {
            return Err(ConfigError::InvalidBackoff(
                config.sink_retry.initial_backoff_ms,
                config.sink_retry.max_backoff_ms,
            ));
        }

        if config.database.path.is_empty() {
            return Err(ConfigError::EmptyDatabasePath);
        }
        if config.database.max_connections == 0 {
            return Err(ConfigError::InvalidMaxConnections(
                config.database.max_connections,
            ));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        if config.llm.base_url.is_empty() {
            return Err(ConfigError::EmptyLlmBaseUrl);
        }
        if config.retrieval.base_url.is_empty() {
            return Err(ConfigError::EmptyRetrievalBaseUrl);
        }
        if config.retrieval.top_k == 0 {
            return Err(ConfigError::InvalidTopK(config.retrieval.top_k));
        }

        Ok(())
    }
}
