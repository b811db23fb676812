//! Hrdesk - HR Query Resolution Service
//!
//! Hrdesk answers employee HR questions by combining document retrieval
//! with a generative model and decides, per query, whether the answer is
//! safe to return or must be routed to a human reviewer. Every query
//! produces exactly one immutable resolution record for the analytics
//! trail.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture
//! principles:
//!
//! - **Domain Layer** (`domain`): Pure data types, errors, and the port
//!   traits for external collaborators
//! - **Service Layer** (`services`): Pure policy code (confidence,
//!   escalation, access control) and the pipeline orchestrator
//! - **Adapters** (`adapters`): Live HTTP/SQL implementations of the
//!   ports, plus call-counting mocks for tests
//! - **Infrastructure** (`infrastructure`): Configuration loading and
//!   retry plumbing
//! - **CLI Layer** (`cli`): Command-line interface and the RBAC gate
//!
//! # Example
//!
//! ```ignore
//! use hrdesk::services::ResolutionPipeline;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Wire adapters into a pipeline and resolve queries
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{DomainResult, PipelineError};
pub use domain::models::{
    Category, Classification, Config, EscalationReason, EscalationVerdict, GeneratedAnswer,
    Query, ResolutionOutcome, ResolutionRecord, ResolutionStage, RetrievedContext,
    RetrievedFragment, Role, SinkStatus,
};
pub use domain::ports::{AnalyticsSink, Classifier, DocumentStore, Responder, Retriever};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{authorize, Capability, ConfidenceAssessor, EscalationPolicy, ResolutionPipeline};
