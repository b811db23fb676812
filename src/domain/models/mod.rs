//! Domain models: pure data types with no I/O.

pub mod answer;
pub mod category;
pub mod config;
pub mod context;
pub mod query;
pub mod resolution;
pub mod verdict;

pub use answer::GeneratedAnswer;
pub use category::{Category, Classification};
pub use config::{
    Config, DatabaseConfig, LlmConfig, LoggingConfig, PolicyConfig, RetrievalConfig,
    SinkRetryConfig, TimeoutsConfig,
};
pub use context::{RetrievedContext, RetrievedFragment};
pub use query::{Query, Role};
pub use resolution::{
    FailureAnnotation, FailureStage, ResolutionOutcome, ResolutionRecord, ResolutionStage,
    SinkStatus,
};
pub use verdict::{EscalationReason, EscalationVerdict};
