//! Port traits for external collaborators.
//!
//! The pipeline depends only on these abstractions; adapters provide
//! the live HTTP/SQL implementations and the mocks provide test
//! doubles.

pub mod analytics_sink;
pub mod classifier;
pub mod document_store;
pub mod responder;
pub mod retriever;

pub use analytics_sink::AnalyticsSink;
pub use classifier::Classifier;
pub use document_store::{DocumentStore, IngestReport};
pub use responder::Responder;
pub use retriever::Retriever;
