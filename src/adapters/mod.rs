//! Adapters implementing the domain ports.

pub mod llm;
pub mod mock;
pub mod sqlite;
pub mod vector;

pub use llm::{ChatClient, LlmClassifier, LlmResponder};
pub use mock::{MemorySink, MockClassifier, MockResponder, MockRetriever};
pub use sqlite::SqliteAnalyticsSink;
pub use vector::{HttpDocumentStore, HttpRetriever};
