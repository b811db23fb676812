//! Vector search service adapters.

pub mod document_store;
pub mod retriever;

pub use document_store::HttpDocumentStore;
pub use retriever::HttpRetriever;
