//! Generative model adapters.

pub mod classifier;
pub mod client;
pub mod responder;

pub use classifier::LlmClassifier;
pub use client::{ChatClient, ChatError, ChatMessage};
pub use responder::LlmResponder;
