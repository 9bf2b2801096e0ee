//! Generation collaborator for the DocQA engine.
//!
//! This crate provides a provider-agnostic abstraction for whole-completion
//! calls against an LLM. The engine treats the model as a black box: it sends
//! a prompt built from retrieved passages and expects free text back.

pub mod client;
pub mod factory;
pub mod providers;

// Re-export commonly used types
pub use client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
pub use factory::create_client;
pub use providers::OllamaClient;
