//! Prompt templates for the DocQA engine.
//!
//! This crate owns the five prompts the engine sends to its generation
//! collaborator: the precise single-passage answer, the single-document
//! synthesis answer, the question decomposition instruction, the per
//! sub-question answer, and the final multi-document synthesis. Templates
//! are Handlebars strings with built-in defaults; each can be overridden by
//! a YAML file in a prompt directory.

pub mod builder;
pub mod library;
pub mod templates;
pub mod types;

pub use builder::build_prompt;
pub use library::PromptLibrary;
pub use types::{BuiltPrompt, PromptDefinition};
