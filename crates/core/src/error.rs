//! Error types for the DocQA CLI.
//!
//! This module defines a unified error enum covering every error category in
//! the application: configuration, I/O, retrieval, generation, decomposition,
//! prompt, and serialization errors.

use thiserror::Error;

/// Unified error type for the DocQA CLI.
///
/// All fallible functions in the application return `Result<T, QaError>`.
/// We never panic; errors must be represented and propagated.
///
/// Note that a request-level answer never fails with these: the engine
/// recovers `RetrievalUnavailable`, `Decomposition`, and `Generation` into
/// degraded answers before the caller sees them. They surface here only from
/// the collaborator seams themselves.
#[derive(Error, Debug)]
pub enum QaError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The vector index is empty or the search collaborator cannot be reached
    #[error("Retrieval unavailable: {0}")]
    RetrievalUnavailable(String),

    /// Generation collaborator errors (after the retry budget is spent)
    #[error("Generation error: {0}")]
    Generation(String),

    /// Question decomposition produced malformed output
    #[error("Decomposition error: {0}")]
    Decomposition(String),

    /// Prompt template errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for QaError {
    fn from(err: serde_json::Error) -> Self {
        QaError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for QaError {
    fn from(err: serde_yaml::Error) -> Self {
        QaError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with QaError.
pub type QaResult<T> = Result<T, QaError>;
