//! Error types for the Yellow workspace.
//!
//! A single enum covers every failure category. Retrieval and generation
//! failures are fatal to a request and are propagated unchanged to the caller.

use thiserror::Error;

/// Unified error type.
///
/// An empty search result is not an error; it is a normal branch of the
/// query flow and never produces a variant of this enum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The document search service failed
    #[error("Retrieval error: {0}")]
    Retrieval(String),

    /// The chat/completion service failed
    #[error("Generation error: {0}")]
    Generation(String),

    /// Prompt template errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
