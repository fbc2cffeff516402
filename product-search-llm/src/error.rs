//! Error types for LLM and embedding operations.

use thiserror::Error;

/// Errors that can occur during hosted-LLM or embedding operations.
#[derive(Error, Debug)]
pub enum LlmError {
    /// No API key is configured for the hosted model.
    #[error("No API key configured for the hosted model")]
    MissingApiKey,

    /// The HTTP request to the hosted model failed.
    #[error("Request error: {0}")]
    RequestError(String),

    /// The hosted model returned a non-success status.
    #[error("API error ({status}): {body}")]
    ApiError { status: u16, body: String },

    /// The model response could not be parsed.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// The embedding model failed to load or run.
    #[error("Embedding error: {0}")]
    EmbeddingError(String),
}

impl LlmError {
    /// Create a request error.
    pub fn request(msg: impl Into<String>) -> Self {
        Self::RequestError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create an embedding error.
    pub fn embedding(msg: impl Into<String>) -> Self {
        Self::EmbeddingError(msg.into())
    }
}
