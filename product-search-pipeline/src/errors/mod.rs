//! Error types for the matching pipeline.

use product_search_repository::SearchError;
use thiserror::Error;

/// Errors that can occur in the matching pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Error from the embedding stage.
    #[error("Embedding error: {0}")]
    EmbeddingError(String),

    /// Error from the retrieval stage.
    #[error("Search error: {0}")]
    SearchError(#[from] SearchError),

    /// Error from the scoring stage.
    #[error("Scoring error: {0}")]
    ScoringError(String),

    /// A blocking task failed to complete.
    #[error("Task error: {0}")]
    TaskError(String),
}

impl PipelineError {
    /// Create an embedding error.
    pub fn embedding(msg: impl Into<String>) -> Self {
        Self::EmbeddingError(msg.into())
    }

    /// Create a scoring error.
    pub fn scoring(msg: impl Into<String>) -> Self {
        Self::ScoringError(msg.into())
    }

    /// Create a task error.
    pub fn task(msg: impl Into<String>) -> Self {
        Self::TaskError(msg.into())
    }
}
