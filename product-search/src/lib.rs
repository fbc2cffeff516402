//! # Product Search
//!
//! Main library for the product search API service.
//!
//! This crate provides the entry point and configuration for running
//! the HTTP API over the search engine, embedding, and hosted-LLM
//! services.

pub mod config;

pub use config::Dependencies;

use thiserror::Error;

/// Errors that can occur during service initialization or execution.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Search engine error.
    #[error("Search error: {0}")]
    SearchError(#[from] product_search_repository::SearchError),

    /// Embedding or hosted-model error.
    #[error("LLM error: {0}")]
    LlmError(#[from] product_search_llm::LlmError),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ServiceError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
