//! # Product Search Repository
//!
//! This crate provides traits and implementations for interacting with the
//! search engine. It includes definitions for errors, interfaces, and a
//! concrete implementation for OpenSearch.

pub mod config;
pub mod errors;
pub mod interfaces;
pub mod opensearch;

pub use config::EngineConfig;
pub use errors::SearchError;
pub use interfaces::SearchEngineClient;
pub use opensearch::OpenSearchClient;
