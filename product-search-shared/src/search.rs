//! Search query and result types.

use serde::{Deserialize, Serialize};

use crate::Product;

/// Parameters for a text search against the product index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// The raw query text.
    pub query: String,
    /// Maximum number of results to return.
    pub size: usize,
}

impl SearchQuery {
    /// Default result count for search endpoints.
    pub const DEFAULT_SIZE: usize = 10;

    /// Create a query with the default result size.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            size: Self::DEFAULT_SIZE,
        }
    }

    /// Create a query with an explicit result size.
    pub fn with_size(query: impl Into<String>, size: usize) -> Self {
        Self {
            query: query.into(),
            size,
        }
    }
}

/// A product annotated with a query-time relevance score.
///
/// The score is in the 0-100 range and exists only in responses; it is never
/// written back to the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(flatten)]
    pub product: Product,
    /// Relevance score in [0, 100], attached by the reranker.
    pub relevance_score: f64,
}

/// Where an autocomplete suggestion came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    /// From the completion suggester.
    Product,
    /// From a prefix match on indexed product names.
    SearchResult,
}

/// A single autocomplete suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Suggested text.
    pub text: String,
    /// Suggestion source.
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    /// Engine score for the suggestion.
    pub score: f64,
}
