//! Search engine client trait definition.
//!
//! This module defines the abstract interface for search engine operations,
//! allowing for different backend implementations (OpenSearch, fakes for
//! testing, etc.).

use async_trait::async_trait;

use crate::errors::SearchError;
use product_search_shared::{Product, SearchQuery, Suggestion};

/// Abstract interface for search engine operations.
///
/// This trait defines all the operations required to interact with the
/// product index. Implementations can be swapped for different backends
/// (OpenSearch, mock, etc.) so that calling logic never needs a live
/// engine during tests.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` to allow use across async tasks.
///
/// # Error Handling
///
/// All methods return `Result<T, SearchError>` for consistent error handling.
/// None of the read/write calls retry internally; retries exist only around
/// process startup.
#[async_trait]
pub trait SearchEngineClient: Send + Sync {
    /// Execute a standard keyword search against the product index.
    ///
    /// Results are ordered by the engine's relevance score; the hit sources
    /// are returned without query-time scoring attached.
    ///
    /// # Arguments
    ///
    /// * `query` - The search query (text and result size)
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<Product>)` - The matching products in engine order
    /// * `Err(SearchError)` - If the search fails
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Product>, SearchError>;

    /// Execute a latency-optimized search with an aggressive server-side
    /// timeout.
    ///
    /// On timeout or failure the implementation falls back to a reduced
    /// single-field query with an even tighter timeout. The fallback may
    /// return fewer or worse results; this call prioritizes latency over
    /// recall and must not raise just because the primary query timed out.
    async fn instant_search(&self, query: &SearchQuery) -> Result<Vec<Product>, SearchError>;

    /// Look up autocomplete suggestions for a prefix.
    ///
    /// Suggestions are merged from the completion suggester (first) and
    /// prefix-matching product names (second), deduplicated
    /// case-insensitively, and truncated to the requested size.
    async fn suggest(&self, prefix: &str, size: usize) -> Result<Vec<Suggestion>, SearchError>;

    /// Score every document by cosine similarity against the given
    /// embedding and return the closest products.
    ///
    /// This is a brute-force scan over the whole index; there is no
    /// approximate-nearest-neighbor structure behind it.
    async fn vector_search(
        &self,
        embedding: &[f32],
        size: usize,
    ) -> Result<Vec<Product>, SearchError>;

    /// Index a single product.
    ///
    /// The document is enriched with completion-suggester fields, and the
    /// embedding is attached when provided. An embedding whose length does
    /// not match the mapping's declared dimension makes the write fail.
    async fn index_product(
        &self,
        product: &Product,
        embedding: Option<&[f32]>,
    ) -> Result<(), SearchError>;

    /// Index multiple products in a single bulk operation.
    ///
    /// The same per-document transform as [`index_product`] is applied to
    /// every element. Partial failure within the batch is reported only as
    /// an aggregate error, not per document.
    ///
    /// [`index_product`]: SearchEngineClient::index_product
    async fn bulk_index(
        &self,
        products: &[Product],
        embeddings: Option<&[Vec<f32>]>,
    ) -> Result<(), SearchError>;

    /// Ensure the product index exists with proper mappings.
    ///
    /// If the index doesn't exist, it is created with the fixed settings
    /// and mappings. Calling this when the index already exists is a no-op.
    ///
    /// This should be called during application startup.
    async fn ensure_index(&self) -> Result<(), SearchError>;

    /// Delete and recreate the product index unconditionally.
    ///
    /// Destructive: all indexed documents are lost and there is no backup.
    /// Recreating twice in succession yields an index with the same mapping
    /// both times.
    async fn recreate_index(&self) -> Result<(), SearchError>;

    /// Check if the search engine is healthy and reachable.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - If the search engine is healthy
    /// * `Ok(false)` - If the search engine is unhealthy
    /// * `Err(SearchError)` - If the health check fails to execute
    async fn health_check(&self) -> Result<bool, SearchError>;
}
