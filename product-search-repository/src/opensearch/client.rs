//! OpenSearch client implementation.
//!
//! This module provides the concrete implementation of `SearchEngineClient`
//! using the OpenSearch Rust client.

use async_trait::async_trait;
use opensearch::{
    cluster::ClusterHealthParts,
    http::request::JsonBody,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    indices::{IndicesCreateParts, IndicesDeleteParts, IndicesExistsParts},
    BulkParts, IndexParts, OpenSearch, SearchParts,
};
use serde_json::Value;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::config::EngineConfig;
use crate::errors::SearchError;
use crate::interfaces::SearchEngineClient;
use crate::opensearch::document::ProductDocument;
use crate::opensearch::index_config::{get_index_settings, INDEX_NAME};
use crate::opensearch::queries;
use product_search_shared::{Product, SearchQuery, Suggestion, SuggestionKind};

/// OpenSearch client implementation.
///
/// Provides full-text, instant, autocomplete, and vector search over the
/// product index using OpenSearch as the backend.
///
/// # Example
///
/// ```ignore
/// use product_search_repository::{EngineConfig, OpenSearchClient};
/// use product_search_shared::SearchQuery;
///
/// let config = EngineConfig::from_url("http://localhost:9200");
/// let client = OpenSearchClient::new(&config)?;
///
/// client.ensure_index().await?;
/// let hits = client.search(&SearchQuery::new("iphone")).await?;
/// ```
pub struct OpenSearchClient {
    client: OpenSearch,
}

impl OpenSearchClient {
    /// Create a new OpenSearch client for the configured endpoint.
    ///
    /// # Arguments
    ///
    /// * `config` - Connection configuration with a normalized endpoint URL
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchClient)` - A new client instance
    /// * `Err(SearchError)` - If connection setup fails
    pub fn new(config: &EngineConfig) -> Result<Self, SearchError> {
        let parsed_url = Url::parse(&config.endpoint)
            .map_err(|e| SearchError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| SearchError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(endpoint = %config.endpoint, index = INDEX_NAME, "Created OpenSearch client");

        Ok(Self { client })
    }

    /// Execute a search body against the product index and parse the hits.
    async fn run_search(&self, body: Value) -> Result<Vec<Product>, SearchError> {
        let response = self
            .client
            .search(SearchParts::Index(&[INDEX_NAME]))
            .body(body)
            .send()
            .await
            .map_err(|e| SearchError::query(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(SearchError::query(format!(
                "Search failed with status {}: {}",
                status, error_body
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchError::parse(e.to_string()))?;

        Ok(Self::parse_hits(&body))
    }

    /// Parse all hits of a search response into products.
    fn parse_hits(body: &Value) -> Vec<Product> {
        body["hits"]["hits"]
            .as_array()
            .map(|hits| hits.iter().filter_map(Self::parse_hit).collect())
            .unwrap_or_default()
    }

    /// Parse a single hit's `_source` into a product.
    ///
    /// Hits whose source does not deserialize (e.g. documents written with
    /// an older mapping) are skipped rather than failing the whole search.
    fn parse_hit(hit: &Value) -> Option<Product> {
        serde_json::from_value(hit["_source"].clone()).ok()
    }

    /// Parse the autocomplete response into suggestions.
    ///
    /// Completion-suggester options come first, then names from the
    /// phrase-prefix hits that actually start with the prefix. The result
    /// is not yet deduplicated.
    fn parse_suggest_response(body: &Value, prefix: &str, size: usize) -> Vec<Suggestion> {
        let mut suggestions = Vec::new();

        if let Some(entries) = body["suggest"]["product_suggestions"].as_array() {
            for entry in entries {
                if let Some(options) = entry["options"].as_array() {
                    for option in options.iter().take(size) {
                        if let Some(text) = option["text"].as_str() {
                            suggestions.push(Suggestion {
                                text: text.to_string(),
                                kind: SuggestionKind::Product,
                                score: option["_score"].as_f64().unwrap_or(100.0),
                            });
                        }
                    }
                }
            }
        }

        // Add search hits only if the suggester did not fill the budget
        if suggestions.len() < size {
            if let Some(hits) = body["hits"]["hits"].as_array() {
                let prefix_lower = prefix.to_lowercase();
                for hit in hits {
                    if suggestions.len() >= size {
                        break;
                    }
                    let Some(name) = hit["_source"]["name"].as_str() else {
                        continue;
                    };
                    if !name.is_empty() && name.to_lowercase().starts_with(&prefix_lower) {
                        suggestions.push(Suggestion {
                            text: name.to_string(),
                            kind: SuggestionKind::SearchResult,
                            score: hit["_score"].as_f64().unwrap_or(50.0),
                        });
                    }
                }
            }
        }

        suggestions
    }

    /// Deduplicate suggestions case-insensitively by text, preserving
    /// order, and truncate to `size`.
    fn dedupe_suggestions(suggestions: Vec<Suggestion>, size: usize) -> Vec<Suggestion> {
        let mut seen = std::collections::HashSet::new();
        let mut unique = Vec::with_capacity(size);

        for suggestion in suggestions {
            if seen.insert(suggestion.text.to_lowercase()) {
                unique.push(suggestion);
                if unique.len() >= size {
                    break;
                }
            }
        }

        unique
    }

    /// Create the product index with the fixed settings and mappings.
    async fn create_index(&self) -> Result<(), SearchError> {
        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(INDEX_NAME))
            .body(get_index_settings())
            .send()
            .await
            .map_err(|e| SearchError::index_creation(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Index creation failed");
            return Err(SearchError::index_creation(format!(
                "Index creation failed with status {}: {}",
                status, error_body
            )));
        }

        info!(index = INDEX_NAME, "Created search index");
        Ok(())
    }

    /// Check whether the product index exists.
    async fn index_exists(&self) -> Result<bool, SearchError> {
        let response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[INDEX_NAME]))
            .send()
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        Ok(response.status_code().is_success())
    }
}

#[async_trait]
impl SearchEngineClient for OpenSearchClient {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Product>, SearchError> {
        let body = queries::build_search_query(&query.query, query.size);
        let products = self.run_search(body).await?;

        debug!(query = %query.query, hits = products.len(), "Search completed");
        Ok(products)
    }

    async fn instant_search(&self, query: &SearchQuery) -> Result<Vec<Product>, SearchError> {
        let body = queries::build_instant_query(&query.query, query.size);

        match self.run_search(body).await {
            Ok(products) => Ok(products),
            Err(e) => {
                // Latency beats recall here: retry once with the reduced
                // single-field query instead of surfacing the timeout.
                warn!(query = %query.query, error = %e, "Instant search failed, using fallback query");
                let fallback = queries::build_instant_fallback_query(&query.query, query.size);
                self.run_search(fallback).await
            }
        }
    }

    async fn suggest(&self, prefix: &str, size: usize) -> Result<Vec<Suggestion>, SearchError> {
        let body = queries::build_suggest_query(prefix, size);

        let response = self
            .client
            .search(SearchParts::Index(&[INDEX_NAME]))
            .body(body)
            .send()
            .await
            .map_err(|e| SearchError::suggest(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(SearchError::suggest(format!(
                "Suggest failed with status {}: {}",
                status, error_body
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchError::parse(e.to_string()))?;

        let suggestions = Self::parse_suggest_response(&body, prefix, size);
        Ok(Self::dedupe_suggestions(suggestions, size))
    }

    async fn vector_search(
        &self,
        embedding: &[f32],
        size: usize,
    ) -> Result<Vec<Product>, SearchError> {
        let body = queries::build_vector_query(embedding, size);
        self.run_search(body).await
    }

    async fn index_product(
        &self,
        product: &Product,
        embedding: Option<&[f32]>,
    ) -> Result<(), SearchError> {
        let document = ProductDocument::prepare(product, embedding);
        let body = serde_json::to_value(&document)
            .map_err(|e| SearchError::SerializationError(e.to_string()))?;

        let response = self
            .client
            .index(IndexParts::Index(INDEX_NAME))
            .body(body)
            .send()
            .await
            .map_err(|e| SearchError::index(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Index request failed");
            return Err(SearchError::index(format!(
                "Index failed with status {}: {}",
                status, error_body
            )));
        }

        debug!(name = %product.name, "Product indexed");
        Ok(())
    }

    async fn bulk_index(
        &self,
        products: &[Product],
        embeddings: Option<&[Vec<f32>]>,
    ) -> Result<(), SearchError> {
        if products.is_empty() {
            return Ok(());
        }

        if let Some(embeddings) = embeddings {
            if embeddings.len() != products.len() {
                return Err(SearchError::bulk_index(format!(
                    "Embedding count {} does not match product count {}",
                    embeddings.len(),
                    products.len()
                )));
            }
        }

        let mut body: Vec<JsonBody<Value>> = Vec::with_capacity(products.len() * 2);
        for (i, product) in products.iter().enumerate() {
            let embedding = embeddings.map(|e| e[i].as_slice());
            let document = ProductDocument::prepare(product, embedding);
            let source = serde_json::to_value(&document)
                .map_err(|e| SearchError::SerializationError(e.to_string()))?;

            body.push(serde_json::json!({ "index": {} }).into());
            body.push(source.into());
        }

        let response = self
            .client
            .bulk(BulkParts::Index(INDEX_NAME))
            .body(body)
            .send()
            .await
            .map_err(|e| SearchError::bulk_index(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(SearchError::bulk_index(format!(
                "Bulk index failed with status {}: {}",
                status, error_body
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchError::parse(e.to_string()))?;

        // Bulk helper semantics: individual item failures surface only as
        // an aggregate error, never per document.
        if body["errors"].as_bool().unwrap_or(false) {
            let failed = body["items"]
                .as_array()
                .map(|items| {
                    items
                        .iter()
                        .filter(|item| item["index"]["error"].is_object())
                        .count()
                })
                .unwrap_or(0);
            return Err(SearchError::bulk_index(format!(
                "{} of {} documents failed to index",
                failed,
                products.len()
            )));
        }

        info!(count = products.len(), "Bulk indexed products");
        Ok(())
    }

    async fn ensure_index(&self) -> Result<(), SearchError> {
        if self.index_exists().await? {
            debug!(index = INDEX_NAME, "Index already exists");
            return Ok(());
        }
        self.create_index().await
    }

    async fn recreate_index(&self) -> Result<(), SearchError> {
        if self.index_exists().await? {
            let response = self
                .client
                .indices()
                .delete(IndicesDeleteParts::Index(&[INDEX_NAME]))
                .send()
                .await
                .map_err(|e| SearchError::index_creation(e.to_string()))?;

            let status = response.status_code();
            if !status.is_success() {
                let error_body = response.text().await.unwrap_or_default();
                return Err(SearchError::index_creation(format!(
                    "Index deletion failed with status {}: {}",
                    status, error_body
                )));
            }

            info!(index = INDEX_NAME, "Deleted search index");
        }

        self.create_index().await
    }

    async fn health_check(&self) -> Result<bool, SearchError> {
        let response = self
            .client
            .cluster()
            .health(ClusterHealthParts::None)
            .send()
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        if !response.status_code().is_success() {
            return Ok(false);
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchError::parse(e.to_string()))?;

        Ok(body["status"].as_str().is_some_and(|s| s != "red"))
    }
}
