//! Product indexing and index administration handlers.

use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};
use tracing::info;

use crate::error::ApiError;
use crate::sample_data::sample_products;
use crate::state::AppState;
use product_search_llm::embeddings::product_text;
use product_search_llm::{Embedder, Embedding, LlmError};
use product_search_shared::Product;

/// Embed a batch of product texts on the blocking pool.
async fn embed_products(
    embedder: Arc<Mutex<dyn Embedder>>,
    products: &[Product],
) -> Result<Vec<Embedding>, ApiError> {
    let texts: Vec<String> = products.iter().map(product_text).collect();

    tokio::task::spawn_blocking(move || {
        let mut embedder = embedder
            .lock()
            .map_err(|_| LlmError::embedding("embedder lock poisoned"))?;
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        embedder.embed_documents(&refs)
    })
    .await
    .map_err(|e| ApiError::Task(e.to_string()))?
    .map_err(ApiError::Llm)
}

/// POST /api/products - index a single product.
pub async fn index_product(
    State(state): State<AppState>,
    Json(product): Json<Product>,
) -> Result<Json<Value>, ApiError> {
    let embeddings = embed_products(state.embedder.clone(), std::slice::from_ref(&product)).await?;
    let embedding = embeddings.first().map(Vec::as_slice);

    state.engine.index_product(&product, embedding).await?;

    info!(name = %product.name, "Product indexed");
    Ok(Json(json!({
        "status": "success",
        "message": "Product indexed successfully"
    })))
}

/// POST /api/products/bulk - index a list of products in one batch write.
pub async fn bulk_index_products(
    State(state): State<AppState>,
    Json(products): Json<Vec<Product>>,
) -> Result<Json<Value>, ApiError> {
    let embeddings = embed_products(state.embedder.clone(), &products).await?;

    state
        .engine
        .bulk_index(&products, Some(embeddings.as_slice()))
        .await?;

    info!(count = products.len(), "Products bulk indexed");
    Ok(Json(json!({
        "status": "success",
        "message": format!("{} products indexed successfully", products.len())
    })))
}

/// POST /api/index/recreate - delete and recreate the index.
///
/// Destructive: every indexed document is lost.
pub async fn recreate_index(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    state.engine.recreate_index().await?;

    info!("Index recreated");
    Ok(Json(json!({
        "status": "success",
        "message": "Index recreated successfully"
    })))
}

/// POST /api/data/load-sample - seed the index with the embedded catalog.
pub async fn load_sample_data(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let products = sample_products().map_err(|e| ApiError::Task(e.to_string()))?;

    let embeddings = embed_products(state.embedder.clone(), &products).await?;
    state
        .engine
        .bulk_index(&products, Some(embeddings.as_slice()))
        .await?;

    info!(count = products.len(), "Sample data loaded");
    Ok(Json(json!({
        "status": "success",
        "message": "Sample products loaded",
        "count": products.len()
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::test_state;

    #[tokio::test]
    async fn test_index_product_attaches_embedding() {
        let (state, engine) = test_state();

        let response = index_product(
            State(state),
            Json(Product::new("iPhone 14", "phones", 799.0)),
        )
        .await
        .unwrap();

        assert_eq!(response.0["status"], "success");
        assert_eq!(engine.indexed().len(), 1);
        assert!(engine.last_embedding_dim() > 0);
    }

    #[tokio::test]
    async fn test_bulk_index_products() {
        let (state, engine) = test_state();

        let products = vec![
            Product::new("Phone A", "phones", 100.0),
            Product::new("Phone B", "phones", 200.0),
        ];

        let response = bulk_index_products(State(state), Json(products)).await.unwrap();

        assert_eq!(
            response.0["message"],
            "2 products indexed successfully"
        );
        assert_eq!(engine.indexed().len(), 2);
    }

    #[tokio::test]
    async fn test_recreate_index_is_repeatable() {
        let (state, engine) = test_state();

        recreate_index(State(state.clone())).await.unwrap();
        recreate_index(State(state)).await.unwrap();

        assert_eq!(engine.recreate_calls(), 2);
        assert!(engine.indexed().is_empty());
    }

    #[tokio::test]
    async fn test_load_sample_data_seeds_catalog() {
        let (state, engine) = test_state();

        let response = load_sample_data(State(state)).await.unwrap();

        let count = response.0["count"].as_u64().unwrap() as usize;
        assert!(count > 0);
        assert_eq!(engine.indexed().len(), count);
    }
}
