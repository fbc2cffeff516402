//! Text embedding using a local sentence-embedding model.
//!
//! Uses BAAI/bge-base-en-v1.5 via the fastembed crate (ONNX runtime).
//! The 768-dimensional output must match the index mapping's declared
//! embedding dimension, or writes carrying a vector are rejected.

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

use crate::error::LlmError;
use product_search_shared::{Product, ProductRequest};

/// A vector embedding - fixed size array of floats.
pub type Embedding = Vec<f32>;

/// Dimensionality of the sentence-embedding model output.
pub const EMBEDDING_DIM: usize = 768;

/// Trait for text embedding models.
pub trait Embedder: Send + Sync {
    /// Embed multiple documents for indexing.
    fn embed_documents(&mut self, texts: &[&str]) -> Result<Vec<Embedding>, LlmError>;

    /// Embed a single query for searching.
    ///
    /// Note: some models (like BGE) use a different prompt for queries
    /// than for documents. This method handles that distinction.
    fn embed_query(&mut self, text: &str) -> Result<Embedding, LlmError>;

    /// Returns the embedding dimension.
    fn dimension(&self) -> usize;

    /// Returns the model name/identifier.
    fn model_name(&self) -> &str;
}

/// Sentence embedder using BAAI/bge-base-en-v1.5.
///
/// Uses fastembed for ONNX-based inference. The model produces
/// 768-dimensional embeddings and supports up to 512 tokens per input.
pub struct SentenceEmbedder {
    model: TextEmbedding,
}

impl SentenceEmbedder {
    /// Create a new sentence embedder.
    ///
    /// Downloads the model on first use (~400MB).
    pub fn new() -> Result<Self, LlmError> {
        let opts = InitOptions::new(EmbeddingModel::BGEBaseENV15).with_show_download_progress(true);

        TextEmbedding::try_new(opts)
            .map(|model| Self { model })
            .map_err(|e| LlmError::embedding(e.to_string()))
    }
}

impl Embedder for SentenceEmbedder {
    fn model_name(&self) -> &str {
        "BAAI/bge-base-en-v1.5"
    }

    fn dimension(&self) -> usize {
        EMBEDDING_DIM
    }

    fn embed_documents(&mut self, texts: &[&str]) -> Result<Vec<Embedding>, LlmError> {
        self.model
            .embed(texts.to_vec(), None)
            .map_err(|e| LlmError::embedding(e.to_string()))
    }

    fn embed_query(&mut self, text: &str) -> Result<Embedding, LlmError> {
        // BGE uses a prompt prefix for queries to improve retrieval
        let query_text = format!("Represent this sentence for searching relevant passages: {text}");

        self.model
            .embed(vec![query_text], None)
            .map_err(|e| LlmError::embedding(e.to_string()))?
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::embedding("model returned no embeddings"))
    }
}

/// Text embedded for a product document: name, description, and the
/// stringified specifications.
pub fn product_text(product: &Product) -> String {
    format!(
        "{} {} {}",
        product.name,
        product.description,
        specifications_text(&product.specifications)
    )
    .trim()
    .to_string()
}

/// Text embedded for an extracted product request.
pub fn request_text(request: &ProductRequest) -> String {
    format!(
        "{} {} {}",
        request.product_name,
        request.description,
        specifications_text(&request.specifications)
    )
    .trim()
    .to_string()
}

/// Stringify a specification mapping with sorted keys so the same
/// specifications always embed to the same vector.
fn specifications_text(specifications: &std::collections::HashMap<String, String>) -> String {
    let mut pairs: Vec<_> = specifications.iter().collect();
    pairs.sort_by_key(|(key, _)| key.as_str());
    pairs
        .into_iter()
        .map(|(key, value)| format!("{key}: {value}"))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_specifications_text_sorted() {
        let mut specs = HashMap::new();
        specs.insert("storage".to_string(), "256GB".to_string());
        specs.insert("color".to_string(), "black".to_string());
        specs.insert("ram".to_string(), "8GB".to_string());

        assert_eq!(
            specifications_text(&specs),
            "color: black; ram: 8GB; storage: 256GB"
        );
    }

    #[test]
    fn test_product_text() {
        let mut product = Product::new("iPhone 14", "phones", 799.0);
        product.description = "Apple smartphone".to_string();
        product
            .specifications
            .insert("storage".to_string(), "128GB".to_string());

        assert_eq!(
            product_text(&product),
            "iPhone 14 Apple smartphone storage: 128GB"
        );
    }

    #[test]
    fn test_request_text_without_specifications() {
        let request = ProductRequest {
            product_name: "USB-C dock".to_string(),
            description: "10-port hub".to_string(),
            specifications: HashMap::new(),
            quantity: 2,
            priority: "high".to_string(),
        };

        assert_eq!(request_text(&request), "USB-C dock 10-port hub");
    }
}
