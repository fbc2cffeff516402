//! Shared fakes for handler tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::mailbox::ImapMailbox;
use crate::state::AppState;
use product_search_llm::{
    CompatibilityScorer, Embedder, Embedding, GroqClient, GroqConfig, LlmError,
};
use product_search_pipeline::MatchPipeline;
use product_search_repository::{SearchEngineClient, SearchError};
use product_search_shared::{Product, SearchQuery, Suggestion, SuggestionKind};

/// In-memory engine fake: substring search over seeded products.
pub(crate) struct FakeEngine {
    products: Mutex<Vec<Product>>,
    last_embedding_dim: AtomicUsize,
    recreate_calls: AtomicUsize,
}

impl FakeEngine {
    pub(crate) fn new() -> Self {
        Self {
            products: Mutex::new(Vec::new()),
            last_embedding_dim: AtomicUsize::new(0),
            recreate_calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn seed(&self, products: Vec<Product>) {
        self.products.lock().unwrap().extend(products);
    }

    pub(crate) fn indexed(&self) -> Vec<Product> {
        self.products.lock().unwrap().clone()
    }

    pub(crate) fn last_embedding_dim(&self) -> usize {
        self.last_embedding_dim.load(Ordering::SeqCst)
    }

    pub(crate) fn recreate_calls(&self) -> usize {
        self.recreate_calls.load(Ordering::SeqCst)
    }

    fn matching(&self, query: &str, size: usize) -> Vec<Product> {
        let needle = query.to_lowercase();
        self.products
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .take(size)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl SearchEngineClient for FakeEngine {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Product>, SearchError> {
        Ok(self.matching(&query.query, query.size))
    }

    async fn instant_search(&self, query: &SearchQuery) -> Result<Vec<Product>, SearchError> {
        Ok(self.matching(&query.query, query.size))
    }

    async fn suggest(&self, prefix: &str, size: usize) -> Result<Vec<Suggestion>, SearchError> {
        Ok(self
            .matching(prefix, size)
            .into_iter()
            .map(|p| Suggestion {
                text: p.name,
                kind: SuggestionKind::Product,
                score: 10.0,
            })
            .collect())
    }

    async fn vector_search(
        &self,
        _embedding: &[f32],
        size: usize,
    ) -> Result<Vec<Product>, SearchError> {
        Ok(self
            .products
            .lock()
            .unwrap()
            .iter()
            .take(size)
            .cloned()
            .collect())
    }

    async fn index_product(
        &self,
        product: &Product,
        embedding: Option<&[f32]>,
    ) -> Result<(), SearchError> {
        if let Some(embedding) = embedding {
            self.last_embedding_dim
                .store(embedding.len(), Ordering::SeqCst);
        }
        self.products.lock().unwrap().push(product.clone());
        Ok(())
    }

    async fn bulk_index(
        &self,
        products: &[Product],
        embeddings: Option<&[Vec<f32>]>,
    ) -> Result<(), SearchError> {
        if let Some(first) = embeddings.and_then(|e| e.first()) {
            self.last_embedding_dim.store(first.len(), Ordering::SeqCst);
        }
        self.products.lock().unwrap().extend_from_slice(products);
        Ok(())
    }

    async fn ensure_index(&self) -> Result<(), SearchError> {
        Ok(())
    }

    async fn recreate_index(&self) -> Result<(), SearchError> {
        self.recreate_calls.fetch_add(1, Ordering::SeqCst);
        self.products.lock().unwrap().clear();
        Ok(())
    }

    async fn health_check(&self) -> Result<bool, SearchError> {
        Ok(true)
    }
}

/// Embedder fake returning fixed-size vectors.
pub(crate) struct FakeEmbedder;

impl Embedder for FakeEmbedder {
    fn embed_documents(&mut self, texts: &[&str]) -> Result<Vec<Embedding>, LlmError> {
        Ok(texts.iter().map(|_| vec![0.5; 8]).collect())
    }

    fn embed_query(&mut self, _text: &str) -> Result<Embedding, LlmError> {
        Ok(vec![0.5; 8])
    }

    fn dimension(&self) -> usize {
        8
    }

    fn model_name(&self) -> &str {
        "fake"
    }
}

/// Build an `AppState` over fakes, with an unconfigured Groq client.
pub(crate) fn test_state() -> (AppState, Arc<FakeEngine>) {
    let engine = Arc::new(FakeEngine::new());
    let groq =
        Arc::new(GroqClient::new(GroqConfig::new(None)).expect("client construction cannot fail"));
    let embedder: Arc<Mutex<dyn Embedder>> = Arc::new(Mutex::new(FakeEmbedder));
    let scorer = Arc::new(CompatibilityScorer::new(groq.clone()));
    let pipeline = Arc::new(MatchPipeline::new(
        embedder.clone(),
        engine.clone(),
        scorer,
    ));

    let state = AppState {
        engine: engine.clone(),
        groq,
        embedder,
        pipeline,
        mailbox: Arc::new(ImapMailbox::new(None)),
    };

    (state, engine)
}
