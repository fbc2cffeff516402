//! Pipeline stages.
//!
//! Each stage takes the [`MatchState`], fills in one field, and returns
//! it. Stages run strictly in order; none of them branches or retries.

use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::errors::PipelineError;
use product_search_llm::{Embedder, Embedding};
use product_search_llm::embeddings::request_text;
use product_search_llm::groq::CandidateScorer;
use product_search_repository::SearchEngineClient;
use product_search_shared::{Product, ProductRequest, SearchResult};

/// State threaded through the pipeline stages.
///
/// Constructed once per match; each stage consumes the state and returns
/// it with its own output filled in.
#[derive(Debug)]
pub struct MatchState {
    /// The extracted product request driving the match.
    pub request: ProductRequest,
    /// Number of candidates to retrieve and rank.
    pub top_k: usize,
    /// Query embedding, set by the embed stage.
    pub embedding: Option<Embedding>,
    /// Candidate products, set by the retrieve stage.
    pub candidates: Vec<Product>,
    /// Scored candidates in descending score order, set by the score stage.
    pub ranked: Vec<SearchResult>,
}

impl MatchState {
    /// Create the initial state for a match run.
    pub fn new(request: ProductRequest, top_k: usize) -> Self {
        Self {
            request,
            top_k,
            embedding: None,
            candidates: Vec::new(),
            ranked: Vec::new(),
        }
    }
}

/// Embed stage: concatenate the request's name, description, and
/// stringified specifications and run the sentence embedder.
///
/// The embedding call is CPU-bound ONNX inference, so it runs on the
/// blocking pool.
pub async fn embed(
    mut state: MatchState,
    embedder: Arc<Mutex<dyn Embedder>>,
) -> Result<MatchState, PipelineError> {
    let text = request_text(&state.request);

    let embedding = tokio::task::spawn_blocking(move || {
        let mut embedder = embedder
            .lock()
            .map_err(|_| PipelineError::embedding("embedder lock poisoned"))?;
        embedder
            .embed_query(&text)
            .map_err(|e| PipelineError::embedding(e.to_string()))
    })
    .await
    .map_err(|e| PipelineError::task(e.to_string()))??;

    debug!(dimension = embedding.len(), "Embedded product request");
    state.embedding = Some(embedding);
    Ok(state)
}

/// Retrieve stage: vector search for the closest candidate products.
pub async fn retrieve(
    mut state: MatchState,
    engine: &dyn SearchEngineClient,
) -> Result<MatchState, PipelineError> {
    let embedding = state
        .embedding
        .as_deref()
        .ok_or_else(|| PipelineError::embedding("embed stage did not run"))?;

    state.candidates = engine.vector_search(embedding, state.top_k).await?;

    debug!(candidates = state.candidates.len(), "Retrieved match candidates");
    Ok(state)
}

/// Score stage: ask the hosted model for a compatibility score per
/// candidate, then sort descending.
///
/// Unlike search reranking there is no per-candidate fallback here: a
/// single scoring failure aborts the whole match.
pub async fn score(
    mut state: MatchState,
    scorer: &dyn CandidateScorer,
) -> Result<MatchState, PipelineError> {
    let request_str = serde_json::to_string(&state.request)
        .map_err(|e| PipelineError::scoring(e.to_string()))?;

    let mut ranked = Vec::with_capacity(state.candidates.len());
    for product in state.candidates.drain(..) {
        let candidate_str = serde_json::to_string(&product)
            .map_err(|e| PipelineError::scoring(e.to_string()))?;

        let relevance_score = scorer
            .score(&request_str, &candidate_str)
            .await
            .map_err(|e| PipelineError::scoring(e.to_string()))?;

        ranked.push(SearchResult {
            product,
            relevance_score,
        });
    }

    ranked.sort_by(|a, b| {
        b.relevance_score
            .partial_cmp(&a.relevance_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    state.ranked = ranked;
    Ok(state)
}
