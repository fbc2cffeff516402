//! Pipeline driver.
//!
//! Runs the embed, retrieve, and score stages in order against the shared
//! service handles.

use std::sync::{Arc, Mutex};

use tracing::{info, instrument};

use crate::errors::PipelineError;
use crate::stages::{self, MatchState};
use product_search_llm::groq::CandidateScorer;
use product_search_llm::Embedder;
use product_search_repository::SearchEngineClient;
use product_search_shared::{ProductRequest, SearchResult};

/// The retrieval-augmented matching pipeline.
///
/// Holds the service handles the stages need and drives them in a fixed
/// order. The pipeline itself carries no per-run state.
pub struct MatchPipeline {
    embedder: Arc<Mutex<dyn Embedder>>,
    engine: Arc<dyn SearchEngineClient>,
    scorer: Arc<dyn CandidateScorer>,
}

impl MatchPipeline {
    /// Create a pipeline over the given service handles.
    pub fn new(
        embedder: Arc<Mutex<dyn Embedder>>,
        engine: Arc<dyn SearchEngineClient>,
        scorer: Arc<dyn CandidateScorer>,
    ) -> Self {
        Self {
            embedder,
            engine,
            scorer,
        }
    }

    /// Match products for a request.
    ///
    /// Runs embed → retrieve → score and returns the scored candidates in
    /// descending compatibility order. Any stage failure aborts the whole
    /// match.
    #[instrument(skip(self, request), fields(product_name = %request.product_name))]
    pub async fn run(
        &self,
        request: ProductRequest,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, PipelineError> {
        let state = MatchState::new(request, top_k);

        let state = stages::embed(state, self.embedder.clone()).await?;
        let state = stages::retrieve(state, self.engine.as_ref()).await?;
        let state = stages::score(state, self.scorer.as_ref()).await?;

        info!(matches = state.ranked.len(), "Match pipeline completed");
        Ok(state.ranked)
    }
}
