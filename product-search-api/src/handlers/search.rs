//! Search, instant-search, and autocomplete handlers.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;
use product_search_llm::groq::CandidateScorer;
use product_search_llm::rerank;
use product_search_shared::SearchQuery;

/// Default number of autocomplete suggestions.
const DEFAULT_SUGGEST_SIZE: usize = 5;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: String,
    pub size: Option<usize>,
    pub use_groq_rerank: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct SuggestParams {
    pub q: String,
    pub size: Option<usize>,
}

/// GET /api/search - keyword search with reranking.
///
/// Hosted-model reranking only runs when the caller asks for it and an
/// API key is configured; otherwise every hit gets the position
/// heuristic, which preserves engine order.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Value>, ApiError> {
    let size = params.size.unwrap_or(SearchQuery::DEFAULT_SIZE);
    let query = SearchQuery::with_size(params.q.as_str(), size);

    let hits = state.engine.search(&query).await?;

    let use_groq = params.use_groq_rerank.unwrap_or(false) && state.groq.is_configured();
    let scorer: Option<&dyn CandidateScorer> = if use_groq {
        Some(state.groq.as_ref())
    } else {
        None
    };

    let results = rerank(scorer, &params.q, hits, size).await;

    info!(query = %params.q, results = results.len(), groq = use_groq, "Search completed");
    Ok(Json(json!({ "status": "success", "results": results })))
}

/// GET /api/instant-search - latency-optimized search.
///
/// The engine client already falls back to a reduced query on timeout;
/// scores here are always the position heuristic.
pub async fn instant_search(
    State(state): State<AppState>,
    Query(params): Query<SuggestParams>,
) -> Result<Json<Value>, ApiError> {
    let size = params.size.unwrap_or(SearchQuery::DEFAULT_SIZE);
    let query = SearchQuery::with_size(params.q.as_str(), size);

    let hits = state.engine.instant_search(&query).await?;
    let results = rerank(None, &params.q, hits, size).await;

    Ok(Json(json!({ "status": "success", "results": results })))
}

/// GET /api/autocomplete - completion-suggester lookup.
pub async fn autocomplete(
    State(state): State<AppState>,
    Query(params): Query<SuggestParams>,
) -> Result<Json<Value>, ApiError> {
    let size = params.size.unwrap_or(DEFAULT_SUGGEST_SIZE);
    let suggestions = state.engine.suggest(&params.q, size).await?;

    Ok(Json(json!({ "status": "success", "suggestions": suggestions })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::test_state;
    use product_search_shared::Product;

    #[tokio::test]
    async fn test_index_then_search_returns_product_with_score() {
        let (state, engine) = test_state();
        engine.seed(vec![Product::new("iPhone 14", "phones", 799.0)]);

        let response = search(
            State(state),
            Query(SearchParams {
                q: "iphone".to_string(),
                size: None,
                use_groq_rerank: None,
            }),
        )
        .await
        .unwrap();

        let body = response.0;
        assert_eq!(body["status"], "success");
        let results = body["results"].as_array().unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0]["name"], "iPhone 14");
        assert_eq!(results[0]["relevance_score"], 100.0);
    }

    #[tokio::test]
    async fn test_search_scores_follow_position_heuristic() {
        let (state, engine) = test_state();
        engine.seed(vec![
            Product::new("Phone A", "phones", 100.0),
            Product::new("Phone B", "phones", 200.0),
            Product::new("Phone C", "phones", 300.0),
        ]);

        let response = search(
            State(state),
            Query(SearchParams {
                q: "phone".to_string(),
                size: Some(10),
                use_groq_rerank: Some(false),
            }),
        )
        .await
        .unwrap();

        let results = response.0["results"].as_array().unwrap().clone();
        assert_eq!(results[0]["relevance_score"], 100.0);
        assert_eq!(results[1]["relevance_score"], 95.0);
        assert_eq!(results[2]["relevance_score"], 90.0);
    }

    #[tokio::test]
    async fn test_instant_search_returns_results() {
        let (state, engine) = test_state();
        engine.seed(vec![Product::new("MacBook Air", "laptops", 1199.0)]);

        let response = instant_search(
            State(state),
            Query(SuggestParams {
                q: "macbook".to_string(),
                size: None,
            }),
        )
        .await
        .unwrap();

        let results = response.0["results"].as_array().unwrap().clone();
        assert_eq!(results.len(), 1);
        assert!(results[0]["relevance_score"].is_number());
    }

    #[tokio::test]
    async fn test_autocomplete_limits_size() {
        let (state, engine) = test_state();
        engine.seed(
            (0..8)
                .map(|i| Product::new(format!("Phone {}", i), "phones", 100.0))
                .collect(),
        );

        let response = autocomplete(
            State(state),
            Query(SuggestParams {
                q: "phone".to_string(),
                size: Some(3),
            }),
        )
        .await
        .unwrap();

        let suggestions = response.0["suggestions"].as_array().unwrap().clone();
        assert_eq!(suggestions.len(), 3);
    }
}
