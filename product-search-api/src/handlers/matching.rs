//! Request matching handler.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;
use product_search_shared::ProductRequest;

/// Default number of match candidates.
const DEFAULT_TOP_K: usize = 5;

#[derive(Debug, Deserialize)]
pub struct MatchParams {
    pub top_k: Option<usize>,
}

/// POST /api/match - match products for an extracted request via the
/// embed → retrieve → score pipeline.
pub async fn match_products(
    State(state): State<AppState>,
    Query(params): Query<MatchParams>,
    Json(request): Json<ProductRequest>,
) -> Result<Json<Value>, ApiError> {
    if !state.groq.is_configured() {
        return Err(ApiError::unavailable("GROQ_API_KEY is not set"));
    }

    let top_k = params.top_k.unwrap_or(DEFAULT_TOP_K);
    let matches = state.pipeline.run(request, top_k).await?;

    info!(matches = matches.len(), "Match completed");
    Ok(Json(json!({ "status": "success", "matches": matches })))
}
