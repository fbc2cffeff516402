//! Router construction.

use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the API router with CORS and request tracing.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/api/search", get(handlers::search::search))
        .route("/api/instant-search", get(handlers::search::instant_search))
        .route("/api/autocomplete", get(handlers::search::autocomplete))
        .route("/api/products", post(handlers::products::index_product))
        .route("/api/products/bulk", post(handlers::products::bulk_index_products))
        .route("/api/index/recreate", post(handlers::products::recreate_index))
        .route("/api/data/load-sample", post(handlers::products::load_sample_data))
        .route("/api/match", post(handlers::matching::match_products))
        .route("/api/emails/check", get(handlers::extraction::check_emails))
        .route("/api/images/process", post(handlers::extraction::process_image))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// GET / - service banner listing the endpoints.
async fn root() -> Json<Value> {
    Json(json!({
        "message": "Product Search API",
        "endpoints": {
            "Search": "/api/search",
            "Instant Search": "/api/instant-search",
            "Autocomplete": "/api/autocomplete",
            "Index Product": "/api/products",
            "Bulk Index": "/api/products/bulk",
            "Recreate Index": "/api/index/recreate",
            "Load Sample Data": "/api/data/load-sample",
            "Match Products": "/api/match",
            "Check Emails": "/api/emails/check",
            "Process Image": "/api/images/process"
        }
    }))
}
