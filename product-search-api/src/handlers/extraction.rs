//! Email and image extraction handlers.

use axum::extract::{Multipart, State};
use axum::Json;
use serde_json::{json, Value};
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;
use product_search_llm::extract::{extract_product_info, extract_product_request};

/// GET /api/emails/check - poll the mailbox and extract a structured
/// request from every unread message.
///
/// Extraction failures abort the request: a request email that could not
/// be understood is an error, not a degraded result.
pub async fn check_emails(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    if !state.groq.is_configured() {
        return Err(ApiError::unavailable("GROQ_API_KEY is not set"));
    }

    let emails = state.mailbox.fetch_unread().await?;

    let mut processed_requests = Vec::with_capacity(emails.len());
    for email in &emails {
        let request = extract_product_request(&state.groq, &email.content).await?;
        processed_requests.push(request);
    }

    info!(count = emails.len(), "Processed request emails");
    Ok(Json(json!({
        "status": "success",
        "new_emails": emails.len(),
        "processed_requests": processed_requests
    })))
}

/// POST /api/images/process - extract product info from an uploaded image.
///
/// The image bytes go to the vision model as a base64 data URI; extraction
/// failures degrade to the fixed fallback record rather than erroring.
pub async fn process_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    if !state.groq.is_configured() {
        return Err(ApiError::unavailable("GROQ_API_KEY is not set"));
    }

    let mut file: Option<(Vec<u8>, String)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(e.to_string()))?
    {
        if field.name() == Some("file") {
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::bad_request(e.to_string()))?;
            file = Some((bytes.to_vec(), content_type));
            break;
        }
    }

    let (bytes, content_type) =
        file.ok_or_else(|| ApiError::bad_request("Missing multipart field 'file'"))?;

    let info = extract_product_info(&state.groq, &bytes, &content_type).await;

    Ok(Json(json!({ "status": "success", "products": [info] })))
}
