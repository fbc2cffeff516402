//! Structured extraction from emails and images.
//!
//! Both extractors prompt the hosted model for a bare JSON object and
//! recover payloads that arrive wrapped in code fences or prose.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::LlmError;
use crate::groq::{ChatMessage, GroqClient};
use product_search_shared::{ProductInfo, ProductRequest};

/// System prompt for email extraction.
const EMAIL_SYSTEM_PROMPT: &str = "Extract product request details from the following email. \
Respond with only a JSON object with these fields: \
product_name (string), description (string), specifications (object mapping string to string), \
quantity (integer), priority (string).";

/// System prompt for image extraction.
const IMAGE_SYSTEM_PROMPT: &str = "You are a product information extraction expert. Analyze the product image and extract \
detailed information about the product. Be as specific as possible about technical \
specifications, dimensions, materials, brand, model, etc. \
Respond with only a JSON object with these fields: \
product_name (string), description (string), specifications (object mapping string to string), \
category (string), estimated_price_range (string).";

/// Token budget for extraction responses.
const EXTRACTION_MAX_TOKENS: u32 = 500;

/// Extract a structured product request from email text.
///
/// A parse failure is an error surfaced to the caller; unlike rerank
/// scoring there is no sensible degraded output for a request that could
/// not be understood.
pub async fn extract_product_request(
    client: &GroqClient,
    email_content: &str,
) -> Result<ProductRequest, LlmError> {
    let messages = [
        ChatMessage::system(EMAIL_SYSTEM_PROMPT),
        ChatMessage::user(email_content),
    ];

    let content = client
        .chat(client.extraction_model(), &messages, 0.1, EXTRACTION_MAX_TOKENS)
        .await?;

    parse_json_payload(&content)
}

/// Extract product information from an uploaded image.
///
/// The raw bytes are base64-encoded into a data URI for the vision model;
/// no in-process image decoding happens. Any failure (missing key, call
/// failure, unparseable response) degrades to the fixed fallback record
/// rather than erroring.
pub async fn extract_product_info(
    client: &GroqClient,
    image_bytes: &[u8],
    content_type: &str,
) -> ProductInfo {
    let data_uri = format!("data:{};base64,{}", content_type, STANDARD.encode(image_bytes));

    let messages = [
        ChatMessage::system(IMAGE_SYSTEM_PROMPT),
        ChatMessage::user_with_image("Extract product information from this image.", data_uri),
    ];

    let response = client
        .chat(client.vision_model(), &messages, 0.3, EXTRACTION_MAX_TOKENS)
        .await;

    match response {
        Ok(content) => match parse_json_payload::<ProductInfo>(&content) {
            Ok(info) => info,
            Err(e) => {
                warn!(error = %e, "Image extraction response unparseable, using fallback");
                ProductInfo::unknown()
            }
        },
        Err(e) => {
            warn!(error = %e, "Image extraction call failed, using fallback");
            ProductInfo::unknown()
        }
    }
}

/// Parse a JSON payload out of a model response.
///
/// Tries the whole response first, then the span between the first `{`
/// and the last `}` — models routinely wrap the object in code fences or
/// a sentence of prose.
pub fn parse_json_payload<T: DeserializeOwned>(content: &str) -> Result<T, LlmError> {
    if let Ok(value) = serde_json::from_str(content) {
        return Ok(value);
    }

    if let (Some(start), Some(end)) = (content.find('{'), content.rfind('}')) {
        if start < end {
            if let Ok(value) = serde_json::from_str(&content[start..=end]) {
                return Ok(value);
            }
        }
    }

    Err(LlmError::parse(format!(
        "No JSON object found in model response: {:?}",
        content.chars().take(200).collect::<String>()
    )))
}
