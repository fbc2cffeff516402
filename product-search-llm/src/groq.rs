//! Groq chat client.
//!
//! Thin client for the Groq OpenAI-compatible chat completions API, plus
//! the narrow scoring interfaces the reranker and match pipeline consume.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::LlmError;

/// Default Groq API base URL.
const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai";

/// Fast model used for per-candidate relevance scoring.
const DEFAULT_SCORING_MODEL: &str = "llama-3.1-8b-instant";

/// Model used for structured extraction and compatibility scoring.
const DEFAULT_EXTRACTION_MODEL: &str = "mixtral-8x7b-32768";

/// Vision model used for image extraction.
const DEFAULT_VISION_MODEL: &str = "llama-3.2-90b-vision-preview";

/// System prompt for search-result relevance scoring.
const RELEVANCE_SYSTEM_PROMPT: &str = "You are a product matching expert. Analyze the search query and candidate product \
to determine their relevance score from 0-100. Consider product name, description, specifications, \
category, and how well they match the search intent.\n\n\
Scoring guidelines:\n\
- 90-100: Perfect match (exact product or very close variant)\n\
- 70-89: Good match (same category, similar features)\n\
- 50-69: Moderate match (related but different product)\n\
- 30-49: Weak match (some relevance but not ideal)\n\
- 0-29: Poor match (little to no relevance)\n\n\
Output only the numeric score (0-100).";

/// System prompt for request-to-product compatibility scoring.
const COMPATIBILITY_SYSTEM_PROMPT: &str = "You are a product matching expert. Analyze the product request and candidate product \
to determine their compatibility score from 0-100. Consider all specifications and requirements. \
Output only the numeric score.";

/// Configuration for the Groq client.
#[derive(Debug, Clone)]
pub struct GroqConfig {
    /// API key; `None` leaves every call failing with
    /// [`LlmError::MissingApiKey`], which callers degrade from.
    pub api_key: Option<String>,
    /// API base URL (without the `/v1/...` path).
    pub base_url: String,
    /// Model for relevance scoring.
    pub scoring_model: String,
    /// Model for extraction and compatibility scoring.
    pub extraction_model: String,
    /// Model for image extraction.
    pub vision_model: String,
}

impl GroqConfig {
    /// Build a configuration with the default models and base URL.
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            scoring_model: DEFAULT_SCORING_MODEL.to_string(),
            extraction_model: DEFAULT_EXTRACTION_MODEL.to_string(),
            vision_model: DEFAULT_VISION_MODEL.to_string(),
        }
    }
}

/// One chat message in a completion request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    role: String,
    content: MessageContent,
}

impl ChatMessage {
    /// Create a system message.
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: MessageContent::Text(text.into()),
        }
    }

    /// Create a user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: MessageContent::Text(text.into()),
        }
    }

    /// Create a user message carrying text plus an image data URI.
    pub fn user_with_image(text: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: MessageContent::Parts(vec![
                ContentPart::Text { text: text.into() },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: image_url.into(),
                    },
                },
            ]),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

/// Client for the Groq chat completions API.
pub struct GroqClient {
    http: reqwest::Client,
    config: GroqConfig,
}

impl GroqClient {
    /// Create a new client.
    ///
    /// Building the client never fails on a missing API key; calls do.
    pub fn new(config: GroqConfig) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| LlmError::request(e.to_string()))?;

        info!(
            base_url = %config.base_url,
            scoring_model = %config.scoring_model,
            configured = config.api_key.is_some(),
            "Created Groq client"
        );

        Ok(Self { http, config })
    }

    /// Whether an API key is configured.
    pub fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    /// The configured extraction model name.
    pub fn extraction_model(&self) -> &str {
        &self.config.extraction_model
    }

    /// The configured vision model name.
    pub fn vision_model(&self) -> &str {
        &self.config.vision_model
    }

    /// Send a chat completion request and return the first choice's text.
    pub async fn chat(
        &self,
        model: &str,
        messages: &[ChatMessage],
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, LlmError> {
        let api_key = self.config.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;
        let url = format!("{}/v1/chat/completions", self.config.base_url);

        let request = ChatRequest {
            model,
            messages,
            temperature,
            max_tokens,
        };

        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {api_key}"))
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::parse(e.to_string()))?;

        body.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| LlmError::parse("Response contained no choices"))
    }

    /// Ask a model for a bare numeric score and parse it.
    async fn score_with_prompt(
        &self,
        model: &str,
        system_prompt: &str,
        user_prompt: String,
    ) -> Result<f64, LlmError> {
        let messages = [ChatMessage::system(system_prompt), ChatMessage::user(user_prompt)];
        let content = self.chat(model, &messages, 0.1, 10).await?;

        content
            .trim()
            .parse::<f64>()
            .map_err(|_| LlmError::parse(format!("Not a numeric score: {:?}", content.trim())))
    }
}

/// Scores a single candidate against a query.
///
/// The one-method surface keeps scoring fakeable in tests and lets the
/// reranker treat every hosted-model failure as a per-candidate event.
#[async_trait]
pub trait CandidateScorer: Send + Sync {
    /// Score how well `candidate` matches `query`, nominally in [0, 100].
    async fn score(&self, query: &str, candidate: &str) -> Result<f64, LlmError>;
}

#[async_trait]
impl CandidateScorer for GroqClient {
    async fn score(&self, query: &str, candidate: &str) -> Result<f64, LlmError> {
        let user_prompt = format!("Search Query: {query}\nCandidate Product: {candidate}");
        self.score_with_prompt(&self.config.scoring_model, RELEVANCE_SYSTEM_PROMPT, user_prompt)
            .await
    }
}

/// Compatibility scorer used by the match pipeline.
///
/// Same wire mechanics as relevance scoring, but prompts for compatibility
/// between an extracted product request and a candidate product.
pub struct CompatibilityScorer {
    client: Arc<GroqClient>,
}

impl CompatibilityScorer {
    /// Wrap a Groq client for compatibility scoring.
    pub fn new(client: Arc<GroqClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CandidateScorer for CompatibilityScorer {
    async fn score(&self, request: &str, candidate: &str) -> Result<f64, LlmError> {
        let user_prompt = format!("Product Request: {request}\nCandidate Product: {candidate}");
        self.client
            .score_with_prompt(
                &self.client.config.extraction_model,
                COMPATIBILITY_SYSTEM_PROMPT,
                user_prompt,
            )
            .await
    }
}
