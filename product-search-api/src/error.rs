//! API error type and HTTP status mapping.
//!
//! Infrastructure failures inside a handler surface as HTTP 500 with the
//! raw error message as `detail`; an endpoint whose backing service is not
//! configured returns 503. Malformed input is rejected by the extractors
//! before a handler runs.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::mailbox::MailboxError;
use product_search_llm::LlmError;
use product_search_pipeline::PipelineError;
use product_search_repository::SearchError;

/// Errors surfaced by API handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Search engine failure.
    #[error("{0}")]
    Search(#[from] SearchError),

    /// Hosted-model failure that could not be degraded locally.
    #[error("{0}")]
    Llm(#[from] LlmError),

    /// Match pipeline failure.
    #[error("{0}")]
    Pipeline(#[from] PipelineError),

    /// Mailbox failure.
    #[error("{0}")]
    Mailbox(MailboxError),

    /// A blocking task failed to complete.
    #[error("Task error: {0}")]
    Task(String),

    /// The request was malformed (e.g. missing multipart file).
    #[error("{0}")]
    BadRequest(String),

    /// The backing service for this endpoint is not configured.
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl ApiError {
    /// Create a bad-request error.
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    /// Create a service-unavailable error.
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::ServiceUnavailable(msg.into())
    }
}

impl From<MailboxError> for ApiError {
    fn from(err: MailboxError) -> Self {
        match err {
            MailboxError::NotConfigured => {
                Self::ServiceUnavailable("mailbox credentials are not set".to_string())
            }
            other => Self::Mailbox(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
