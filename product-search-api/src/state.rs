//! Shared application state.

use std::sync::{Arc, Mutex};

use crate::mailbox::MailboxSource;
use product_search_llm::{Embedder, GroqClient};
use product_search_pipeline::MatchPipeline;
use product_search_repository::SearchEngineClient;

/// Shared application state.
///
/// Built once at startup and cloned per request; the handles inside are
/// the only process-wide state the service carries.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<dyn SearchEngineClient>,
    pub groq: Arc<GroqClient>,
    pub embedder: Arc<Mutex<dyn Embedder>>,
    pub pipeline: Arc<MatchPipeline>,
    pub mailbox: Arc<dyn MailboxSource>,
}
