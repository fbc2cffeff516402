//! Dependency initialization and wiring for the product search service.

use std::env;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{error, info};

use crate::ServiceError;
use product_search_api::mailbox::{ImapMailbox, MailboxConfig};
use product_search_api::AppState;
use product_search_llm::{
    CompatibilityScorer, Embedder, GroqClient, GroqConfig, SentenceEmbedder,
};
use product_search_pipeline::MatchPipeline;
use product_search_repository::{EngineConfig, OpenSearchClient, SearchEngineClient};

/// Default OpenSearch URL.
const DEFAULT_OPENSEARCH_URL: &str = "http://localhost:9200";

/// Default bind address for the HTTP server.
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

/// Number of initialization attempts before giving up.
const INIT_RETRIES: u32 = 5;

/// Fixed delay between initialization attempts.
const INIT_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// Shared application state ready to serve requests.
    pub state: AppState,
    /// Address the HTTP server binds to.
    pub bind_addr: String,
}

impl Dependencies {
    /// Initialize all dependencies from environment variables, retrying
    /// on failure.
    ///
    /// Initialization blocks startup only: up to 5 attempts with a fixed
    /// 5-second delay, fatal after exhaustion. Individual requests never
    /// retry.
    ///
    /// # Environment Variables
    ///
    /// - `OPENSEARCH_HOST`: OpenSearch URL (default: http://localhost:9200)
    /// - `GROQ_API_KEY`: hosted-LLM API key (optional; scoring degrades
    ///   and extraction endpoints return 503 without it)
    /// - `EMAIL_SERVER` / `EMAIL_USER` / `EMAIL_PASSWORD`: mailbox
    ///   credentials (optional; the email endpoint returns 503 without
    ///   them)
    /// - `BIND_ADDR`: HTTP bind address (default: 0.0.0.0:8000)
    pub async fn init() -> Result<Self, ServiceError> {
        for attempt in 1..=INIT_RETRIES {
            match Self::try_init().await {
                Ok(deps) => {
                    info!("Services initialized successfully");
                    return Ok(deps);
                }
                Err(e) => {
                    error!(attempt, error = %e, "Error initializing services");
                    if attempt < INIT_RETRIES {
                        info!(delay_secs = INIT_RETRY_DELAY.as_secs(), "Retrying initialization");
                        tokio::time::sleep(INIT_RETRY_DELAY).await;
                    }
                }
            }
        }

        Err(ServiceError::config(
            "Failed to initialize services after multiple attempts",
        ))
    }

    /// Run one initialization attempt.
    async fn try_init() -> Result<Self, ServiceError> {
        let opensearch_url =
            env::var("OPENSEARCH_HOST").unwrap_or_else(|_| DEFAULT_OPENSEARCH_URL.to_string());
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

        info!(
            opensearch_url = %opensearch_url,
            bind_addr = %bind_addr,
            "Initializing dependencies"
        );

        // Initialize the OpenSearch client and verify it is reachable
        let engine_config = EngineConfig::from_url(&opensearch_url);
        let engine = OpenSearchClient::new(&engine_config)?;

        let healthy = engine.health_check().await?;
        if !healthy {
            return Err(ServiceError::config("OpenSearch cluster is unhealthy"));
        }

        engine.ensure_index().await?;
        info!("OpenSearch connection verified");

        // Hosted-LLM client (optional API key)
        let groq = Arc::new(GroqClient::new(GroqConfig::new(
            env::var("GROQ_API_KEY").ok(),
        ))?);

        // Local sentence embedder (downloads the model on first run)
        let embedder: Arc<Mutex<dyn Embedder>> = Arc::new(Mutex::new(SentenceEmbedder::new()?));
        info!("Sentence embedder ready");

        // Mailbox credentials are optional
        let mailbox_config = match (
            env::var("EMAIL_SERVER"),
            env::var("EMAIL_USER"),
            env::var("EMAIL_PASSWORD"),
        ) {
            (Ok(server), Ok(user), Ok(password)) => Some(MailboxConfig {
                server,
                user,
                password,
            }),
            _ => None,
        };
        let mailbox = ImapMailbox::new(mailbox_config);

        let engine: Arc<dyn SearchEngineClient> = Arc::new(engine);
        let scorer = Arc::new(CompatibilityScorer::new(groq.clone()));
        let pipeline = Arc::new(MatchPipeline::new(
            embedder.clone(),
            engine.clone(),
            scorer,
        ));

        let state = AppState {
            engine,
            groq,
            embedder,
            pipeline,
            mailbox: Arc::new(mailbox),
        };

        Ok(Self { state, bind_addr })
    }
}
