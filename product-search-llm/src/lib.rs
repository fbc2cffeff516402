//! # Product Search LLM
//!
//! Hosted-LLM and embedding concerns for the product search system:
//!
//! - **Groq client**: OpenAI-compatible chat completions used for
//!   relevance scoring, compatibility scoring, and structured extraction
//! - **Reranker**: reorders candidates by hosted-model score with a
//!   position-based heuristic fallback
//! - **Embeddings**: local sentence-embedding model behind the
//!   [`Embedder`] trait
//! - **Extraction**: structured product data from emails and images

pub mod embeddings;
pub mod error;
pub mod extract;
pub mod groq;
pub mod rerank;

pub use embeddings::{Embedder, Embedding, SentenceEmbedder};
pub use error::LlmError;
pub use groq::{CandidateScorer, CompatibilityScorer, GroqClient, GroqConfig};
pub use rerank::rerank;
