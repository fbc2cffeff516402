//! # Product Search API
//!
//! HTTP JSON API for the product search system: search, instant search,
//! autocomplete, indexing, index administration, request matching, and
//! email/image extraction endpoints over the repository, LLM, and
//! pipeline crates.

pub mod error;
pub mod handlers;
pub mod mailbox;
pub mod routes;
pub mod sample_data;
pub mod state;

pub use error::ApiError;
pub use routes::router;
pub use state::AppState;

#[cfg(test)]
pub(crate) mod testing;
