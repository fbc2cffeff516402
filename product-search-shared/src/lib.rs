//! # Product Search Shared
//!
//! Shared types and data structures for the product search system.
//!
//! This crate defines the domain types exchanged between the repository,
//! pipeline, LLM, and API crates: products, extracted product requests,
//! search results, and autocomplete suggestions.

mod product;
mod request;
mod search;

pub use product::Product;
pub use request::{ProductInfo, ProductRequest};
pub use search::{SearchQuery, SearchResult, Suggestion, SuggestionKind};
