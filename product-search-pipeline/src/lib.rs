//! # Product Search Pipeline
//!
//! This crate provides the retrieval-augmented matching pipeline that
//! turns an extracted product request into ranked candidate products.
//!
//! ## Architecture
//!
//! The pipeline is a fixed, ordered sequence of stages passing one state
//! object — there is no branching, no retry, and no graph machinery:
//!
//! 1. **Embed**: turn the request text into a query embedding
//! 2. **Retrieve**: vector-search the product index for candidates
//! 3. **Score**: ask the hosted model for a compatibility score per
//!    candidate and sort descending
//!
//! A single scoring failure aborts the whole match; partial results are
//! never returned.

pub mod errors;
pub mod pipeline;
pub mod stages;

pub use errors::PipelineError;
pub use pipeline::MatchPipeline;
pub use stages::MatchState;
