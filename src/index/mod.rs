//! Content-addressed incremental indexing.
//!
//! This module provides:
//! - Path filtering (hard-coded excludes + .gitignore)
//! - Directory walking with subtree pruning
//! - Structural block extraction via tree-sitter
//! - Stable block identity (content hash + location)
//! - The pipeline orchestrating all of the above

pub mod error;
mod extractor;
mod filter;
mod identity;
mod language;
mod models;
mod pipeline;
mod walker;

pub use filter::PathFilter;
pub use models::IndexStats;
pub use pipeline::IndexingPipeline;
