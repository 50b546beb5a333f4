//! Persisted data models for the vector store.

/// A block as persisted in the vector store, keyed by `block_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlock {
    pub block_id: String,
    pub filename: String,
    pub start_line: u32,
    pub end_line: u32,
    pub parent_scope: Option<String>,
    pub language: String,
    pub content_hash: String,
    pub code: String,
}

/// One ranked result from a similarity query.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub block_id: String,
    pub filename: String,
    pub start_line: u32,
    pub end_line: u32,
    pub parent_scope: Option<String>,
    pub language: String,
    pub content_hash: String,
    pub code: String,
    /// Cosine distance (lower = more similar); absent if the engine
    /// omitted it.
    pub distance: Option<f32>,
}
