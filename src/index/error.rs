use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the indexing pipeline and its collaborators.
#[derive(Debug, Error)]
pub enum GistError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file type: {}", .0.display())]
    UnsupportedLanguage(PathBuf),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("store contract violation: {0}")]
    Contract(String),

    #[error("embedding backend error: {0:#}")]
    Embedding(#[source] anyhow::Error),

    #[error("vector store error: {0:#}")]
    Store(#[source] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, GistError>;
