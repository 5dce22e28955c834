//! Search error types

use std::path::PathBuf;

use thiserror::Error;

use crate::document::DocumentError;

/// Errors raised while building or querying the search index
///
/// The HTTP layer never shows these to clients: a failed search answers with
/// an empty result list. They exist so callers and tests can tell "no
/// matches" apart from "search unavailable".
#[derive(Debug, Error)]
pub enum SearchError {
    /// The index is absent and cannot be built
    #[error("Search index unavailable: {0}")]
    Unavailable(String),

    /// The index directory could not be created
    #[error("Permission denied creating index directory {}: {source}", path.display())]
    PermissionDenied {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The query string does not parse
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Tantivy failed while reading or writing the index
    #[error("Index error: {0}")]
    Engine(#[from] tantivy::TantivyError),

    /// Page text could not be extracted during a build
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SearchError {
    /// Whether the error means search is disabled rather than a single query failing
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            SearchError::Unavailable(_) | SearchError::PermissionDenied { .. }
        )
    }
}

/// Result type alias for search operations
pub type Result<T> = std::result::Result<T, SearchError>;
