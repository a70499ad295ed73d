//! Search Error Types
//!
//! Error handling for the search pipeline.

use thiserror::Error;

/// Search operation errors
#[derive(Error, Debug)]
pub enum SearchError {
    /// Any failure of the underlying index, including non-conforming
    /// responses. Fatal for the whole call; partial results are discarded.
    #[error("Index error: {0}")]
    Index(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<meilisearch_sdk::errors::Error> for SearchError {
    fn from(e: meilisearch_sdk::errors::Error) -> Self {
        SearchError::Index(e.to_string())
    }
}

/// Result type alias for search operations
pub type Result<T> = std::result::Result<T, SearchError>;
