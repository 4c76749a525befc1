//! Tool retrieval errors.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RetrievalError {
    #[error("Embedding failed: {0}")]
    Embedding(String),

    #[error("Search request failed: {0}")]
    Request(String),

    #[error("Invalid search response: {0}")]
    Response(String),

    #[error("Retrieval backend unavailable: {0}")]
    Unavailable(String),
}
