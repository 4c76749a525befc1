//! Errors raised while reading a kernel description.

use thiserror::Error;

/// The input could not be read as a kernel description at all.
///
/// Problems inside an otherwise readable description are reported as
/// diagnostics instead.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("The document does not contain a 'kernels' array")]
    MissingKernels,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
