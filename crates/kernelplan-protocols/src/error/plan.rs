//! Top-level error type.

use thiserror::Error;

use super::{CycleError, DocumentError, RetrievalError, SynthesisError};

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    #[error("Ordering error: {0}")]
    Cycle(#[from] CycleError),

    #[error("Retrieval error: {0}")]
    Retrieval(#[from] RetrievalError),

    #[error("Synthesis error: {0}")]
    Synthesis(#[from] SynthesisError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_error_from() {
        let err = PlanError::from(CycleError::new(vec!["A".into()], vec![]));
        assert!(err.to_string().contains("Ordering error"));
    }

    #[test]
    fn test_document_error_from() {
        let err = PlanError::from(DocumentError::MissingKernels);
        assert!(err.to_string().contains("Document error"));
    }

    #[test]
    fn test_synthesis_error_from() {
        let err = PlanError::from(SynthesisError::PlanMismatch("missing C".into()));
        assert!(err.to_string().contains("Synthesis error"));
    }

    #[test]
    fn test_validation_error() {
        let err = PlanError::Validation("2 errors".to_string());
        assert!(err.to_string().contains("Validation error"));
    }
}
