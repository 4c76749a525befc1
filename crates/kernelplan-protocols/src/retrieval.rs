//! Similarity-search protocol used by the tool binder.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::RetrievalError;
use crate::kernel::AssignedTool;

/// A tool returned by a similarity search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCandidate {
    pub name: String,
    pub description: String,
    /// Higher is more relevant. The scale is provider-defined.
    pub relevance_score: f32,
}

impl ToolCandidate {
    pub fn new(name: impl Into<String>, description: impl Into<String>, relevance_score: f32) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            relevance_score,
        }
    }

    /// Copy this candidate into a kernel assignment of the given type.
    pub fn assign(&self, tool_type: impl Into<String>) -> AssignedTool {
        AssignedTool::new(
            self.name.clone(),
            self.description.clone(),
            self.relevance_score,
            tool_type,
        )
    }
}

/// Embedding + nearest-neighbor search round trip.
///
/// Implementations return candidates ordered by relevance, highest first.
#[async_trait]
pub trait ToolRetriever: Send + Sync {
    async fn retrieve(&self, query: &str) -> Result<Vec<ToolCandidate>, RetrievalError>;
}
