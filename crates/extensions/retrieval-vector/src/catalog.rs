//! Tool catalog retriever.
//!
//! Loads `[{name, description}]` from a JSON file, embeds every description
//! once, and answers queries from an in-memory [`VectorIndex`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use kernelplan_config::RetrievalConfig;
use kernelplan_protocols::{RetrievalError, ToolCandidate, ToolRetriever};

use crate::embedding::{EmbeddingError, EmbeddingProvider};
use crate::index::VectorIndex;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to embed catalog: {0}")]
    Embedding(#[from] EmbeddingError),
}

/// One tool of the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolEntry {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl ToolEntry {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    /// Text that gets embedded for this tool.
    fn search_text(&self) -> &str {
        if self.description.trim().is_empty() {
            &self.name
        } else {
            &self.description
        }
    }
}

/// A list of tools, read from either a bare array or `{"tools": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolCatalog {
    pub tools: Vec<ToolEntry>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    List(Vec<ToolEntry>),
    Wrapped { tools: Vec<ToolEntry> },
}

impl ToolCatalog {
    pub fn new(tools: Vec<ToolEntry>) -> Self {
        Self { tools }
    }

    pub fn from_json(input: &str) -> Result<Self, CatalogError> {
        let tools = match serde_json::from_str::<CatalogFile>(input)? {
            CatalogFile::List(tools) => tools,
            CatalogFile::Wrapped { tools } => tools,
        };
        Ok(Self { tools })
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Retriever over an embedded [`ToolCatalog`].
pub struct CatalogRetriever {
    provider: Arc<dyn EmbeddingProvider>,
    index: VectorIndex,
    descriptions: HashMap<String, String>,
    limit: usize,
    score_threshold: f32,
}

impl CatalogRetriever {
    /// Embed every catalog entry. Later entries replace earlier ones with
    /// the same name.
    pub async fn build(
        catalog: ToolCatalog,
        provider: Arc<dyn EmbeddingProvider>,
        limit: usize,
        score_threshold: f32,
    ) -> Result<Self, CatalogError> {
        let texts: Vec<&str> = catalog.tools.iter().map(ToolEntry::search_text).collect();
        let embeddings = provider.embed_batch(&texts).await?;

        let index = VectorIndex::new();
        let mut descriptions = HashMap::new();
        for (tool, embedding) in catalog.tools.into_iter().zip(embeddings) {
            index.insert(tool.name.clone(), embedding);
            descriptions.insert(tool.name, tool.description);
        }
        info!("Indexed {} catalog tools", index.len());

        Ok(Self {
            provider,
            index,
            descriptions,
            limit,
            score_threshold,
        })
    }

    /// Build using the limit and threshold of the `[retrieval]` section.
    pub async fn from_config(
        catalog: ToolCatalog,
        provider: Arc<dyn EmbeddingProvider>,
        config: &RetrievalConfig,
    ) -> Result<Self, CatalogError> {
        Self::build(catalog, provider, config.search_limit, config.score_threshold).await
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

#[async_trait]
impl ToolRetriever for CatalogRetriever {
    async fn retrieve(&self, query: &str) -> Result<Vec<ToolCandidate>, RetrievalError> {
        let embedding = self.provider.embed(query).await?;
        let results = self.index.search(&embedding, self.limit, self.score_threshold);
        debug!("Catalog search for '{}' returned {} tools", query, results.len());

        Ok(results
            .into_iter()
            .map(|result| {
                let description = self
                    .descriptions
                    .get(&result.id)
                    .cloned()
                    .unwrap_or_default();
                ToolCandidate::new(result.id, description, result.score)
            })
            .collect())
    }
}

#[cfg(test)]
#[path = "catalog_tests.rs"]
mod tests;
