//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    #[serde(default)]
    pub embedding: EmbeddingConfig,

    #[serde(default)]
    pub binder: BinderConfig,

    #[serde(default)]
    pub synthesis: SynthesisConfig,
}

/// Where tool candidates come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetrievalBackend {
    /// A Qdrant collection of tool descriptions.
    #[default]
    Qdrant,
    /// A local JSON catalog indexed in memory.
    Catalog,
}

/// Similarity search configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    #[serde(default)]
    pub backend: RetrievalBackend,

    #[serde(default = "default_qdrant_url")]
    pub qdrant_url: String,

    #[serde(default = "default_collection")]
    pub collection: String,

    /// Maximum number of candidates per query.
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,

    /// Candidates scoring below this are dropped by the provider.
    #[serde(default = "default_score_threshold")]
    pub score_threshold: f32,

    /// Payload field holding the tool name.
    #[serde(default = "default_name_field")]
    pub name_field: String,

    /// Payload field holding the tool description.
    #[serde(default = "default_text_field")]
    pub text_field: String,

    /// Tool catalog for the `catalog` backend.
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,

    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            backend: RetrievalBackend::default(),
            qdrant_url: default_qdrant_url(),
            collection: default_collection(),
            search_limit: default_search_limit(),
            score_threshold: default_score_threshold(),
            name_field: default_name_field(),
            text_field: default_text_field(),
            catalog_path: None,
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_qdrant_url() -> String {
    "http://localhost:6333".to_string()
}

fn default_collection() -> String {
    "mcp_servers".to_string()
}

fn default_search_limit() -> usize {
    5
}

fn default_score_threshold() -> f32 {
    0.01
}

fn default_name_field() -> String {
    "name".to_string()
}

fn default_text_field() -> String {
    "description".to_string()
}

fn default_timeout() -> u64 {
    10
}

/// Embedding provider selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    #[default]
    OpenAI,
    /// Deterministic word-hash embedding. Not semantic; offline use only.
    Hash,
}

/// Embedding configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    #[serde(default)]
    pub provider: EmbeddingBackend,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_embedding_model")]
    pub model: String,

    #[serde(default = "default_embedding_url")]
    pub base_url: String,

    #[serde(default = "default_dimension")]
    pub dimension: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingBackend::default(),
            api_key: None,
            model: default_embedding_model(),
            base_url: default_embedding_url(),
            dimension: default_dimension(),
        }
    }
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_embedding_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_dimension() -> usize {
    1536
}

/// Tool binding configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinderConfig {
    /// Tools kept for a kernel that needs tools but declares no types.
    #[serde(default = "default_general_limit")]
    pub general_limit: usize,
}

impl Default for BinderConfig {
    fn default() -> Self {
        Self {
            general_limit: default_general_limit(),
        }
    }
}

fn default_general_limit() -> usize {
    3
}

/// Pipeline synthesis configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisConfig {
    /// Model identifier handed to the agent runtime for every stage.
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_chain_name")]
    pub chain_name: String,

    /// Whether each chain stage sees all previous outputs.
    #[serde(default)]
    pub cumulative: bool,

    /// Synthesize even when some declared tool types could not be bound.
    #[serde(default = "default_true")]
    pub allow_unfulfilled_tools: bool,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            chain_name: default_chain_name(),
            cumulative: false,
            allow_unfulfilled_tools: true,
        }
    }
}

fn default_model() -> String {
    "openai.gpt-4.1-nano".to_string()
}

fn default_chain_name() -> String {
    "WorkflowChain".to_string()
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.retrieval.backend, RetrievalBackend::Qdrant);
        assert_eq!(config.retrieval.collection, "mcp_servers");
        assert_eq!(config.retrieval.search_limit, 5);
        assert_eq!(config.embedding.model, "text-embedding-3-small");
        assert_eq!(config.embedding.dimension, 1536);
        assert_eq!(config.binder.general_limit, 3);
        assert_eq!(config.synthesis.chain_name, "WorkflowChain");
        assert!(config.synthesis.allow_unfulfilled_tools);
        assert!(!config.synthesis.cumulative);
    }

    #[test]
    fn test_partial_section_uses_field_defaults() {
        let config: Config = toml::from_str(
            r#"
            [retrieval]
            backend = "catalog"
            catalog_path = "tools.json"
            "#,
        )
        .unwrap();
        assert_eq!(config.retrieval.backend, RetrievalBackend::Catalog);
        assert_eq!(config.retrieval.search_limit, 5);
        assert_eq!(config.retrieval.qdrant_url, "http://localhost:6333");
    }

    #[test]
    fn test_embedding_backend_names() {
        let config: Config = toml::from_str(
            r#"
            [embedding]
            provider = "hash"
            dimension = 64
            "#,
        )
        .unwrap();
        assert_eq!(config.embedding.provider, EmbeddingBackend::Hash);
        assert_eq!(config.embedding.dimension, 64);
    }
}
