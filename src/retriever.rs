//! Retriever construction from configuration.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use kernelplan_config::{Config, EmbeddingBackend, RetrievalBackend};
use kernelplan_protocols::ToolRetriever;
use kernelplan_retrieval::{
    CatalogRetriever, EmbeddingProvider, OpenAIEmbedding, OpenAIEmbeddingConfig,
    QdrantRetriever, SimpleHashEmbedding, ToolCatalog,
};

/// Build the embedding provider named by `[embedding]`.
pub(crate) fn build_embedding(
    config: &Config,
) -> Result<Arc<dyn EmbeddingProvider>, Box<dyn std::error::Error>> {
    let provider: Arc<dyn EmbeddingProvider> = match config.embedding.provider {
        EmbeddingBackend::OpenAI => {
            let openai = OpenAIEmbeddingConfig::from_config(&config.embedding)?
                .with_timeout(Duration::from_secs(config.retrieval.timeout_seconds));
            Arc::new(OpenAIEmbedding::new(openai)?)
        }
        EmbeddingBackend::Hash => Arc::new(SimpleHashEmbedding::new(config.embedding.dimension)),
    };
    Ok(provider)
}

/// Build the tool retriever named by `[retrieval]`.
pub(crate) async fn build_retriever(
    config: &Config,
) -> Result<Arc<dyn ToolRetriever>, Box<dyn std::error::Error>> {
    let provider = build_embedding(config)?;

    match config.retrieval.backend {
        RetrievalBackend::Qdrant => {
            info!(
                "Using Qdrant collection '{}' at {}",
                config.retrieval.collection, config.retrieval.qdrant_url
            );
            Ok(Arc::new(QdrantRetriever::new(&config.retrieval, provider)?))
        }
        RetrievalBackend::Catalog => {
            let path = config
                .retrieval
                .catalog_path
                .as_ref()
                .ok_or("retrieval.catalog_path is required for the catalog backend")?;
            info!("Using tool catalog {}", path.display());
            let catalog = ToolCatalog::load(path)?;
            let retriever = CatalogRetriever::from_config(catalog, provider, &config.retrieval).await?;
            Ok(Arc::new(retriever))
        }
    }
}
