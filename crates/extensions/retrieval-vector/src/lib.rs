//! Tool retrieval backends for KernelPlan.
//!
//! Provides [`ToolRetriever`](kernelplan_protocols::ToolRetriever)
//! implementations that rank tools by cosine similarity between the query
//! embedding and each tool description.
//!
//! - [`QdrantRetriever`] - searches a Qdrant collection over HTTP
//! - [`CatalogRetriever`] - searches an in-memory index built from a JSON catalog

mod catalog;
mod embedding;
mod explain;
mod index;
mod openai;
mod qdrant;

pub use catalog::{CatalogError, CatalogRetriever, ToolCatalog, ToolEntry};
pub use embedding::{Embedding, EmbeddingError, EmbeddingProvider, SimpleHashEmbedding};
pub use explain::explain;
pub use index::{SearchResult, VectorIndex};
pub use openai::{OpenAIEmbedding, OpenAIEmbeddingConfig};
pub use qdrant::QdrantRetriever;
