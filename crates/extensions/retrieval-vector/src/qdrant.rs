//! Qdrant similarity search.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use kernelplan_config::RetrievalConfig;
use kernelplan_protocols::{RetrievalError, ToolCandidate, ToolRetriever};

use crate::embedding::EmbeddingProvider;

/// Searches a Qdrant collection whose points carry tool descriptions.
pub struct QdrantRetriever {
    client: reqwest::Client,
    provider: Arc<dyn EmbeddingProvider>,
    base_url: String,
    collection: String,
    limit: usize,
    score_threshold: f32,
    name_field: String,
    text_field: String,
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    vector: &'a [f32],
    limit: usize,
    with_payload: bool,
    score_threshold: f32,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    result: Vec<ScoredPoint>,
}

#[derive(Debug, Deserialize)]
struct ScoredPoint {
    id: serde_json::Value,
    score: f32,
    #[serde(default)]
    payload: Option<serde_json::Map<String, serde_json::Value>>,
}

impl QdrantRetriever {
    pub fn new(
        config: &RetrievalConfig,
        provider: Arc<dyn EmbeddingProvider>,
    ) -> Result<Self, RetrievalError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| RetrievalError::Unavailable(format!("HTTP client error: {}", e)))?;

        Ok(Self {
            client,
            provider,
            base_url: config.qdrant_url.trim_end_matches('/').to_string(),
            collection: config.collection.clone(),
            limit: config.search_limit,
            score_threshold: config.score_threshold,
            name_field: config.name_field.clone(),
            text_field: config.text_field.clone(),
        })
    }

    fn search_url(&self) -> String {
        format!(
            "{}/collections/{}/points/search",
            self.base_url, self.collection
        )
    }

    fn to_candidate(&self, point: ScoredPoint) -> ToolCandidate {
        let field = |key: &str| {
            point
                .payload
                .as_ref()
                .and_then(|payload| payload.get(key))
                .and_then(|value| value.as_str())
                .map(str::to_string)
        };
        let name = field(&self.name_field).unwrap_or_else(|| format!("Server {}", point_id(&point.id)));
        let description = field(&self.text_field).unwrap_or_else(|| "No description available".to_string());
        ToolCandidate::new(name, description, point.score)
    }
}

fn point_id(id: &serde_json::Value) -> String {
    match id {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[async_trait]
impl ToolRetriever for QdrantRetriever {
    async fn retrieve(&self, query: &str) -> Result<Vec<ToolCandidate>, RetrievalError> {
        let embedding = self.provider.embed(query).await?;
        let request = SearchRequest {
            vector: &embedding.vector,
            limit: self.limit,
            with_payload: true,
            score_threshold: self.score_threshold,
        };

        debug!("Searching collection '{}' for '{}'", self.collection, query);
        let response = self
            .client
            .post(self.search_url())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    RetrievalError::Unavailable(e.to_string())
                } else {
                    RetrievalError::Request(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(RetrievalError::Request(format!(
                "Qdrant returned {}: {}",
                status, body
            )));
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| RetrievalError::Response(e.to_string()))?;

        info!(
            "Found {} results in collection '{}'",
            parsed.result.len(),
            self.collection
        );
        Ok(parsed
            .result
            .into_iter()
            .map(|point| self.to_candidate(point))
            .collect())
    }
}

#[cfg(test)]
#[path = "qdrant_tests.rs"]
mod tests;
