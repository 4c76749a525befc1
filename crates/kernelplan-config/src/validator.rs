//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::{Config, EmbeddingBackend, RetrievalBackend};

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Turn the first error into a [`ConfigError`].
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(error) => Err(ConfigError::InvalidValue {
                field: error.path,
                message: error.message,
            }),
            None => Ok(self.warnings),
        }
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_retrieval(config, &mut result);
        Self::validate_embedding(config, &mut result);
        Self::validate_binder(config, &mut result);
        Self::validate_synthesis(config, &mut result);

        result
    }

    fn validate_retrieval(config: &Config, result: &mut ValidationResult) {
        let retrieval = &config.retrieval;

        if retrieval.search_limit == 0 {
            result.add_error(ValidationError::new(
                "retrieval.search_limit",
                "search_limit must be greater than 0",
            ));
        }

        if !(-1.0..=1.0).contains(&retrieval.score_threshold) {
            result.add_warning(ValidationWarning::new(
                "retrieval.score_threshold",
                "score_threshold is outside the cosine similarity range [-1, 1]",
            ));
        }

        match retrieval.backend {
            RetrievalBackend::Qdrant => {
                let url = &retrieval.qdrant_url;
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    result.add_error(ValidationError::new(
                        "retrieval.qdrant_url",
                        "qdrant_url must start with http:// or https://",
                    ));
                }
                if retrieval.collection.trim().is_empty() {
                    result.add_error(ValidationError::new(
                        "retrieval.collection",
                        "Collection name cannot be empty",
                    ));
                }
            }
            RetrievalBackend::Catalog => match &retrieval.catalog_path {
                None => result.add_error(ValidationError::new(
                    "retrieval.catalog_path",
                    "The catalog backend requires catalog_path",
                )),
                Some(path) if !path.exists() => result.add_warning(ValidationWarning::new(
                    "retrieval.catalog_path",
                    format!("Catalog file does not exist: {:?}", path),
                )),
                Some(_) => {}
            },
        }
    }

    fn validate_embedding(config: &Config, result: &mut ValidationResult) {
        let embedding = &config.embedding;

        if embedding.dimension == 0 {
            result.add_error(ValidationError::new(
                "embedding.dimension",
                "dimension must be greater than 0",
            ));
        }

        if embedding.provider == EmbeddingBackend::OpenAI {
            if embedding.api_key.is_none() {
                result.add_warning(ValidationWarning::new(
                    "embedding.api_key",
                    "API key is not set, may need to be set via OPENAI_API_KEY",
                ));
            }
            let url = &embedding.base_url;
            if !url.starts_with("http://") && !url.starts_with("https://") {
                result.add_error(ValidationError::new(
                    "embedding.base_url",
                    "base_url must start with http:// or https://",
                ));
            }
        }

        if embedding.provider == EmbeddingBackend::Hash {
            result.add_warning(ValidationWarning::new(
                "embedding.provider",
                "The hash embedding is not semantic; tool rankings will be arbitrary",
            ));
        }
    }

    fn validate_binder(config: &Config, result: &mut ValidationResult) {
        if config.binder.general_limit == 0 {
            result.add_error(ValidationError::new(
                "binder.general_limit",
                "general_limit must be greater than 0",
            ));
        }

        if config.binder.general_limit > config.retrieval.search_limit {
            result.add_warning(ValidationWarning::new(
                "binder.general_limit",
                format!(
                    "general_limit ({}) exceeds retrieval.search_limit ({}); at most {} tools will be bound",
                    config.binder.general_limit,
                    config.retrieval.search_limit,
                    config.retrieval.search_limit
                ),
            ));
        }
    }

    fn validate_synthesis(config: &Config, result: &mut ValidationResult) {
        if config.synthesis.model.trim().is_empty() {
            result.add_error(ValidationError::new(
                "synthesis.model",
                "Model cannot be empty",
            ));
        }

        let chain = &config.synthesis.chain_name;
        if chain.is_empty() || !chain.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            result.add_error(ValidationError::new(
                "synthesis.chain_name",
                "chain_name must be a non-empty identifier",
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
