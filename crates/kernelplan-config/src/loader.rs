//! Configuration loader.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ConfigError;
use crate::schema::Config;

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"));

/// Configuration loader with environment variable substitution.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        Self::load_str(&content)
    }

    /// Load configuration from a string.
    pub fn load_str(content: &str) -> Result<Config, ConfigError> {
        let expanded = Self::expand_env_vars(content)?;
        let mut config: Config = toml::from_str(&expanded)?;
        if let Some(path) = config.retrieval.catalog_path.take() {
            let expanded = Self::expand_path(&path.to_string_lossy());
            config.retrieval.catalog_path = Some(PathBuf::from(expanded));
        }
        Ok(config)
    }

    /// Load the file if it exists, otherwise use defaults. Environment
    /// overrides are applied either way.
    pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
        let mut config = if path.exists() {
            Self::load(path)?
        } else {
            Config::default()
        };
        Self::apply_overrides(&mut config, |key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply `OPENAI_API_KEY`, `QDRANT_URL` and `QDRANT_COLLECTION_NAME`.
    ///
    /// The API key only fills an unset value; the Qdrant variables replace
    /// whatever the file says.
    pub fn apply_overrides(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
        if config.embedding.api_key.is_none() {
            config.embedding.api_key = lookup("OPENAI_API_KEY");
        }
        if let Some(url) = lookup("QDRANT_URL") {
            config.retrieval.qdrant_url = url;
        }
        if let Some(collection) = lookup("QDRANT_COLLECTION_NAME") {
            config.retrieval.collection = collection;
        }
    }

    /// Expand environment variables in the format `${VAR}`.
    fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
        let mut result = content.to_string();

        for cap in ENV_VAR.captures_iter(content) {
            let var_name = &cap[1];
            let var_value = std::env::var(var_name)
                .map_err(|_| ConfigError::EnvVarNotSet(var_name.to_string()))?;
            result = result.replace(&cap[0], &var_value);
        }

        Ok(result)
    }

    /// Expand shell-style paths (e.g., `~/.config`).
    pub fn expand_path(path: &str) -> String {
        shellexpand::tilde(path).to_string()
    }
}
