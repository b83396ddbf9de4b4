//! Configuration for the similar-notes engine.

use std::path::{Path, PathBuf};

use notesim_embeddings::{DEFAULT_BASE_URL, DEFAULT_MODEL, OpenAIProvider};
use notesim_vault_watcher::VaultConfig;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;

/// Default number of similar notes returned per query.
pub const DEFAULT_TOP_N: usize = 10;

/// User settings blob. The only recognized option is `apiKey`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// API credential for the embeddings endpoint. Empty means unset.
    pub api_key: String,
}

impl Settings {
    /// Parse a settings blob. Unknown keys are ignored; a malformed blob
    /// falls back to defaults.
    pub fn from_json(blob: &str) -> Self {
        if blob.trim().is_empty() {
            return Self::default();
        }
        serde_json::from_str(blob).unwrap_or_else(|e| {
            warn!("Ignoring malformed settings: {e}");
            Self::default()
        })
    }

    /// Whether an API key is present.
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

/// Configuration for the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// User settings.
    pub settings: Settings,

    /// Embedding model identifier.
    pub model: String,

    /// Base URL of the embeddings API.
    pub base_url: String,

    /// How many similar notes to return.
    pub top_n: usize,

    /// The vault to index.
    pub vault: VaultConfig,
}

impl EngineConfig {
    /// Create a configuration for the vault at `root` with default values.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            settings: Settings::default(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            top_n: DEFAULT_TOP_N,
            vault: VaultConfig::new(root),
        }
    }

    /// Set the API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.settings.api_key = key.into();
        self
    }

    /// Set the embedding model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the API base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the result count.
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// Parse a TOML configuration.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Load a TOML configuration file.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = tokio::fs::read_to_string(path).await?;
        Self::from_toml_str(&contents)
    }

    /// Build the HTTP embedding provider described by this configuration.
    pub fn provider(&self) -> OpenAIProvider {
        OpenAIProvider::new(self.settings.api_key.clone())
            .with_base_url(self.base_url.clone())
            .with_model(self.model.clone())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new(".")
    }
}
