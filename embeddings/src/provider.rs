//! Embedding providers.
//!
//! The index only ever talks to [`EmbeddingProvider`], so hosts and tests can
//! swap the HTTP client for anything that maps text to a vector.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{EmbeddingError, Result};
use crate::{DEFAULT_BASE_URL, DEFAULT_MODEL, Embedding};

/// Request for generating an embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingRequest {
    /// Text to embed.
    pub text: String,

    /// Model to use (provider-specific).
    pub model: Option<String>,
}

impl EmbeddingRequest {
    /// Create a new embedding request.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            model: None,
        }
    }

    /// Set the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

/// Trait for embedding providers.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Get the name of this provider.
    fn name(&self) -> &str;

    /// Get the model this provider embeds with.
    fn model(&self) -> &str;

    /// Check if the provider is usable (API key set, etc.).
    fn is_available(&self) -> bool;

    /// Generate an embedding for the given text.
    async fn embed(&self, request: EmbeddingRequest) -> Result<Embedding>;

    /// Generate an embedding, degrading every failure to an empty vector.
    ///
    /// Empty text short-circuits without calling the provider.
    async fn embed_or_empty(&self, text: &str) -> Embedding {
        if text.is_empty() {
            debug!("Skipping embedding for empty text");
            return Vec::new();
        }

        match self.embed(EmbeddingRequest::new(text)).await {
            Ok(embedding) => embedding,
            Err(e) => {
                warn!("Embedding unavailable from {}: {e}", self.name());
                Vec::new()
            }
        }
    }
}

/// Provider for OpenAI-compatible `/embeddings` endpoints.
pub struct OpenAIProvider {
    /// API key. Blank means unset.
    api_key: String,

    /// API base URL.
    base_url: String,

    /// HTTP client.
    client: reqwest::Client,

    /// Default model.
    model: String,
}

impl OpenAIProvider {
    /// Create a new provider with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            client: reqwest::Client::new(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the default model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAIProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn is_available(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    async fn embed(&self, request: EmbeddingRequest) -> Result<Embedding> {
        if !self.is_available() {
            return Err(EmbeddingError::ProviderNotConfigured);
        }
        if request.text.is_empty() {
            return Err(EmbeddingError::EmptyInput);
        }

        let model = request.model.unwrap_or_else(|| self.model.clone());

        debug!("Generating embedding with model: {model}");

        let body = serde_json::json!({
            "input": request.text,
            "model": model
        });

        let response = self
            .client
            .post(format!("{}/embeddings", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(EmbeddingError::ApiRequest {
                status: status.as_u16(),
                body: text,
            });
        }

        let result: OpenAIEmbeddingResponse = serde_json::from_str(&text)?;

        let embedding = result
            .data
            .into_iter()
            .next()
            .ok_or_else(|| EmbeddingError::InvalidResponse("no embedding in response".to_string()))?
            .embedding;

        debug!("Generated embedding with {} dimensions", embedding.len());

        Ok(embedding)
    }
}

/// OpenAI API response format. Only `data[0].embedding` is read.
#[derive(Debug, Deserialize)]
struct OpenAIEmbeddingResponse {
    data: Vec<OpenAIEmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct OpenAIEmbeddingData {
    embedding: Vec<f32>,
}
