//! Error types for the embeddings system.

use thiserror::Error;

/// Result type alias for embedding operations.
pub type Result<T> = std::result::Result<T, EmbeddingError>;

/// Errors that can occur while producing an embedding.
///
/// These never reach index callers: [`crate::EmbeddingProvider::embed_or_empty`]
/// turns every variant into an empty vector and a warning.
#[derive(Error, Debug)]
pub enum EmbeddingError {
    /// No API key configured.
    #[error("embedding provider not configured: missing API key")]
    ProviderNotConfigured,

    /// Nothing to embed.
    #[error("cannot embed empty text")]
    EmptyInput,

    /// Provider answered with a non-success status.
    #[error("API request failed with status {status}: {body}")]
    ApiRequest { status: u16, body: String },

    /// Invalid response from provider.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}
