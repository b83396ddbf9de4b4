//! # Embeddings
//!
//! Semantic embedding generation and similarity search over a note vault.
//!
//! ## Features
//!
//! - **Embedding Generation**: Convert note text to dense vectors through an
//!   OpenAI-compatible `/embeddings` endpoint
//! - **Similarity Search**: Rank every indexed note against a query by cosine
//!   similarity
//! - **Graceful Degradation**: A failed embedding becomes an empty vector, which
//!   never matches anything until the note is embedded again
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Embeddings System                            │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  EmbeddingProvider ──► Embedding ──► EmbeddingIndex             │
//! │       │                                   │                     │
//! │       ▼                                   ▼                     │
//! │  OpenAIProvider                 cosine_similarity / rank        │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod index;
pub mod provider;
pub mod similarity;

pub use error::{EmbeddingError, Result};
pub use index::{DocumentRecord, EmbeddingIndex, UpsertOutcome};
pub use provider::{EmbeddingProvider, EmbeddingRequest, OpenAIProvider};
pub use similarity::{SimilarityResult, cosine_similarity, rank};

/// A dense vector embedding. Empty means "embedding unavailable".
pub type Embedding = Vec<f32>;

/// Default embeddings endpoint base.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default embedding model.
pub const DEFAULT_MODEL: &str = "text-embedding-ada-002";
