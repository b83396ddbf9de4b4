//! # Similar Notes Engine
//!
//! Wires the embedding index to a note vault:
//!
//! - **Rebuild**: embed every note in the vault at startup
//! - **Upsert**: re-embed a note whenever it changes
//! - **Query**: rank notes by similarity to the text in the editor
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Similar Notes Engine                         │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                                                                 │
//! │  ┌──────────────┐   VaultEvent    ┌──────────────┐              │
//! │  │ EventSource  │ ──────────────► │ SimilarNotes │              │
//! │  └──────────────┘                 └──────────────┘              │
//! │                                     │         │                 │
//! │                                     ▼         ▼                 │
//! │                         ┌──────────────┐  ┌──────────────────┐  │
//! │                         │ VaultScanner │  │ EmbeddingIndex   │  │
//! │                         └──────────────┘  │ + Provider       │  │
//! │                                           └──────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use notesim_engine::{EngineConfig, SimilarNotes};
//!
//! let config = EngineConfig::new("/path/to/vault").with_api_key(key);
//! let mut engine = SimilarNotes::from_config(config);
//! engine.rebuild().await?;
//!
//! let similar = engine.query("meeting notes about the roadmap", 5).await;
//! ```

pub mod config;
pub mod engine;
pub mod error;

pub use config::{DEFAULT_TOP_N, EngineConfig, Settings};
pub use engine::{EngineOutput, EngineStats, SimilarNotes};
pub use error::{EngineError, Result};

// Re-export from dependencies for convenience
pub use notesim_embeddings::{EmbeddingProvider, SimilarityResult, UpsertOutcome};
pub use notesim_vault_watcher::{EventSource, VaultConfig, VaultEvent, VaultWatcher};
