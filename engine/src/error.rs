//! Error types for the similar-notes engine.

use thiserror::Error;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur in the engine.
///
/// Embedding failures are not among them: those degrade to empty vectors
/// inside the index.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Vault scanning or watching error.
    #[error("watcher error: {0}")]
    Watcher(#[from] notesim_vault_watcher::WatcherError),

    /// Configuration file could not be parsed.
    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
