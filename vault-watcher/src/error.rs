//! Error types for the vault watcher.

use thiserror::Error;

/// Result type alias for watcher operations.
pub type Result<T> = std::result::Result<T, WatcherError>;

/// Errors that can occur while scanning or watching a vault.
#[derive(Error, Debug)]
pub enum WatcherError {
    /// Vault root not found.
    #[error("vault not found: {0}")]
    VaultNotFound(String),

    /// Path is not a note of this vault.
    #[error("not a vault note: {0}")]
    NotANote(String),

    /// Watcher already running.
    #[error("watcher already running for: {0}")]
    AlreadyWatching(String),

    /// Notify error.
    #[error("notify error: {0}")]
    Notify(#[from] notify::Error),

    /// Walkdir error.
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
