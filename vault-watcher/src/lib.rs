//! # Vault Watcher
//!
//! This crate tells the similarity engine which notes exist and when they
//! change.
//!
//! ## Features
//!
//! - **Vault Scanning**: Read every note for a full index rebuild
//! - **Change Events**: Modified, created, deleted and renamed notes plus
//!   editor content changes, as [`VaultEvent`]s
//! - **Injectable Sources**: Anything implementing [`EventSource`] can drive
//!   the engine, from a filesystem watcher to a host-fed channel
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Vault Watcher                                │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  VaultConfig ──► VaultScanner ──► VaultDocument                 │
//! │       │                                                         │
//! │       ▼                                                         │
//! │  VaultWatcher / ChannelSource ──► EventSource ──► VaultEvent    │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod event;
pub mod scanner;
pub mod source;
pub mod watcher;

pub use config::VaultConfig;
pub use error::{Result, WatcherError};
pub use event::{VaultEvent, VaultEventKind};
pub use scanner::{VaultDocument, VaultScanner};
pub use source::{ChannelSource, EventSource, channel};
pub use watcher::VaultWatcher;
