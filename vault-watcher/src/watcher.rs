//! Filesystem-backed vault watcher.

use async_trait::async_trait;
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::config::VaultConfig;
use crate::error::{Result, WatcherError};
use crate::event::{VaultEvent, VaultEventKind, from_notify};
use crate::source::{DEFAULT_CHANNEL_CAPACITY, EventSource};

/// Watches a vault directory and emits [`VaultEvent`]s for its notes.
pub struct VaultWatcher {
    /// Vault configuration.
    config: VaultConfig,

    /// Internal notify watcher, present while running.
    watcher: Option<RecommendedWatcher>,

    /// Event sender handed to the notify callback.
    event_tx: mpsc::Sender<VaultEvent>,

    /// Event receiver drained through [`EventSource`].
    event_rx: mpsc::Receiver<VaultEvent>,
}

impl VaultWatcher {
    /// Create a watcher for the vault. The root must be an existing directory.
    ///
    /// The root is canonicalized, since notify reports absolute paths.
    pub fn new(mut config: VaultConfig) -> Result<Self> {
        if !config.root.is_dir() {
            return Err(WatcherError::VaultNotFound(
                config.root.display().to_string(),
            ));
        }
        config.root = std::fs::canonicalize(&config.root)?;

        let (event_tx, event_rx) = mpsc::channel(DEFAULT_CHANNEL_CAPACITY);

        Ok(Self {
            config,
            watcher: None,
            event_tx,
            event_rx,
        })
    }

    /// The vault being watched.
    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    /// Start watching the vault recursively.
    pub fn start(&mut self) -> Result<()> {
        if self.watcher.is_some() {
            return Err(WatcherError::AlreadyWatching(
                self.config.root.display().to_string(),
            ));
        }

        let event_tx = self.event_tx.clone();
        let config = self.config.clone();

        let mut watcher = notify::recommended_watcher(
            move |res: std::result::Result<notify::Event, notify::Error>| match res {
                Ok(event) => {
                    for vault_event in from_notify(event) {
                        if !is_relevant(&config, &vault_event.kind) {
                            continue;
                        }
                        debug!("Vault event: {:?}", vault_event.kind);
                        if let Err(e) = event_tx.blocking_send(vault_event) {
                            error!("Failed to send vault event: {e}");
                        }
                    }
                }
                Err(e) => {
                    error!("Watch error: {e}");
                }
            },
        )?;

        let mode = if self.config.max_depth == Some(0) {
            RecursiveMode::NonRecursive
        } else {
            RecursiveMode::Recursive
        };
        watcher.watch(&self.config.root, mode)?;

        self.watcher = Some(watcher);
        info!("Watching vault: {}", self.config.root.display());

        Ok(())
    }

    /// Stop watching. Events already queued can still be drained.
    pub fn stop(&mut self) {
        if let Some(mut watcher) = self.watcher.take() {
            let _ = watcher.unwatch(&self.config.root);
            info!("Stopped watching vault: {}", self.config.root.display());
        }
    }

    /// Check if the watcher is running.
    pub fn is_running(&self) -> bool {
        self.watcher.is_some()
    }
}

#[async_trait]
impl EventSource for VaultWatcher {
    async fn next_event(&mut self) -> Option<VaultEvent> {
        self.event_rx.recv().await
    }
}

/// Whether an event touches a note of this vault.
fn is_relevant(config: &VaultConfig, kind: &VaultEventKind) -> bool {
    match kind {
        VaultEventKind::Modified { path }
        | VaultEventKind::Created { path }
        | VaultEventKind::Deleted { path } => config.accepts(path),
        VaultEventKind::Renamed { from, to } => config.accepts(from) || config.accepts(to),
        VaultEventKind::EditorChanged { .. } => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};
    use std::time::Duration;
    use tempfile::TempDir;

    /// Drain events until one touches `target`, returning everything seen.
    async fn events_until(watcher: &mut VaultWatcher, target: &Path) -> Vec<VaultEventKind> {
        let mut seen = Vec::new();
        loop {
            let event = tokio::time::timeout(Duration::from_secs(10), watcher.next_event())
                .await
                .expect("timed out waiting for a vault event")
                .expect("watcher channel closed");
            let hit = matches!(
                &event.kind,
                VaultEventKind::Created { path } | VaultEventKind::Modified { path }
                    if path == target
            );
            seen.push(event.kind);
            if hit {
                return seen;
            }
        }
    }

    #[test]
    fn test_watcher_creation() {
        let temp_dir = TempDir::new().unwrap();
        let watcher = VaultWatcher::new(VaultConfig::new(temp_dir.path())).unwrap();
        assert!(!watcher.is_running());
    }

    #[test]
    fn test_relative_root_is_canonicalized() {
        let watcher = VaultWatcher::new(VaultConfig::new(".")).unwrap();
        let root = &watcher.config().root;

        assert!(root.is_absolute());
        assert_eq!(*root, std::env::current_dir().unwrap().canonicalize().unwrap());
    }

    #[tokio::test]
    async fn test_note_write_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let mut watcher = VaultWatcher::new(VaultConfig::new(temp_dir.path())).unwrap();
        let root = watcher.config().root.clone();
        watcher.start().unwrap();

        // Metadata writes land first and must never surface.
        std::fs::create_dir(root.join(".obsidian")).unwrap();
        std::fs::write(root.join(".obsidian").join("workspace.md"), "{}").unwrap();
        std::fs::write(root.join("image.png"), [0u8; 4]).unwrap();

        let note = root.join("note.md");
        std::fs::write(&note, "hello vault").unwrap();

        let seen = events_until(&mut watcher, &note).await;
        watcher.stop();

        for kind in &seen {
            let path = match kind {
                VaultEventKind::Created { path }
                | VaultEventKind::Modified { path }
                | VaultEventKind::Deleted { path } => path,
                other => panic!("unexpected event {other:?}"),
            };
            assert_eq!(path, &note);
        }
    }

    #[test]
    fn test_missing_vault() {
        let result = VaultWatcher::new(VaultConfig::new("/nonexistent/vault/12345"));
        assert!(matches!(result, Err(WatcherError::VaultNotFound(_))));
    }

    #[tokio::test]
    async fn test_start_twice_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let mut watcher = VaultWatcher::new(VaultConfig::new(temp_dir.path())).unwrap();

        watcher.start().unwrap();
        assert!(watcher.is_running());
        assert!(matches!(
            watcher.start(),
            Err(WatcherError::AlreadyWatching(_))
        ));

        watcher.stop();
        assert!(!watcher.is_running());
    }

    #[test]
    fn test_relevance_filter() {
        let config = VaultConfig::new("/vault");

        assert!(is_relevant(
            &config,
            &VaultEventKind::Modified {
                path: PathBuf::from("/vault/a.md")
            }
        ));
        assert!(!is_relevant(
            &config,
            &VaultEventKind::Modified {
                path: PathBuf::from("/vault/.obsidian/app.json")
            }
        ));
        assert!(is_relevant(
            &config,
            &VaultEventKind::Renamed {
                from: PathBuf::from("/vault/draft.txt"),
                to: PathBuf::from("/vault/final.md"),
            }
        ));
    }
}
