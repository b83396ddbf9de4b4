//! Vault scanning: enumerate and read every note.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::VaultConfig;
use crate::error::{Result, WatcherError};

/// A note read from the vault.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaultDocument {
    /// Vault-relative identifier, `/`-separated.
    pub id: String,

    /// Full path to the note.
    pub path: PathBuf,

    /// Note contents.
    pub text: String,

    /// When the note was last modified, if known.
    pub modified: Option<DateTime<Utc>>,
}

/// Reads notes out of a vault directory.
pub struct VaultScanner {
    config: VaultConfig,
}

impl VaultScanner {
    /// Create a scanner for the vault.
    pub fn new(config: VaultConfig) -> Self {
        Self { config }
    }

    /// The vault being scanned.
    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    /// Paths of every note in the vault, sorted.
    pub fn note_paths(&self) -> Result<Vec<PathBuf>> {
        if !self.config.root.is_dir() {
            return Err(WatcherError::VaultNotFound(
                self.config.root.display().to_string(),
            ));
        }

        let walker = WalkDir::new(&self.config.root)
            .follow_links(self.config.follow_symlinks)
            .max_depth(self.config.max_depth.unwrap_or(usize::MAX))
            .sort_by_file_name();

        let mut paths = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable vault entry: {e}");
                    continue;
                }
            };

            if !entry.file_type().is_file() || !self.config.accepts(entry.path()) {
                continue;
            }
            paths.push(entry.into_path());
        }

        Ok(paths)
    }

    /// Read a single note.
    ///
    /// Fails for paths that are not notes of this vault. Non-UTF-8 content
    /// surfaces as an IO error.
    pub async fn read(&self, path: &Path) -> Result<VaultDocument> {
        let id = self
            .config
            .document_id(path)
            .filter(|_| self.config.accepts(path))
            .ok_or_else(|| WatcherError::NotANote(path.display().to_string()))?;

        let text = fs::read_to_string(path).await?;
        let modified = fs::metadata(path)
            .await
            .ok()
            .and_then(|m| m.modified().ok())
            .map(DateTime::<Utc>::from);

        Ok(VaultDocument {
            id,
            path: path.to_path_buf(),
            text,
            modified,
        })
    }

    /// Read every note in the vault, in path order.
    ///
    /// Notes that cannot be read are skipped with a warning.
    pub async fn scan(&self) -> Result<Vec<VaultDocument>> {
        let start = std::time::Instant::now();
        let paths = self.note_paths()?;

        let mut documents = Vec::with_capacity(paths.len());
        let mut skipped = 0;
        for path in paths {
            match self.read(&path).await {
                Ok(document) => {
                    debug!("Read note {}", document.id);
                    documents.push(document);
                }
                Err(e) => {
                    warn!("Skipping note {}: {e}", path.display());
                    skipped += 1;
                }
            }
        }

        info!(
            "Scanned {} notes in {:?} (skipped: {skipped})",
            documents.len(),
            start.elapsed()
        );

        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs::{self as std_fs, File};
    use std::io::Write;
    use tempfile::TempDir;

    fn write(dir: &Path, relative: &str, contents: &[u8]) {
        let path = dir.join(relative);
        if let Some(parent) = path.parent() {
            std_fs::create_dir_all(parent).unwrap();
        }
        File::create(path).unwrap().write_all(contents).unwrap();
    }

    #[tokio::test]
    async fn test_scan_reads_notes_only() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "b.md", b"second");
        write(temp_dir.path(), "a.md", b"first");
        write(temp_dir.path(), "projects/plan.md", b"plan");
        write(temp_dir.path(), "image.png", b"\x89PNG");
        write(temp_dir.path(), ".obsidian/config.md", b"hidden");

        let scanner = VaultScanner::new(VaultConfig::new(temp_dir.path()));
        let documents = scanner.scan().await.unwrap();

        let ids: Vec<_> = documents.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["a.md", "b.md", "projects/plan.md"]);
        assert_eq!(documents[0].text, "first");
        assert!(documents[0].modified.is_some());
    }

    #[tokio::test]
    async fn test_scan_skips_non_utf8() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "good.md", b"ok");
        write(temp_dir.path(), "bad.md", &[0xff, 0xfe, 0xfd]);

        let scanner = VaultScanner::new(VaultConfig::new(temp_dir.path()));
        let documents = scanner.scan().await.unwrap();

        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].id, "good.md");
    }

    #[tokio::test]
    async fn test_read_rejects_foreign_paths() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "notes.txt", b"plain");

        let scanner = VaultScanner::new(VaultConfig::new(temp_dir.path()));
        let result = scanner.read(&temp_dir.path().join("notes.txt")).await;

        assert!(matches!(result, Err(WatcherError::NotANote(_))));
    }

    #[tokio::test]
    async fn test_scan_missing_vault() {
        let scanner = VaultScanner::new(VaultConfig::new("/nonexistent/vault/12345"));
        assert!(matches!(
            scanner.scan().await,
            Err(WatcherError::VaultNotFound(_))
        ));
    }
}
