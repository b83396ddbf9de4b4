//! Configuration for a watched note vault.

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use wildmatch::WildMatch;

/// Configuration for a note vault.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultConfig {
    /// Root directory of the vault.
    ///
    /// Absolute event paths are matched against this root. A relative root
    /// is resolved against the current directory, so it must not change
    /// while the vault is in use. [`crate::VaultWatcher::new`] canonicalizes
    /// its copy.
    pub root: PathBuf,

    /// File extensions treated as notes (without the dot, lowercase).
    pub extensions: Vec<String>,

    /// Patterns to exclude, matched against the vault-relative path.
    pub exclude_patterns: Vec<String>,

    /// Maximum depth to recurse (None = unlimited).
    pub max_depth: Option<usize>,

    /// Whether to follow symbolic links.
    pub follow_symlinks: bool,
}

impl VaultConfig {
    /// Create a new vault config.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extensions: vec!["md".to_string()],
            exclude_patterns: Self::default_excludes(),
            max_depth: None,
            follow_symlinks: false,
        }
    }

    /// Accept an additional note extension.
    pub fn with_extension(mut self, ext: impl Into<String>) -> Self {
        self.extensions
            .push(ext.into().trim_start_matches('.').to_lowercase());
        self
    }

    /// Add an exclude pattern.
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Set the maximum depth.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Enable following symbolic links.
    pub fn follow_symlinks(mut self) -> Self {
        self.follow_symlinks = true;
        self
    }

    fn default_excludes() -> Vec<String> {
        vec![
            // Vault metadata
            ".obsidian/*".to_string(),
            ".trash/*".to_string(),
            // Version control
            ".git/*".to_string(),
            // Editor swap files
            "*.swp".to_string(),
            "*~".to_string(),
        ]
    }

    /// Whether the path has a note extension.
    pub fn is_supported(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                let ext = ext.to_lowercase();
                self.extensions.iter().any(|e| *e == ext)
            })
    }

    /// Check if a path should be excluded.
    pub fn should_exclude(&self, path: &Path) -> bool {
        let Some(relative) = self.document_id(path) else {
            return true;
        };

        self.exclude_patterns
            .iter()
            .any(|pattern| WildMatch::new(pattern).matches(&relative))
    }

    /// Whether a path is a note this vault indexes.
    pub fn accepts(&self, path: &Path) -> bool {
        self.is_supported(path) && !self.should_exclude(path)
    }

    /// The document identifier for a path: its vault-relative form with `/`
    /// separators. `None` for paths outside the vault.
    ///
    /// A relative path under an absolute root is taken as already relative.
    pub fn document_id(&self, path: &Path) -> Option<String> {
        let relative = match (path.is_absolute(), self.root.is_absolute()) {
            (true, false) => {
                let root = std::env::current_dir().ok()?.join(&self.root);
                path.strip_prefix(root).ok()?
            }
            (false, true) => path,
            _ => path.strip_prefix(&self.root).ok()?,
        };

        let mut parts = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
                Component::CurDir => {}
                _ => return None,
            }
        }

        if parts.is_empty() {
            None
        } else {
            Some(parts.join("/"))
        }
    }

    /// Absolute-or-root-relative path for a document identifier.
    pub fn document_path(&self, id: &str) -> PathBuf {
        id.split('/')
            .fold(self.root.clone(), |path, part| path.join(part))
    }
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self::new(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_vault_config_creation() {
        let config = VaultConfig::new("/home/user/notes")
            .with_extension(".TXT")
            .with_max_depth(3);

        assert_eq!(config.root, Path::new("/home/user/notes"));
        assert_eq!(config.extensions, vec!["md".to_string(), "txt".to_string()]);
        assert_eq!(config.max_depth, Some(3));
    }

    #[test]
    fn test_supported_extensions() {
        let config = VaultConfig::new("/vault");

        assert!(config.is_supported(Path::new("/vault/daily/2024-01-01.md")));
        assert!(config.is_supported(Path::new("/vault/Upper.MD")));
        assert!(!config.is_supported(Path::new("/vault/image.png")));
        assert!(!config.is_supported(Path::new("/vault/README")));
    }

    #[test]
    fn test_exclude_patterns() {
        let config = VaultConfig::new("/vault").exclude("templates/*");

        assert!(config.should_exclude(Path::new("/vault/.obsidian/workspace.json")));
        assert!(config.should_exclude(Path::new("/vault/.trash/old.md")));
        assert!(config.should_exclude(Path::new("/vault/templates/daily.md")));
        assert!(config.should_exclude(Path::new("/elsewhere/note.md")));
        assert!(!config.should_exclude(Path::new("/vault/projects/plan.md")));

        assert!(config.accepts(Path::new("/vault/projects/plan.md")));
        assert!(!config.accepts(Path::new("/vault/.trash/old.md")));
    }

    #[test]
    fn test_document_id_round_trips_to_path() {
        let config = VaultConfig::new("/vault");
        let path = Path::new("/vault/projects/plan.md");

        let id = config.document_id(path);
        assert_eq!(id.as_deref(), Some("projects/plan.md"));
        assert_eq!(config.document_path("projects/plan.md"), path);
        assert_eq!(config.document_id(Path::new("/vault")), None);
        assert_eq!(config.document_id(Path::new("/vault/../etc/passwd")), None);
    }

    #[test]
    fn test_relative_root_matches_absolute_paths() {
        let config = VaultConfig::default();
        let cwd = std::env::current_dir().unwrap();

        assert_eq!(
            config.document_id(&cwd.join("notes").join("a.md")).as_deref(),
            Some("notes/a.md")
        );
        assert!(config.accepts(&cwd.join("a.md")));
        assert!(!config.accepts(&cwd.join(".obsidian").join("a.md")));

        let nested = VaultConfig::new("./vault");
        assert_eq!(
            nested.document_id(&cwd.join("vault").join("a.md")).as_deref(),
            Some("a.md")
        );
        assert_eq!(nested.document_id(&cwd.join("a.md")), None);
    }
}
