//! Events the host delivers about the vault and the editor.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An event about a note or the active editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaultEvent {
    /// The kind of event.
    pub kind: VaultEventKind,

    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
}

impl VaultEvent {
    /// Create a new event stamped with the current time.
    pub fn new(kind: VaultEventKind) -> Self {
        Self {
            kind,
            timestamp: Utc::now(),
        }
    }

    /// A note was written.
    pub fn modified(path: impl Into<PathBuf>) -> Self {
        Self::new(VaultEventKind::Modified { path: path.into() })
    }

    /// A note was created.
    pub fn created(path: impl Into<PathBuf>) -> Self {
        Self::new(VaultEventKind::Created { path: path.into() })
    }

    /// A note was deleted.
    pub fn deleted(path: impl Into<PathBuf>) -> Self {
        Self::new(VaultEventKind::Deleted { path: path.into() })
    }

    /// A note moved.
    pub fn renamed(from: impl Into<PathBuf>, to: impl Into<PathBuf>) -> Self {
        Self::new(VaultEventKind::Renamed {
            from: from.into(),
            to: to.into(),
        })
    }

    /// The editor buffer changed.
    pub fn editor_changed(path: Option<PathBuf>, text: impl Into<String>) -> Self {
        Self::new(VaultEventKind::EditorChanged {
            path,
            text: text.into(),
        })
    }
}

/// Kind of vault event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VaultEventKind {
    /// Note content was written.
    Modified { path: PathBuf },

    /// Note was created.
    Created { path: PathBuf },

    /// Note was deleted.
    Deleted { path: PathBuf },

    /// Note was renamed or moved.
    Renamed { from: PathBuf, to: PathBuf },

    /// The active editor's content changed. `path` is the note being edited,
    /// if any.
    EditorChanged { path: Option<PathBuf>, text: String },
}

/// Translate a raw filesystem notification into vault events.
///
/// Access and metadata-only changes produce nothing. A rename whose two
/// halves arrive separately becomes a delete followed by a create.
pub fn from_notify(event: notify::Event) -> Vec<VaultEvent> {
    use notify::EventKind;
    use notify::event::{ModifyKind, RenameMode};

    let mut paths = event.paths.into_iter();
    match event.kind {
        EventKind::Create(_) => paths.map(VaultEvent::created).collect(),
        EventKind::Remove(_) => paths.map(VaultEvent::deleted).collect(),
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
            match (paths.next(), paths.next()) {
                (Some(from), Some(to)) => vec![VaultEvent::renamed(from, to)],
                (Some(path), None) => vec![VaultEvent::modified(path)],
                _ => Vec::new(),
            }
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => {
            paths.map(VaultEvent::deleted).collect()
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => {
            paths.map(VaultEvent::created).collect()
        }
        EventKind::Modify(ModifyKind::Metadata(_)) => Vec::new(),
        EventKind::Modify(_) => paths.map(VaultEvent::modified).collect(),
        EventKind::Access(_) | EventKind::Any | EventKind::Other => Vec::new(),
    }
}
