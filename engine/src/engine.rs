//! Similar-notes engine implementation.

use std::path::Path;
use std::sync::Arc;

use notesim_embeddings::{EmbeddingIndex, EmbeddingProvider, SimilarityResult, UpsertOutcome};
use notesim_vault_watcher::{EventSource, VaultEvent, VaultEventKind, VaultScanner};
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::error::Result;

/// Keeps an embedding index of a vault in step with its notes and answers
/// "which notes are similar" queries.
///
/// The engine owns its [`EmbeddingIndex`] and is driven from a single task:
/// every mutation goes through `&mut self`.
pub struct SimilarNotes {
    /// Configuration.
    config: EngineConfig,

    /// Embedding provider.
    provider: Arc<dyn EmbeddingProvider>,

    /// Reads notes from the vault.
    scanner: VaultScanner,

    /// Embeddings of every known note.
    index: EmbeddingIndex,
}

/// What handling one event did.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineOutput {
    /// A note was (re-)embedded.
    Indexed { id: String, outcome: UpsertOutcome },

    /// A note left the index.
    Removed { id: String },

    /// A note kept its embedding under a new identifier.
    Renamed { from: String, to: String },

    /// Notes similar to the editor content.
    Similar {
        /// The note being edited, if it belongs to the vault.
        id: Option<String>,
        results: Vec<SimilarityResult>,
    },

    /// The event did not concern an indexable note.
    Ignored,
}

impl SimilarNotes {
    /// Create an engine with an explicit provider.
    pub fn new(config: EngineConfig, provider: Arc<dyn EmbeddingProvider>) -> Self {
        let scanner = VaultScanner::new(config.vault.clone());
        Self {
            config,
            provider,
            scanner,
            index: EmbeddingIndex::new(),
        }
    }

    /// Create an engine using the HTTP provider described by `config`.
    pub fn from_config(config: EngineConfig) -> Self {
        let provider = Arc::new(config.provider());
        Self::new(config, provider)
    }

    /// The engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The current index.
    pub fn index(&self) -> &EmbeddingIndex {
        &self.index
    }

    /// Rebuild the index from every note in the vault.
    pub async fn rebuild(&mut self) -> Result<usize> {
        if !self.provider.is_available() {
            warn!(
                "Embedding provider {} is not configured; notes will be unmatchable",
                self.provider.name()
            );
        }

        let documents = self.scanner.scan().await?;
        Ok(self
            .index
            .rebuild_all(
                self.provider.as_ref(),
                documents.into_iter().map(|d| (d.id, d.text)),
            )
            .await)
    }

    /// Rebuild the index from documents supplied by the host.
    pub async fn rebuild_from<I, K, T>(&mut self, documents: I) -> usize
    where
        I: IntoIterator<Item = (K, T)>,
        K: Into<String>,
        T: AsRef<str>,
    {
        self.index
            .rebuild_all(self.provider.as_ref(), documents)
            .await
    }

    /// Embed `text` under `id`.
    pub async fn upsert(&mut self, id: impl Into<String>, text: &str) -> UpsertOutcome {
        self.index.upsert(self.provider.as_ref(), id, text).await
    }

    /// The `top_n` notes most similar to `text`.
    pub async fn query(&self, text: &str, top_n: usize) -> Vec<SimilarityResult> {
        self.index.query(self.provider.as_ref(), text, top_n).await
    }

    /// The configured number of notes most similar to `text`, leaving out
    /// the note `id` itself.
    pub async fn similar_to(&self, id: &str, text: &str) -> Vec<SimilarityResult> {
        let top_n = self.config.top_n;
        let wanted = if self.index.contains(id) {
            top_n.saturating_add(1)
        } else {
            top_n
        };

        let mut results = self.query(text, wanted).await;
        results.retain(|r| r.id != id);
        results.truncate(top_n);
        results
    }

    /// Notes most similar to an indexed note, scored with its stored
    /// embedding. No provider call is made.
    pub fn neighbours(&self, id: &str) -> Vec<SimilarityResult> {
        let Some(record) = self.index.get(id) else {
            return Vec::new();
        };

        let top_n = self.config.top_n;
        let mut results = self.index.search(&record.embedding, top_n.saturating_add(1));
        results.retain(|r| r.id != id);
        results.truncate(top_n);
        results
    }

    /// React to a note being written or created.
    pub async fn on_document_changed(&mut self, path: &Path) -> Result<EngineOutput> {
        if !self.config.vault.accepts(path) {
            debug!("Ignoring change to {}", path.display());
            return Ok(EngineOutput::Ignored);
        }

        let document = self.scanner.read(path).await?;
        let outcome = self.upsert(document.id.clone(), &document.text).await;
        Ok(EngineOutput::Indexed {
            id: document.id,
            outcome,
        })
    }

    /// React to a note being deleted.
    pub fn on_document_deleted(&mut self, path: &Path) -> EngineOutput {
        let Some(id) = self.config.vault.document_id(path) else {
            return EngineOutput::Ignored;
        };

        match self.index.remove(&id) {
            Some(_) => {
                debug!("Removed deleted note {id}");
                EngineOutput::Removed { id }
            }
            None => EngineOutput::Ignored,
        }
    }

    /// React to a note being renamed or moved.
    ///
    /// The embedding follows the note when the content is unchanged; moving a
    /// note out of the vault's scope drops it and moving an unknown note in
    /// embeds it.
    pub async fn on_document_renamed(
        &mut self,
        from: &Path,
        to: &Path,
    ) -> Result<EngineOutput> {
        let from_id = self
            .config
            .vault
            .document_id(from)
            .filter(|id| self.index.contains(id));

        match (from_id, self.config.vault.accepts(to)) {
            (Some(from_id), true) => {
                let Some(to_id) = self.config.vault.document_id(to) else {
                    return Ok(self.on_document_deleted(from));
                };
                self.index.rename(&from_id, to_id.clone());
                debug!("Renamed note {from_id} -> {to_id}");
                Ok(EngineOutput::Renamed {
                    from: from_id,
                    to: to_id,
                })
            }
            (Some(_), false) => Ok(self.on_document_deleted(from)),
            (None, true) => self.on_document_changed(to).await,
            (None, false) => Ok(EngineOutput::Ignored),
        }
    }

    /// React to the editor content changing.
    pub async fn on_editor_changed(&self, path: Option<&Path>, text: &str) -> EngineOutput {
        let id = path.and_then(|p| self.config.vault.document_id(p));

        let results = match &id {
            Some(id) => self.similar_to(id, text).await,
            None => self.query(text, self.config.top_n).await,
        };

        EngineOutput::Similar { id, results }
    }

    /// Handle one vault event.
    pub async fn handle_event(&mut self, event: VaultEvent) -> Result<EngineOutput> {
        match event.kind {
            VaultEventKind::Modified { path } | VaultEventKind::Created { path } => {
                self.on_document_changed(&path).await
            }
            VaultEventKind::Deleted { path } => Ok(self.on_document_deleted(&path)),
            VaultEventKind::Renamed { from, to } => self.on_document_renamed(&from, &to).await,
            VaultEventKind::EditorChanged { path, text } => {
                Ok(self.on_editor_changed(path.as_deref(), &text).await)
            }
        }
    }

    /// Drain `source`, handling events one at a time until it closes.
    ///
    /// `on_output` sees the engine after each handled event. Failures are
    /// logged and the loop continues. Returns the number of events handled
    /// successfully.
    pub async fn run<S, F>(&mut self, source: &mut S, mut on_output: F) -> usize
    where
        S: EventSource + ?Sized,
        F: FnMut(&Self, &EngineOutput),
    {
        info!("Listening for vault events");
        let mut handled = 0;

        while let Some(event) = source.next_event().await {
            match self.handle_event(event).await {
                Ok(output) => {
                    handled += 1;
                    on_output(self, &output);
                }
                Err(e) => warn!("Failed to handle vault event: {e}"),
            }
        }

        info!("Vault event source closed after {handled} events");
        handled
    }

    /// Get engine statistics.
    pub fn stats(&self) -> EngineStats {
        let records = self.index.records();
        EngineStats {
            documents: records.len(),
            unavailable: records.iter().filter(|r| !r.is_embedded()).count(),
            dimension: records.iter().map(|r| r.embedding.len()).max().unwrap_or(0),
        }
    }
}

/// Statistics about the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineStats {
    /// Number of indexed notes.
    pub documents: usize,

    /// Notes whose embedding is unavailable.
    pub unavailable: usize,

    /// Largest embedding dimension seen.
    pub dimension: usize,
}
