//! In-memory embedding index over documents.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::Embedding;
use crate::provider::EmbeddingProvider;
use crate::similarity::{SimilarityResult, rank};

/// An entry in the embedding index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Unique document identifier.
    pub id: String,

    /// The embedding vector. Empty when the embedding was unavailable.
    pub embedding: Embedding,
}

impl DocumentRecord {
    /// Create a new record.
    pub fn new(id: impl Into<String>, embedding: Embedding) -> Self {
        Self {
            id: id.into(),
            embedding,
        }
    }

    /// Whether this record can match anything.
    pub fn is_embedded(&self) -> bool {
        !self.embedding.is_empty()
    }
}

/// What an upsert did to the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// A new record was appended.
    Inserted,

    /// An existing record had its vector replaced.
    Updated,
}

/// Ordered, owned collection of document embeddings.
///
/// Records keep insertion order, which is also the tie-break order for
/// equal scores in [`EmbeddingIndex::search`]. The index is unbounded.
#[derive(Debug, Clone, Default)]
pub struct EmbeddingIndex {
    records: Vec<DocumentRecord>,
}

impl EmbeddingIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of records in the index.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in index order.
    pub fn records(&self) -> &[DocumentRecord] {
        &self.records
    }

    /// Get a record by ID.
    pub fn get(&self, id: &str) -> Option<&DocumentRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Check if an ID exists in the index.
    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// All IDs in index order.
    pub fn ids(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.id.as_str()).collect()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.records.iter().position(|r| r.id == id)
    }

    /// Clear the index.
    pub fn clear(&mut self) {
        self.records.clear();
        debug!("Cleared embedding index");
    }

    /// Store an already computed embedding under `id`.
    ///
    /// Replaces the vector in place when `id` exists, appends otherwise.
    pub fn upsert_embedding(
        &mut self,
        id: impl Into<String>,
        embedding: Embedding,
    ) -> UpsertOutcome {
        let id = id.into();
        match self.position(&id) {
            Some(pos) => {
                self.records[pos].embedding = embedding;
                debug!("Updated embedding for {id}");
                UpsertOutcome::Updated
            }
            None => {
                debug!("Inserted embedding for {id}");
                self.records.push(DocumentRecord::new(id, embedding));
                UpsertOutcome::Inserted
            }
        }
    }

    /// Remove a record from the index.
    pub fn remove(&mut self, id: &str) -> Option<DocumentRecord> {
        let pos = self.position(id)?;
        debug!("Removed embedding for {id}");
        Some(self.records.remove(pos))
    }

    /// Move a record to a new ID, keeping its vector and position.
    ///
    /// An existing record under `to` is dropped first. Returns `false` when
    /// `from` is not indexed.
    pub fn rename(&mut self, from: &str, to: impl Into<String>) -> bool {
        let to = to.into();
        if from == to {
            return self.contains(from);
        }
        if !self.contains(from) {
            return false;
        }
        self.remove(&to);
        if let Some(pos) = self.position(from) {
            self.records[pos].id = to;
        }
        true
    }

    /// Rank every record against an already computed query vector.
    pub fn search(&self, query: &[f32], top_n: usize) -> Vec<SimilarityResult> {
        rank(query, &self.records, top_n)
    }

    /// Clear the index and embed every document in order, one at a time.
    ///
    /// Documents whose embedding is unavailable are still indexed with an
    /// empty vector. Returns the number of records.
    pub async fn rebuild_all<P, I, K, T>(&mut self, provider: &P, documents: I) -> usize
    where
        P: EmbeddingProvider + ?Sized,
        I: IntoIterator<Item = (K, T)>,
        K: Into<String>,
        T: AsRef<str>,
    {
        self.clear();

        for (id, text) in documents {
            let embedding = provider.embed_or_empty(text.as_ref()).await;
            self.upsert_embedding(id, embedding);
        }

        let unavailable = self.records.iter().filter(|r| !r.is_embedded()).count();
        info!(
            "Rebuilt embedding index with {} documents ({unavailable} without embeddings)",
            self.records.len()
        );
        self.records.len()
    }

    /// Embed `text` and store it under `id`.
    pub async fn upsert<P>(
        &mut self,
        provider: &P,
        id: impl Into<String>,
        text: &str,
    ) -> UpsertOutcome
    where
        P: EmbeddingProvider + ?Sized,
    {
        let embedding = provider.embed_or_empty(text).await;
        self.upsert_embedding(id, embedding)
    }

    /// Embed `text` and return the `top_n` most similar records.
    ///
    /// Always yields `min(top_n, len)` results; an unavailable query
    /// embedding scores every record 0.0.
    pub async fn query<P>(&self, provider: &P, text: &str, top_n: usize) -> Vec<SimilarityResult>
    where
        P: EmbeddingProvider + ?Sized,
    {
        let query = provider.embed_or_empty(text).await;
        self.search(&query, top_n)
    }
}
