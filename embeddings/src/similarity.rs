//! Similarity computation for embeddings.

use std::cmp::Reverse;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::index::DocumentRecord;

/// Compute the cosine similarity between two embeddings.
///
/// Returns a value between -1.0 and 1.0, where:
/// - 1.0 means identical direction
/// - 0.0 means orthogonal vectors, or no signal at all
/// - -1.0 means opposite vectors
///
/// An empty vector on either side scores 0.0. When lengths differ only the
/// common prefix is compared, norms included. A zero-magnitude prefix also
/// scores 0.0.
///
/// Sums are accumulated in `f64` so very small or very large components
/// neither underflow nor overflow. A non-finite result (NaN components)
/// scores 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let len = a.len().min(b.len());
    if len == 0 {
        return 0.0;
    }
    let (a, b) = (&a[..len], &b[..len]);

    let dot_product: f64 = a
        .iter()
        .zip(b)
        .map(|(x, y)| f64::from(*x) * f64::from(*y))
        .sum();
    let magnitude_a = a.iter().map(|x| f64::from(*x).powi(2)).sum::<f64>().sqrt();
    let magnitude_b = b.iter().map(|x| f64::from(*x).powi(2)).sum::<f64>().sqrt();

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return 0.0;
    }

    let similarity = (dot_product / (magnitude_a * magnitude_b)) as f32;
    if !similarity.is_finite() {
        return 0.0;
    }
    similarity.clamp(-1.0, 1.0)
}

/// A similarity search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityResult {
    /// ID of the matched document.
    pub id: String,

    /// Similarity score.
    pub score: f32,
}

impl SimilarityResult {
    /// Create a new similarity result.
    pub fn new(id: impl Into<String>, score: f32) -> Self {
        Self {
            id: id.into(),
            score,
        }
    }
}

/// Score every record against `query` and keep the best `top_n`.
///
/// Sorting is stable: records with equal scores stay in index order.
pub fn rank<'a, I>(query: &[f32], records: I, top_n: usize) -> Vec<SimilarityResult>
where
    I: IntoIterator<Item = &'a DocumentRecord>,
{
    let mut scores: Vec<(OrderedFloat<f32>, &str)> = records
        .into_iter()
        .map(|record| {
            (
                OrderedFloat(cosine_similarity(query, &record.embedding)),
                record.id.as_str(),
            )
        })
        .collect();

    scores.sort_by_key(|(score, _)| Reverse(*score));

    scores
        .into_iter()
        .take(top_n)
        .map(|(score, id)| SimilarityResult::new(id, score.0))
        .collect()
}
