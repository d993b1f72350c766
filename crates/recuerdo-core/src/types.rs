// SPDX-FileCopyrightText: 2026 Recuerdo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the Recuerdo workspace.

use serde::{Deserialize, Serialize};

/// A short, distilled, third-person statement about a user, stored
/// independently of raw conversation history.
///
/// Facts are immutable once created; deletion is bulk, per-owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fact {
    /// Unique identifier for this fact.
    pub id: String,
    /// User identifier that scopes visibility of this fact.
    pub owner: String,
    /// The factual content (e.g. "The user's favorite city is Tokyo").
    pub content: String,
    /// ISO 8601 creation timestamp.
    pub created_at: String,
}

/// Outcome of a fact save operation.
///
/// Deduplication is expected and frequent (fact extraction rediscovers
/// the same fact across turns), so a skipped duplicate is a normal
/// outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// A new fact was stored under this identifier.
    Saved(String),
    /// An identical fact (trimmed, case-folded) already existed for
    /// this owner; nothing was written.
    Duplicate,
}

/// A catalog entry indexed both by vector similarity and lexical content.
///
/// Static reference data: loaded once at startup, read-only thereafter
/// from the retrieval engine's perspective.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogRecord {
    /// Row identifier.
    pub id: i64,
    /// Product name.
    pub name: String,
    /// Product category.
    pub category: String,
    /// Unit price.
    pub price: f64,
    /// Free-text description (lexically indexed together with the name).
    pub description: String,
    /// Precomputed embedding of name + category + description.
    #[serde(skip)]
    pub embedding: Vec<f32>,
}

/// Input for an embedding adapter.
#[derive(Debug, Clone)]
pub struct EmbeddingInput {
    /// Texts to embed, one vector returned per text.
    pub texts: Vec<String>,
}

/// Output from an embedding adapter.
#[derive(Debug, Clone)]
pub struct EmbeddingOutput {
    /// One embedding per input text, in input order.
    pub embeddings: Vec<Vec<f32>>,
    /// Dimensionality of every returned vector.
    pub dimensions: usize,
}

/// Convert an f32 vector to bytes for SQLite BLOB storage.
pub fn vec_to_blob(vec: &[f32]) -> Vec<u8> {
    vec.iter().flat_map(|f| f.to_le_bytes()).collect()
}

/// Convert a SQLite BLOB back to an f32 vector.
pub fn blob_to_vec(blob: &[u8]) -> Vec<f32> {
    blob.chunks_exact(4)
        .map(|chunk| f32::from_le_bytes(chunk.try_into().unwrap()))
        .collect()
}

/// Compute cosine similarity between two vectors of equal length.
///
/// Returns 0.0 for a zero-magnitude vector rather than dividing by zero,
/// so a degenerate embedding ranks nowhere instead of poisoning the sort.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "vectors must have same length");
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_outcome_equality() {
        assert_eq!(
            SaveOutcome::Saved("f-1".into()),
            SaveOutcome::Saved("f-1".into())
        );
        assert_ne!(SaveOutcome::Saved("f-1".into()), SaveOutcome::Duplicate);
    }

    #[test]
    fn vec_to_blob_roundtrip() {
        let original = vec![0.1_f32, 0.2, 0.3, -0.5, 1.0];
        let blob = vec_to_blob(&original);
        assert_eq!(blob.len(), original.len() * 4);
        let recovered = blob_to_vec(&blob);
        assert_eq!(original.len(), recovered.len());
        for (a, b) in original.iter().zip(recovered.iter()) {
            assert!((a - b).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn cosine_similarity_identical() {
        let v = vec![0.3_f32, -0.4, 0.5];
        let sim = cosine_similarity(&v, &v);
        assert!((sim - 1.0).abs() < 1e-5, "got {sim}");
    }

    #[test]
    fn cosine_similarity_orthogonal() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![0.0, 1.0, 0.0];
        assert!(cosine_similarity(&a, &b).abs() < f32::EPSILON);
    }

    #[test]
    fn cosine_similarity_zero_vector_is_zero() {
        let a = vec![0.0, 0.0];
        let b = vec![1.0, 2.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn cosine_similarity_opposite() {
        let a = vec![1.0, 0.0];
        let b = vec![-1.0, 0.0];
        let sim = cosine_similarity(&a, &b);
        assert!((sim + 1.0).abs() < f32::EPSILON, "got {sim}");
    }
}
