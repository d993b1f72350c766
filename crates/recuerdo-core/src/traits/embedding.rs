// SPDX-FileCopyrightText: 2026 Recuerdo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedding adapter trait for vector embedding generation.

use async_trait::async_trait;

use crate::error::RecuerdoError;
use crate::types::{EmbeddingInput, EmbeddingOutput};

/// Adapter for generating vector embeddings from text.
///
/// Embedding adapters power the semantic half of hybrid retrieval.
/// Calls are blocking from the engine's perspective: no internal
/// timeout or retry, callers own backoff policy. Output must be
/// deterministic per model version.
#[async_trait]
pub trait EmbeddingAdapter: Send + Sync {
    /// Generates one embedding per input text, in input order.
    async fn embed(&self, input: EmbeddingInput) -> Result<EmbeddingOutput, RecuerdoError>;

    /// Dimensionality of the vectors this adapter produces.
    fn dimensions(&self) -> usize;

    /// Human-readable adapter name for logging.
    fn name(&self) -> &str;
}
