// SPDX-FileCopyrightText: 2026 Recuerdo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Recuerdo contextual retrieval subsystem.
//!
//! This crate provides the foundational error type, shared domain types,
//! the text normalizer used by both retrieval engines, and the traits
//! implemented by external collaborators (embedding provider, context
//! provider).

pub mod error;
pub mod normalizer;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::RecuerdoError;
pub use traits::{ContextProvider, EmbeddingAdapter};
pub use types::{CatalogRecord, EmbeddingInput, EmbeddingOutput, Fact, SaveOutcome};
