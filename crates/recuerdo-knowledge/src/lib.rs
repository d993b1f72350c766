// SPDX-FileCopyrightText: 2026 Recuerdo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hybrid catalog retrieval for Recuerdo.
//!
//! Combines an embedding-based semantic ranking and an FTS5 BM25
//! lexical ranking over a product catalog, fused with Reciprocal Rank
//! Fusion, and exposes the result as a [`ContextProvider`] block.
//!
//! [`ContextProvider`]: recuerdo_core::traits::ContextProvider

pub mod catalog;
pub mod embedder;
pub mod fusion;
pub mod provider;
pub mod retriever;

pub use catalog::{CatalogStore, NewCatalogEntry};
pub use embedder::HttpEmbedder;
pub use fusion::{fuse, DEFAULT_RRF_K};
pub use provider::CatalogContextProvider;
pub use retriever::{ContextDocument, HybridRetriever};
