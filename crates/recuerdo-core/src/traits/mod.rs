// SPDX-FileCopyrightText: 2026 Recuerdo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for collaborators implemented outside the
//! retrieval core.

pub mod context;
pub mod embedding;

pub use context::ContextProvider;
pub use embedding::EmbeddingAdapter;
