// SPDX-FileCopyrightText: 2026 Recuerdo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fact memory store for the Recuerdo retrieval subsystem.
//!
//! Persists short, distilled facts about a user, deduplicates on save,
//! and retrieves facts relevant to a new query using keyword full-text
//! matching scoped to an owner.
//!
//! ## Architecture
//!
//! - **FactStore**: SQLite persistence with an FTS5 keyword index
//! - **FactMemoryProvider**: ContextProvider for prompt injection

pub mod provider;
pub mod store;

pub use provider::FactMemoryProvider;
pub use store::FactStore;
