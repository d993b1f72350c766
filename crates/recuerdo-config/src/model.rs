// SPDX-FileCopyrightText: 2026 Recuerdo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Recuerdo retrieval subsystem.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Recuerdo configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RecuerdoConfig {
    /// Agent identity and logging settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Embedding provider settings.
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Fact memory store settings.
    #[serde(default)]
    pub memory: MemoryConfig,

    /// Hybrid catalog retrieval settings.
    #[serde(default)]
    pub retrieval: RetrievalConfig,
}

/// Agent identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the agent.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "recuerdo".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL journal mode (concurrent readers with one writer).
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|d| d.join("recuerdo/recuerdo.db").to_string_lossy().into_owned())
        .unwrap_or_else(|| "recuerdo.db".to_string())
}

fn default_wal_mode() -> bool {
    true
}

/// Embedding provider configuration.
///
/// Targets any OpenAI-compatible `/embeddings` endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EmbeddingConfig {
    /// API key. Falls back to `RECUERDO_EMBEDDING_API_KEY`, then
    /// `OPENAI_API_KEY`, at adapter construction time.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of the embeddings API.
    #[serde(default = "default_embedding_base_url")]
    pub base_url: String,

    /// Embedding model identifier.
    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// Requested embedding dimensionality. Must match the dimensionality
    /// used when catalog embeddings were stored.
    #[serde(default = "default_embedding_dimensions")]
    pub dimensions: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_embedding_base_url(),
            model: default_embedding_model(),
            dimensions: default_embedding_dimensions(),
        }
    }
}

fn default_embedding_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_embedding_dimensions() -> usize {
    256
}

/// Fact memory store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MemoryConfig {
    /// Maximum number of facts returned by a search.
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,

    /// Cap on the number of facts returned by list-all.
    #[serde(default = "default_list_cap")]
    pub list_cap: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            search_limit: default_search_limit(),
            list_cap: default_list_cap(),
        }
    }
}

fn default_search_limit() -> usize {
    5
}

fn default_list_cap() -> usize {
    100
}

/// Hybrid catalog retrieval configuration.
///
/// The RRF constant and candidate window materially change result
/// quality, so they are named tunables rather than literals in the
/// algorithm.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RetrievalConfig {
    /// Reciprocal Rank Fusion constant. Dampens the influence of rank
    /// position for items far down either list.
    #[serde(default = "default_rrf_k")]
    pub rrf_k: f64,

    /// Number of top candidates each ranking method contributes to
    /// fusion, independent of the final result count.
    #[serde(default = "default_candidate_window")]
    pub candidate_window: usize,

    /// Default number of fused results returned to the caller.
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            rrf_k: default_rrf_k(),
            candidate_window: default_candidate_window(),
            max_results: default_max_results(),
        }
    }
}

fn default_rrf_k() -> f64 {
    60.0
}

fn default_candidate_window() -> usize {
    20
}

fn default_max_results() -> usize {
    3
}
