// SPDX-FileCopyrightText: 2026 Recuerdo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./recuerdo.toml` > `~/.config/recuerdo/recuerdo.toml`
//! > `/etc/recuerdo/recuerdo.toml` with environment variable overrides via
//! `RECUERDO_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::RecuerdoConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/recuerdo/recuerdo.toml` (system-wide)
/// 3. `~/.config/recuerdo/recuerdo.toml` (user XDG config)
/// 4. `./recuerdo.toml` (local directory)
/// 5. `RECUERDO_*` environment variables
pub fn load_config() -> Result<RecuerdoConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RecuerdoConfig::default()))
        .merge(Toml::file("/etc/recuerdo/recuerdo.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("recuerdo/recuerdo.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("recuerdo.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<RecuerdoConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RecuerdoConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<RecuerdoConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RecuerdoConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `RECUERDO_STORAGE_DATABASE_PATH` must
/// map to `storage.database_path`, not `storage.database.path`.
fn env_provider() -> Env {
    Env::prefixed("RECUERDO_").map(|key| {
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("embedding_", "embedding.", 1)
            .replacen("memory_", "memory.", 1)
            .replacen("retrieval_", "retrieval.", 1);
        mapped.into()
    })
}
