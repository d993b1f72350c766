// SPDX-FileCopyrightText: 2026 Recuerdo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Recuerdo configuration system.

use recuerdo_config::diagnostic::ConfigError;
use recuerdo_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_config() {
    let toml = r#"
[agent]
name = "test-agent"
log_level = "debug"

[storage]
database_path = "/tmp/test.db"
wal_mode = false

[embedding]
api_key = "sk-test-123"
base_url = "http://localhost:9999/v1"
model = "text-embedding-3-small"
dimensions = 256

[memory]
search_limit = 7
list_cap = 50

[retrieval]
rrf_k = 60.0
candidate_window = 10
max_results = 4
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.agent.name, "test-agent");
    assert_eq!(config.agent.log_level, "debug");
    assert_eq!(config.storage.database_path, "/tmp/test.db");
    assert!(!config.storage.wal_mode);
    assert_eq!(config.embedding.api_key.as_deref(), Some("sk-test-123"));
    assert_eq!(config.embedding.dimensions, 256);
    assert_eq!(config.memory.search_limit, 7);
    assert_eq!(config.memory.list_cap, 50);
    assert_eq!(config.retrieval.rrf_k, 60.0);
    assert_eq!(config.retrieval.candidate_window, 10);
    assert_eq!(config.retrieval.max_results, 4);
}

/// An unknown key surfaces as a Parse diagnostic, not a panic.
#[test]
fn unknown_key_produces_parse_error() {
    let result = load_and_validate_str(
        r#"
[retrieval]
rff_k = 60.0
"#,
    );
    let errors = result.unwrap_err();
    assert!(matches!(errors[0], ConfigError::Parse { .. }));
}

/// Semantic violations surface as Validation diagnostics after a clean parse.
#[test]
fn invalid_values_produce_validation_errors() {
    let result = load_and_validate_str(
        r#"
[retrieval]
rrf_k = -5.0
max_results = 0
"#,
    );
    let errors = result.unwrap_err();
    assert_eq!(errors.len(), 2);
    assert!(errors.iter().all(|e| matches!(e, ConfigError::Validation { .. })));
}

/// A partial file keeps defaults for everything unspecified.
#[test]
fn partial_toml_keeps_defaults() {
    let config = load_and_validate_str(
        r#"
[agent]
name = "partial"
"#,
    )
    .expect("partial config should validate");
    assert_eq!(config.agent.name, "partial");
    assert_eq!(config.retrieval.rrf_k, 60.0);
    assert_eq!(config.embedding.model, "text-embedding-3-small");
}
