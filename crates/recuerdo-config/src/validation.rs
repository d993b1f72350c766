// SPDX-FileCopyrightText: 2026 Recuerdo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as positive fusion parameters and non-empty paths.

use crate::diagnostic::ConfigError;
use crate::model::RecuerdoConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)`
/// with all collected validation errors (does not fail fast).
pub fn validate_config(config: &RecuerdoConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if config.embedding.dimensions == 0 {
        errors.push(ConfigError::Validation {
            message: "embedding.dimensions must be positive".to_string(),
        });
    }

    if config.embedding.base_url.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "embedding.base_url must not be empty".to_string(),
        });
    }

    if config.retrieval.rrf_k <= 0.0 {
        errors.push(ConfigError::Validation {
            message: format!(
                "retrieval.rrf_k must be positive, got {}",
                config.retrieval.rrf_k
            ),
        });
    }

    if config.retrieval.candidate_window == 0 {
        errors.push(ConfigError::Validation {
            message: "retrieval.candidate_window must be positive".to_string(),
        });
    }

    if config.retrieval.max_results == 0 {
        errors.push(ConfigError::Validation {
            message: "retrieval.max_results must be positive".to_string(),
        });
    }

    if config.memory.search_limit == 0 {
        errors.push(ConfigError::Validation {
            message: "memory.search_limit must be positive".to_string(),
        });
    }

    if config.memory.list_cap == 0 {
        errors.push(ConfigError::Validation {
            message: "memory.list_cap must be positive".to_string(),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&RecuerdoConfig::default()).is_ok());
    }

    #[test]
    fn zero_rrf_k_is_rejected() {
        let mut config = RecuerdoConfig::default();
        config.retrieval.rrf_k = 0.0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.to_string().contains("rrf_k")));
    }

    #[test]
    fn negative_rrf_k_is_rejected() {
        let mut config = RecuerdoConfig::default();
        config.retrieval.rrf_k = -1.0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn zero_max_results_is_rejected() {
        let mut config = RecuerdoConfig::default();
        config.retrieval.max_results = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn empty_database_path_is_rejected() {
        let mut config = RecuerdoConfig::default();
        config.storage.database_path = "  ".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn all_errors_are_collected() {
        let mut config = RecuerdoConfig::default();
        config.retrieval.rrf_k = 0.0;
        config.retrieval.max_results = 0;
        config.embedding.dimensions = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
