// SPDX-FileCopyrightText: 2026 Recuerdo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Recuerdo retrieval subsystem.

use thiserror::Error;

/// The primary error type used across all Recuerdo crates.
///
/// "No results" is never an error: empty result sets are normal return
/// values everywhere in the subsystem. The variants here cover the
/// failures that must reach the caller so it can tell "nothing relevant"
/// apart from "the system is broken".
#[derive(Debug, Error)]
pub enum RecuerdoError {
    /// Configuration errors (invalid TOML, bad fusion parameters,
    /// embedding dimensionality mismatch).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, schema, query failure).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Embedding provider errors (API failure, malformed response).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_variants_construct_and_display() {
        let config = RecuerdoError::Config("rrf k must be positive".into());
        assert!(config.to_string().contains("configuration error"));

        let storage = RecuerdoError::Storage {
            source: Box::new(std::io::Error::other("disk gone")),
        };
        assert!(storage.to_string().contains("storage error"));

        let provider = RecuerdoError::Provider {
            message: "embeddings endpoint returned 500".into(),
            source: None,
        };
        assert!(provider.to_string().contains("provider error"));

        let internal = RecuerdoError::Internal("unreachable".into());
        assert!(internal.to_string().contains("internal error"));
    }
}
