// SPDX-FileCopyrightText: 2026 Recuerdo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Figment-to-miette error bridge with fuzzy match suggestions.
//!
//! Converts Figment deserialization errors into miette diagnostics with
//! "did you mean?" suggestions using Jaro-Winkler string similarity.

use miette::Diagnostic;
use thiserror::Error;

/// Minimum Jaro-Winkler similarity score to suggest a correction.
/// 0.75 catches common typos like `serch_limit` -> `search_limit`
/// while filtering noise.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// A configuration error with diagnostic information.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// The configuration failed to parse or deserialize.
    #[error("invalid configuration: {message}")]
    #[diagnostic(
        code(recuerdo::config::parse),
        help("{}", suggestion.as_deref().unwrap_or("check recuerdo.toml against the documented keys"))
    )]
    Parse {
        /// Description of the parse failure.
        message: String,
        /// Suggested correction via fuzzy matching, if any.
        suggestion: Option<String>,
    },

    /// A configuration value failed semantic validation.
    #[error("invalid configuration value: {message}")]
    #[diagnostic(code(recuerdo::config::validation))]
    Validation {
        /// Description of the constraint violation.
        message: String,
    },
}

/// Suggest the closest valid key for an unknown key, if any candidate is
/// similar enough.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|k| (*k, strsim::jaro_winkler(unknown, k)))
        .filter(|(_, score)| *score >= SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(k, _)| k.to_string())
}

/// Convert a figment extraction error into diagnostics.
///
/// Serde's `deny_unknown_fields` message carries the valid key list
/// ("unknown field `x`, expected one of `a`, `b`"); when present it is
/// reused as the fuzzy-match candidate pool.
pub fn figment_to_config_errors(err: figment::Error) -> Vec<ConfigError> {
    err.into_iter()
        .map(|e| {
            let message = e.to_string();
            let suggestion = parse_unknown_field(&message).and_then(|(key, candidates)| {
                let refs: Vec<&str> = candidates.iter().map(String::as_str).collect();
                suggest_key(&key, &refs).map(|s| format!("did you mean `{s}`?"))
            });
            ConfigError::Parse {
                message,
                suggestion,
            }
        })
        .collect()
}

/// Render configuration errors to stderr as miette reports.
pub fn render_errors(errors: Vec<ConfigError>) {
    for error in errors {
        eprintln!("{:?}", miette::Report::new(error));
    }
}

/// Extract the offending key and the valid-key candidates from a serde
/// "unknown field" message. Returns `None` for other error shapes.
fn parse_unknown_field(message: &str) -> Option<(String, Vec<String>)> {
    let rest = message.strip_prefix("unknown field `")?;
    let (key, rest) = rest.split_once('`')?;
    let candidates = rest
        .split('`')
        .skip(1)
        .step_by(2)
        .map(str::to_string)
        .collect::<Vec<_>>();
    if candidates.is_empty() {
        return None;
    }
    Some((key.to_string(), candidates))
}
