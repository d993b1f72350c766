// SPDX-FileCopyrightText: 2026 Recuerdo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Context provider trait: the boundary between retrieval engines and
//! prompt assembly.
//!
//! The surrounding application calls every registered provider with the
//! user's latest message and splices the returned blocks into the prompt
//! between the system prompt and the conversation history.

use async_trait::async_trait;

use crate::error::RecuerdoError;

/// A provider that supplies query-relevant context for a prompt.
///
/// Implementations format their own results (remembered facts, catalog
/// hits) as a ready-to-inject text block. Returning `None` means nothing
/// relevant was found; the assembler decides what, if anything, to say
/// about that.
#[async_trait]
pub trait ContextProvider: Send + Sync {
    /// Returns a context block for the given owner and query, or `None`
    /// when no relevant context applies.
    async fn provide_context(
        &self,
        owner: &str,
        query: &str,
    ) -> Result<Option<String>, RecuerdoError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedProvider {
        block: Option<String>,
    }

    #[async_trait]
    impl ContextProvider for FixedProvider {
        async fn provide_context(
            &self,
            _owner: &str,
            _query: &str,
        ) -> Result<Option<String>, RecuerdoError> {
            Ok(self.block.clone())
        }
    }

    #[tokio::test]
    async fn provider_returns_block() {
        let provider = FixedProvider {
            block: Some("## Remembered facts\n- User prefers Celsius\n".into()),
        };
        let block = provider.provide_context("user-1", "weather?").await.unwrap();
        assert!(block.unwrap().contains("Celsius"));
    }

    #[tokio::test]
    async fn provider_returns_none_when_nothing_relevant() {
        let provider = FixedProvider { block: None };
        let block = provider.provide_context("user-1", "weather?").await.unwrap();
        assert!(block.is_none());
    }
}
