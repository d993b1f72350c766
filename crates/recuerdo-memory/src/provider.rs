// SPDX-FileCopyrightText: 2026 Recuerdo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! ContextProvider implementation over the fact store.
//!
//! Formats the facts relevant to the current query as a structured block
//! for prompt assembly.

use std::sync::Arc;

use async_trait::async_trait;
use recuerdo_core::traits::ContextProvider;
use recuerdo_core::RecuerdoError;

use crate::store::FactStore;

/// ContextProvider that injects remembered facts about the user.
pub struct FactMemoryProvider {
    store: Arc<FactStore>,
    search_limit: usize,
}

impl FactMemoryProvider {
    /// Creates a new provider over a fact store.
    pub fn new(store: Arc<FactStore>, search_limit: usize) -> Self {
        Self {
            store,
            search_limit,
        }
    }
}

/// Format fact contents as a structured context block.
fn format_fact_block(facts: &[String]) -> String {
    let mut block = String::from("## Remembered facts about this user\n");
    for fact in facts {
        block.push_str(&format!("- {fact}\n"));
    }
    block
}

#[async_trait]
impl ContextProvider for FactMemoryProvider {
    /// Searches the owner's facts with the current query and formats the
    /// hits as a bullet block. Returns `None` when nothing matched.
    async fn provide_context(
        &self,
        owner: &str,
        query: &str,
    ) -> Result<Option<String>, RecuerdoError> {
        let facts = self.store.search(owner, query, self.search_limit).await?;
        if facts.is_empty() {
            return Ok(None);
        }
        Ok(Some(format_fact_block(&facts)))
    }
}
