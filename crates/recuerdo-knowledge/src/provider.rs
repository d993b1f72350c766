// SPDX-FileCopyrightText: 2026 Recuerdo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! ContextProvider implementation over the hybrid catalog retriever.

use std::sync::Arc;

use async_trait::async_trait;
use recuerdo_core::traits::ContextProvider;
use recuerdo_core::RecuerdoError;

use crate::retriever::{ContextDocument, HybridRetriever};

/// Block header for retrieved catalog context.
const CONTEXT_HEADER: &str = "Relevant products from our catalog:";

/// Substitute block when no catalog record is relevant. The model needs
/// an explicit statement, otherwise it invents products.
const NO_MATCH_BLOCK: &str = "No relevant products were found in the catalog.";

/// ContextProvider that injects relevant product records.
pub struct CatalogContextProvider {
    retriever: Arc<HybridRetriever>,
}

impl CatalogContextProvider {
    /// Creates a new provider over a hybrid retriever.
    pub fn new(retriever: Arc<HybridRetriever>) -> Self {
        Self { retriever }
    }
}

/// Format retrieved documents as a structured context block.
fn format_document_block(documents: &[ContextDocument]) -> String {
    let mut block = String::from(CONTEXT_HEADER);
    block.push('\n');
    for doc in documents {
        block.push_str(&doc.format_line());
        block.push('\n');
    }
    block
}

#[async_trait]
impl ContextProvider for CatalogContextProvider {
    /// Retrieves catalog records for the query. Always returns a block:
    /// either the formatted hits or the explicit no-match statement.
    async fn provide_context(
        &self,
        _owner: &str,
        query: &str,
    ) -> Result<Option<String>, RecuerdoError> {
        let documents = self.retriever.retrieve_default(query).await?;
        if documents.is_empty() {
            return Ok(Some(NO_MATCH_BLOCK.to_string()));
        }
        Ok(Some(format_document_block(&documents)))
    }
}
