// SPDX-FileCopyrightText: 2026 Recuerdo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hybrid retriever combining semantic and lexical catalog rankings.
//!
//! The query is embedded once, ranked against the catalog by cosine
//! similarity and by BM25, and the two rankings are merged with
//! Reciprocal Rank Fusion. Raw ranker scores never cross the fusion
//! boundary; only 1-based ranks do.

use std::collections::HashMap;
use std::sync::Arc;

use recuerdo_config::model::RetrievalConfig;
use recuerdo_core::traits::EmbeddingAdapter;
use recuerdo_core::types::{CatalogRecord, EmbeddingInput};
use recuerdo_core::RecuerdoError;
use tracing::debug;

use crate::catalog::CatalogStore;
use crate::fusion::fuse;

/// A catalog record selected for context, with its fused score.
#[derive(Debug, Clone)]
pub struct ContextDocument {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub description: String,
    pub score: f64,
}

impl ContextDocument {
    fn from_record(record: CatalogRecord, score: f64) -> Self {
        Self {
            id: record.id,
            name: record.name,
            category: record.category,
            price: record.price,
            description: record.description,
            score,
        }
    }

    /// Renders the document as a context bullet line.
    pub fn format_line(&self) -> String {
        format!(
            "- **{}** ({}, ${:.2}): {}",
            self.name, self.category, self.price, self.description
        )
    }
}

/// Hybrid retriever over the product catalog.
pub struct HybridRetriever {
    catalog: Arc<CatalogStore>,
    embedder: Arc<dyn EmbeddingAdapter>,
    config: RetrievalConfig,
}

impl HybridRetriever {
    /// Creates a new hybrid retriever.
    pub fn new(
        catalog: Arc<CatalogStore>,
        embedder: Arc<dyn EmbeddingAdapter>,
        config: RetrievalConfig,
    ) -> Self {
        Self {
            catalog,
            embedder,
            config,
        }
    }

    /// Retrieves up to `max_results` catalog records relevant to the
    /// query, best first.
    ///
    /// Both rankers consider up to `candidate_window` candidates; an
    /// item missing from one ranking simply contributes no RRF term
    /// for it. An empty fused result is returned as an empty vec, not
    /// an error.
    pub async fn retrieve(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<ContextDocument>, RecuerdoError> {
        let output = self
            .embedder
            .embed(EmbeddingInput {
                texts: vec![query.to_string()],
            })
            .await?;
        let query_embedding =
            output
                .embeddings
                .into_iter()
                .next()
                .ok_or_else(|| RecuerdoError::Provider {
                    message: "embedding provider returned no vectors".to_string(),
                    source: None,
                })?;

        let window = self.config.candidate_window;
        let semantic = self.catalog.semantic_ranking(&query_embedding, window).await?;
        let lexical = self.catalog.lexical_ranking(query, window).await?;
        debug!(
            semantic = semantic.len(),
            lexical = lexical.len(),
            "catalog rankings computed"
        );

        let semantic_ranks: Vec<(i64, usize)> = semantic
            .iter()
            .enumerate()
            .map(|(i, (id, _))| (*id, i + 1))
            .collect();
        let lexical_ranks: Vec<(i64, usize)> = lexical
            .iter()
            .enumerate()
            .map(|(i, (id, _))| (*id, i + 1))
            .collect();

        let fused = fuse(
            &semantic_ranks,
            &lexical_ranks,
            self.config.rrf_k,
            max_results,
        )?;
        if fused.is_empty() {
            return Ok(vec![]);
        }

        let ids: Vec<i64> = fused.iter().map(|(id, _)| *id).collect();
        let records = self.catalog.get_by_ids(&ids).await?;
        let mut by_id: HashMap<i64, CatalogRecord> =
            records.into_iter().map(|r| (r.id, r)).collect();

        Ok(fused
            .iter()
            .filter_map(|(id, score)| {
                by_id
                    .remove(id)
                    .map(|record| ContextDocument::from_record(record, *score))
            })
            .collect())
    }

    /// Retrieves using the configured default result count.
    pub async fn retrieve_default(&self, query: &str) -> Result<Vec<ContextDocument>, RecuerdoError> {
        self.retrieve(query, self.config.max_results).await
    }
}
