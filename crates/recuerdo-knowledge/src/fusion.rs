// SPDX-FileCopyrightText: 2026 Recuerdo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reciprocal Rank Fusion over two ranked candidate lists.
//!
//! Fusion operates purely on identifiers and 1-based ranks. It never
//! inspects the underlying raw scores, so rankers with incomparable
//! score scales (cosine similarity vs bm25) can be merged directly.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use recuerdo_core::RecuerdoError;

/// Default RRF damping constant per research literature.
pub const DEFAULT_RRF_K: f64 = 60.0;

/// Fuses two ranked lists with Reciprocal Rank Fusion.
///
/// Each list holds `(id, rank)` pairs where rank 1 is the best hit.
/// An identifier appearing in both lists accumulates
/// `1/(k + rank_a) + 1/(k + rank_b)`; an identifier in one list only
/// contributes its single term. Only the first occurrence of an
/// identifier within a list counts.
///
/// The result is sorted by fused score descending and truncated to
/// `limit`. Ties are broken by first encounter: `list_a` is walked
/// before `list_b`, each in rank order, so an item seen earlier wins.
pub fn fuse<I>(
    list_a: &[(I, usize)],
    list_b: &[(I, usize)],
    k: f64,
    limit: usize,
) -> Result<Vec<(I, f64)>, RecuerdoError>
where
    I: Eq + Hash + Clone,
{
    if !(k > 0.0) {
        return Err(RecuerdoError::Config(format!(
            "rrf constant k must be positive, got {k}"
        )));
    }
    if limit == 0 {
        return Err(RecuerdoError::Config(
            "fusion limit must be positive".to_string(),
        ));
    }

    // (fused score, first-encounter order) per identifier.
    let mut scores: HashMap<I, (f64, usize)> = HashMap::new();
    let mut next_seen = 0usize;

    for list in [list_a, list_b] {
        let mut seen_in_list: HashSet<&I> = HashSet::new();
        for (id, rank) in list {
            if !seen_in_list.insert(id) {
                continue;
            }
            let entry = scores.entry(id.clone()).or_insert_with(|| {
                let slot = (0.0, next_seen);
                next_seen += 1;
                slot
            });
            entry.0 += 1.0 / (k + *rank as f64);
        }
    }

    let mut fused: Vec<(I, f64, usize)> = scores
        .into_iter()
        .map(|(id, (score, seen))| (id, score, seen))
        .collect();
    fused.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then(a.2.cmp(&b.2))
    });
    fused.truncate(limit);

    Ok(fused.into_iter().map(|(id, score, _)| (id, score)).collect())
}
