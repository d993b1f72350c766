// SPDX-FileCopyrightText: 2026 Recuerdo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite-backed product catalog with vector and FTS5 access paths.
//!
//! Each record carries its embedding as an f32 little-endian BLOB next
//! to the row itself; the corpus is small enough that semantic ranking
//! is a full scan with cosine similarity in process. Name and
//! description are mirrored into an external-content FTS5 table with a
//! diacritic-removing tokenizer for the lexical path.

use std::path::Path;

use recuerdo_config::model::StorageConfig;
use recuerdo_core::RecuerdoError;
use recuerdo_core::normalizer::{escape_match_token, normalize};
use recuerdo_core::types::{CatalogRecord, blob_to_vec, cosine_similarity, vec_to_blob};
use rusqlite::params;
use tokio_rusqlite::Connection;

fn storage_err(e: tokio_rusqlite::Error) -> RecuerdoError {
    RecuerdoError::Storage {
        source: Box::new(e),
    }
}

/// SQLite schema for the product catalog.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS products (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    category TEXT NOT NULL,
    price REAL NOT NULL,
    description TEXT NOT NULL,
    embedding BLOB NOT NULL
);

CREATE VIRTUAL TABLE IF NOT EXISTS products_fts USING fts5(
    name,
    description,
    content='products',
    content_rowid='id',
    tokenize='unicode61 remove_diacritics 2'
);

CREATE TRIGGER IF NOT EXISTS products_ai AFTER INSERT ON products BEGIN
    INSERT INTO products_fts(rowid, name, description)
        VALUES (new.id, new.name, new.description);
END;

CREATE TRIGGER IF NOT EXISTS products_ad AFTER DELETE ON products BEGIN
    INSERT INTO products_fts(products_fts, rowid, name, description)
        VALUES('delete', old.id, old.name, old.description);
END;
";

/// A product to insert; the id is assigned by the store.
#[derive(Debug, Clone)]
pub struct NewCatalogEntry {
    pub name: String,
    pub category: String,
    pub price: f64,
    pub description: String,
    pub embedding: Vec<f32>,
}

/// Persistent product catalog in SQLite.
pub struct CatalogStore {
    conn: Connection,
}

impl CatalogStore {
    /// Opens a catalog store using the storage configuration.
    pub async fn from_config(storage: &StorageConfig) -> Result<Self, RecuerdoError> {
        Self::open(Path::new(&storage.database_path), storage.wal_mode).await
    }

    /// Opens (or creates) a catalog store at the given path.
    pub async fn open(path: &Path, wal_mode: bool) -> Result<Self, RecuerdoError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| RecuerdoError::Storage {
                source: Box::new(e),
            })?;
        }
        let conn = Connection::open(path).await.map_err(|e| RecuerdoError::Storage {
            source: Box::new(e),
        })?;
        if wal_mode {
            conn.call(|conn| {
                conn.pragma_update(None, "journal_mode", "WAL")?;
                Ok(())
            })
            .await
            .map_err(storage_err)?;
        }
        Self::with_connection(conn).await
    }

    /// Opens an in-memory catalog store (tests, demo seeding).
    pub async fn open_in_memory() -> Result<Self, RecuerdoError> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RecuerdoError::Storage {
                source: Box::new(e),
            })?;
        Self::with_connection(conn).await
    }

    /// Wraps an existing connection, applying the catalog schema.
    pub async fn with_connection(conn: Connection) -> Result<Self, RecuerdoError> {
        conn.call(|conn| {
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await
        .map_err(storage_err)?;
        Ok(Self { conn })
    }

    /// Inserts a product and returns its assigned id.
    pub async fn insert(&self, entry: NewCatalogEntry) -> Result<i64, RecuerdoError> {
        self.conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO products (name, category, price, description, embedding)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![
                        entry.name,
                        entry.category,
                        entry.price,
                        entry.description,
                        vec_to_blob(&entry.embedding),
                    ],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await
            .map_err(storage_err)
    }

    /// Removes every product; returns the count removed. Seeding clears
    /// the table first so repeated loads do not duplicate the catalog.
    pub async fn clear_all(&self) -> Result<usize, RecuerdoError> {
        self.conn
            .call(|conn| {
                let removed = conn.execute("DELETE FROM products", [])?;
                Ok(removed)
            })
            .await
            .map_err(storage_err)
    }

    /// Counts products in the catalog.
    pub async fn count(&self) -> Result<usize, RecuerdoError> {
        self.conn
            .call(|conn| {
                let count: i64 =
                    conn.query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))?;
                Ok(count as usize)
            })
            .await
            .map_err(storage_err)
    }

    /// Fetches full records for the given ids. Output order follows the
    /// input id order; unknown ids are skipped.
    pub async fn get_by_ids(&self, ids: &[i64]) -> Result<Vec<CatalogRecord>, RecuerdoError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let ids = ids.to_vec();
        self.conn
            .call(move |conn| {
                let placeholders =
                    ids.iter().map(|_| "?").collect::<Vec<_>>().join(", ");
                let sql = format!(
                    "SELECT id, name, category, price, description, embedding
                     FROM products WHERE id IN ({placeholders})"
                );
                let mut stmt = conn.prepare(&sql)?;
                let fetched = stmt
                    .query_map(rusqlite::params_from_iter(ids.iter()), |row| {
                        let blob: Vec<u8> = row.get(5)?;
                        Ok(CatalogRecord {
                            id: row.get(0)?,
                            name: row.get(1)?,
                            category: row.get(2)?,
                            price: row.get(3)?,
                            description: row.get(4)?,
                            embedding: blob_to_vec(&blob),
                        })
                    })?
                    .collect::<Result<Vec<_>, _>>()?;

                // IN gives no ordering guarantee; restore the caller's.
                let mut ordered = Vec::with_capacity(fetched.len());
                for id in &ids {
                    if let Some(record) = fetched.iter().find(|r| r.id == *id) {
                        ordered.push(record.clone());
                    }
                }
                Ok(ordered)
            })
            .await
            .map_err(storage_err)
    }

    /// Ranks the whole catalog by cosine similarity to the query
    /// embedding, best first, capped at `window` candidates.
    ///
    /// Fails with a configuration error when any stored embedding has a
    /// different dimensionality than the query vector: that means the
    /// catalog was seeded under a different embedding model, and
    /// comparing the vectors would be meaningless.
    pub async fn semantic_ranking(
        &self,
        query_embedding: &[f32],
        window: usize,
    ) -> Result<Vec<(i64, f32)>, RecuerdoError> {
        self.conn
            .call(|conn| {
                let mut stmt = conn.prepare("SELECT id, embedding FROM products")?;
                let rows = stmt
                    .query_map([], |row| {
                        let id: i64 = row.get(0)?;
                        let blob: Vec<u8> = row.get(1)?;
                        Ok((id, blob_to_vec(&blob)))
                    })?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await
            .map_err(storage_err)
            .and_then(|rows| {
                let mut scored = Vec::with_capacity(rows.len());
                for (id, embedding) in rows {
                    if embedding.len() != query_embedding.len() {
                        return Err(RecuerdoError::Config(format!(
                            "embedding dimensionality mismatch: query has {} dimensions, \
                             catalog record {id} has {}",
                            query_embedding.len(),
                            embedding.len()
                        )));
                    }
                    scored.push((id, cosine_similarity(query_embedding, &embedding)));
                }
                scored.sort_by(|a, b| {
                    b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal)
                });
                scored.truncate(window);
                Ok(scored)
            })
    }

    /// Ranks products by BM25 over name and description, best first,
    /// capped at `window` candidates.
    ///
    /// The query is normalized into tokens and OR-joined; with no
    /// extractable tokens the lexical path contributes nothing.
    pub async fn lexical_ranking(
        &self,
        query: &str,
        window: usize,
    ) -> Result<Vec<(i64, f64)>, RecuerdoError> {
        let tokens = normalize(query);
        if tokens.is_empty() {
            return Ok(vec![]);
        }
        let match_expr = tokens
            .iter()
            .map(|t| escape_match_token(t))
            .collect::<Vec<_>>()
            .join(" OR ");
        tracing::debug!(%match_expr, "catalog lexical search");

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT p.id, bm25(products_fts) FROM products_fts
                     JOIN products p ON p.id = products_fts.rowid
                     WHERE products_fts MATCH ?1
                     ORDER BY bm25(products_fts) LIMIT ?2",
                )?;
                let rows = stmt
                    .query_map(params![match_expr, window as i64], |row| {
                        Ok((row.get::<_, i64>(0)?, row.get::<_, f64>(1)?))
                    })?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await
            .map_err(storage_err)
    }
}
