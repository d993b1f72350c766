// SPDX-FileCopyrightText: 2026 Recuerdo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite-backed fact store with FTS5 keyword search scoped per owner.
//!
//! Facts live in a plain table; an external-content FTS5 table with sync
//! triggers provides BM25 ranking. The FTS tokenizer removes diacritics,
//! so "Paris" in a query matches "París" in indexed content.
//!
//! All writes are serialized through tokio-rusqlite's single background
//! thread. Duplicate detection runs in the same connection-thread closure
//! as the insert, so two concurrent saves of the same content cannot both
//! observe "no duplicate".

use std::path::Path;

use recuerdo_config::model::{MemoryConfig, StorageConfig};
use recuerdo_core::RecuerdoError;
use recuerdo_core::normalizer::{escape_match_token, normalize};
use recuerdo_core::types::{Fact, SaveOutcome};
use chrono::{SecondsFormat, Utc};
use rusqlite::params;
use tokio_rusqlite::Connection;
use uuid::Uuid;

/// Helper to convert tokio_rusqlite errors into RecuerdoError::Storage.
fn storage_err(e: tokio_rusqlite::Error) -> RecuerdoError {
    RecuerdoError::Storage {
        source: Box::new(e),
    }
}

/// SQLite schema for the fact store.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS facts (
    id TEXT PRIMARY KEY NOT NULL,
    owner TEXT NOT NULL,
    content TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

CREATE INDEX IF NOT EXISTS idx_facts_owner ON facts(owner);

CREATE VIRTUAL TABLE IF NOT EXISTS facts_fts USING fts5(
    content,
    content='facts',
    content_rowid='rowid',
    tokenize='unicode61 remove_diacritics 2'
);

CREATE TRIGGER IF NOT EXISTS facts_ai AFTER INSERT ON facts BEGIN
    INSERT INTO facts_fts(rowid, content) VALUES (new.rowid, new.content);
END;

CREATE TRIGGER IF NOT EXISTS facts_ad AFTER DELETE ON facts BEGIN
    INSERT INTO facts_fts(facts_fts, rowid, content)
        VALUES('delete', old.rowid, old.content);
END;
";

/// Persistent store for per-user facts in SQLite.
pub struct FactStore {
    conn: Connection,
    list_cap: usize,
}

impl FactStore {
    /// Opens a fact store using the storage and memory configuration.
    pub async fn from_config(
        storage: &StorageConfig,
        memory: &MemoryConfig,
    ) -> Result<Self, RecuerdoError> {
        Self::open(
            Path::new(&storage.database_path),
            storage.wal_mode,
            memory.list_cap,
        )
        .await
    }

    /// Opens (or creates) a fact store at the given path.
    pub async fn open(path: &Path, wal_mode: bool, list_cap: usize) -> Result<Self, RecuerdoError> {
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
        Self::with_connection(conn, list_cap).await
    }

    /// Opens an in-memory fact store (tests, ephemeral sessions).
    pub async fn open_in_memory(list_cap: usize) -> Result<Self, RecuerdoError> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RecuerdoError::Storage {
                source: Box::new(e),
            })?;
        Self::with_connection(conn, list_cap).await
    }

    /// Wraps an existing connection, applying the fact schema.
    pub async fn with_connection(conn: Connection, list_cap: usize) -> Result<Self, RecuerdoError> {
        conn.call(|conn| {
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await
        .map_err(storage_err)?;
        Ok(Self { conn, list_cap })
    }

    /// Save a fact for an owner, skipping exact duplicates.
    ///
    /// Content is compared trimmed and case-folded against every fact the
    /// owner already has (linear scan, the baseline contract at this
    /// scale). The scan and the insert run in one connection-thread
    /// closure, so duplicate detection serializes with the write.
    pub async fn save(&self, owner: &str, content: &str) -> Result<SaveOutcome, RecuerdoError> {
        let owner = owner.to_string();
        let content = content.to_string();
        self.conn
            .call(move |conn| {
                let normalized = content.trim().to_lowercase();
                let mut stmt = conn.prepare("SELECT content FROM facts WHERE owner = ?1")?;
                let existing = stmt.query_map(params![owner], |row| row.get::<_, String>(0))?;
                for row in existing {
                    if row?.trim().to_lowercase() == normalized {
                        tracing::debug!(%owner, "duplicate fact skipped");
                        return Ok(SaveOutcome::Duplicate);
                    }
                }
                drop(stmt);

                let id = Uuid::new_v4().to_string();
                let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
                conn.execute(
                    "INSERT INTO facts (id, owner, content, created_at)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![id, owner, content, created_at],
                )?;
                tracing::debug!(%owner, fact_id = %id, "fact saved");
                Ok(SaveOutcome::Saved(id))
            })
            .await
            .map_err(storage_err)
    }

    /// Search an owner's facts by keyword relevance.
    ///
    /// The query is normalized into search tokens. With no extractable
    /// keywords the search degrades to "no filter": all facts for the
    /// owner, truncated to `max_results`. Otherwise tokens are OR-joined
    /// into one FTS5 MATCH scoped to the owner, ordered by BM25.
    ///
    /// A query rejected by FTS5 yields an empty result, never an error.
    /// Storage failures (missing index, broken database) propagate as
    /// [`RecuerdoError::Storage`].
    pub async fn search(
        &self,
        owner: &str,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<String>, RecuerdoError> {
        let tokens = normalize(query);
        if tokens.is_empty() {
            tracing::debug!(%owner, "no extractable keywords, returning all facts");
            return self.list(owner, max_results).await;
        }

        let match_expr = tokens
            .iter()
            .map(|t| escape_match_token(t))
            .collect::<Vec<_>>()
            .join(" OR ");
        tracing::debug!(%owner, %match_expr, "fact search");

        let owner = owner.to_string();
        self.conn
            .call(move |conn| {
                match run_fts_search(conn, &owner, &match_expr, max_results) {
                    Ok(contents) => Ok(contents),
                    Err(e) if is_query_syntax_error(&e) => {
                        tracing::warn!(%owner, error = %e, "fact query rejected by fts5, returning empty");
                        Ok(Vec::new())
                    }
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(storage_err)
    }

    /// Return all fact contents for an owner, up to the configured cap,
    /// in store default (creation) order.
    pub async fn list_all(&self, owner: &str) -> Result<Vec<String>, RecuerdoError> {
        self.list(owner, self.list_cap).await
    }

    /// Return all facts for an owner with metadata, up to the cap.
    pub async fn list_facts(&self, owner: &str) -> Result<Vec<Fact>, RecuerdoError> {
        let owner = owner.to_string();
        let cap = self.list_cap;
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, owner, content, created_at FROM facts
                     WHERE owner = ?1 ORDER BY created_at, rowid LIMIT ?2",
                )?;
                let facts = stmt
                    .query_map(params![owner, cap as i64], |row| {
                        Ok(Fact {
                            id: row.get(0)?,
                            owner: row.get(1)?,
                            content: row.get(2)?,
                            created_at: row.get(3)?,
                        })
                    })?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(facts)
            })
            .await
            .map_err(storage_err)
    }

    /// Count an owner's facts.
    pub async fn count(&self, owner: &str) -> Result<usize, RecuerdoError> {
        let owner = owner.to_string();
        self.conn
            .call(move |conn| {
                let count: i64 = conn.query_row(
                    "SELECT COUNT(*) FROM facts WHERE owner = ?1",
                    params![owner],
                    |row| row.get(0),
                )?;
                Ok(count as usize)
            })
            .await
            .map_err(storage_err)
    }

    /// Delete every fact owned by `owner`; returns the count removed.
    ///
    /// A single DELETE statement, so the removal is atomic: on return
    /// either all of the owner's facts are gone or the call failed.
    pub async fn clear(&self, owner: &str) -> Result<usize, RecuerdoError> {
        let owner = owner.to_string();
        self.conn
            .call(move |conn| {
                let removed = conn.execute("DELETE FROM facts WHERE owner = ?1", params![owner])?;
                tracing::info!(%owner, removed, "facts cleared");
                Ok(removed)
            })
            .await
            .map_err(storage_err)
    }

    async fn list(&self, owner: &str, limit: usize) -> Result<Vec<String>, RecuerdoError> {
        let owner = owner.to_string();
        let limit = limit.min(self.list_cap);
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT content FROM facts WHERE owner = ?1
                     ORDER BY created_at, rowid LIMIT ?2",
                )?;
                let contents = stmt
                    .query_map(params![owner, limit as i64], |row| row.get(0))?
                    .collect::<Result<Vec<String>, _>>()?;
                Ok(contents)
            })
            .await
            .map_err(storage_err)
    }
}

/// True when FTS5 rejected the MATCH expression itself. SQLite reports
/// these as a generic SQLITE_ERROR, so the message text is the only
/// discriminator from real storage failures like a missing index table.
fn is_query_syntax_error(e: &rusqlite::Error) -> bool {
    match e {
        rusqlite::Error::SqliteFailure(_, Some(message)) => {
            let message = message.to_lowercase();
            message.contains("fts5: syntax error")
                || message.contains("unknown special query")
                || message.contains("malformed match")
                || message.contains("fts5: phrase")
        }
        _ => false,
    }
}

/// Execute the owner-scoped FTS5 match. Split out so the caller can
/// absorb FTS5 query errors without losing storage-level ones.
fn run_fts_search(
    conn: &rusqlite::Connection,
    owner: &str,
    match_expr: &str,
    max_results: usize,
) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT f.content FROM facts_fts
         JOIN facts f ON f.rowid = facts_fts.rowid
         WHERE facts_fts MATCH ?1 AND f.owner = ?2
         ORDER BY bm25(facts_fts) LIMIT ?3",
    )?;
    let contents = stmt
        .query_map(params![match_expr, owner, max_results as i64], |row| {
            row.get(0)
        })?
        .collect::<Result<Vec<String>, _>>()?;
    Ok(contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_store() -> FactStore {
        FactStore::open_in_memory(100).await.unwrap()
    }

    #[tokio::test]
    async fn save_and_list() {
        let store = setup_store().await;
        let outcome = store.save("u1", "The user's favorite city is Tokyo").await.unwrap();
        assert!(matches!(outcome, SaveOutcome::Saved(_)));

        let facts = store.list_all("u1").await.unwrap();
        assert_eq!(facts, vec!["The user's favorite city is Tokyo"]);
    }

    #[tokio::test]
    async fn saving_identical_content_twice_stores_one_fact() {
        let store = setup_store().await;
        store.save("u1", "The user prefers Celsius").await.unwrap();
        let second = store.save("u1", "The user prefers Celsius").await.unwrap();
        assert_eq!(second, SaveOutcome::Duplicate);
        assert_eq!(store.list_all("u1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn dedup_is_trim_and_case_insensitive() {
        let store = setup_store().await;
        store.save("u1", "The user prefers Celsius").await.unwrap();
        let outcome = store.save("u1", "  the USER prefers celsius  ").await.unwrap();
        assert_eq!(outcome, SaveOutcome::Duplicate);
        assert_eq!(store.count("u1").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn distinct_contents_are_stored_independently() {
        let store = setup_store().await;
        store.save("u1", "The user prefers Celsius").await.unwrap();
        store.save("u1", "The user prefers Fahrenheit").await.unwrap();
        assert_eq!(store.count("u1").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn same_content_for_different_owners_is_not_a_duplicate() {
        let store = setup_store().await;
        store.save("u1", "The user prefers Celsius").await.unwrap();
        let outcome = store.save("u2", "The user prefers Celsius").await.unwrap();
        assert!(matches!(outcome, SaveOutcome::Saved(_)));
    }

    #[tokio::test]
    async fn search_finds_matching_fact() {
        let store = setup_store().await;
        store.save("u1", "The user's favorite city is Tokyo").await.unwrap();
        store.save("u1", "The user has a dog named Max").await.unwrap();

        let hits = store.search("u1", "what is my favorite city?", 5).await.unwrap();
        assert_eq!(hits, vec!["The user's favorite city is Tokyo"]);
    }

    #[tokio::test]
    async fn search_is_disjunctive_across_tokens() {
        let store = setup_store().await;
        store.save("u1", "The user's favorite city is Tokyo").await.unwrap();
        store.save("u1", "The user has a dog named Max").await.unwrap();

        let hits = store.search("u1", "city dog", 5).await.unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[tokio::test]
    async fn search_is_scoped_to_owner() {
        let store = setup_store().await;
        store.save("u1", "The user's favorite city is Tokyo").await.unwrap();
        store.save("u2", "The user's favorite city is Madrid").await.unwrap();

        let hits = store.search("u2", "favorite city", 5).await.unwrap();
        assert_eq!(hits, vec!["The user's favorite city is Madrid"]);
    }

    #[tokio::test]
    async fn blank_query_falls_back_to_all_facts() {
        let store = setup_store().await;
        store.save("u1", "Fact one about hiking").await.unwrap();
        store.save("u1", "Fact two about kayaks").await.unwrap();

        let empty = store.search("u1", "", 5).await.unwrap();
        assert_eq!(empty.len(), 2);

        let spaces = store.search("u1", "   ", 5).await.unwrap();
        assert_eq!(spaces, store.list_all("u1").await.unwrap());
    }

    #[tokio::test]
    async fn stop_word_only_query_falls_back_truncated() {
        let store = setup_store().await;
        store.save("u1", "Fact one").await.unwrap();
        store.save("u1", "Fact two").await.unwrap();
        store.save("u1", "Fact three").await.unwrap();

        // "que es" is all stop words: no filter, but the cap still applies.
        let hits = store.search("u1", "que es", 2).await.unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[tokio::test]
    async fn accented_query_matches_unaccented_content() {
        let store = setup_store().await;
        store.save("u1", "The user just asked about Paris").await.unwrap();

        let hits = store.search("u1", "¿Qué viste en París?", 5).await.unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[tokio::test]
    async fn unaccented_query_matches_accented_content() {
        let store = setup_store().await;
        store.save("u1", "Al usuario le gusta la observación de aves").await.unwrap();

        let hits = store.search("u1", "observacion aves", 5).await.unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[tokio::test]
    async fn punctuated_query_does_not_error() {
        let store = setup_store().await;
        store.save("u1", "The user likes C++ and Rust").await.unwrap();

        // Operators and punctuation must never reach FTS5 unescaped.
        let hits = store.search("u1", "\"rust\" OR (c++) NOT -x", 5).await.unwrap();
        assert!(hits.len() <= 1);
    }

    #[tokio::test]
    async fn rejected_match_expression_is_classified_as_syntax() {
        let store = setup_store().await;
        let err = store
            .conn
            .call(|conn| match run_fts_search(conn, "u1", "AND NOT (", 5) {
                Ok(_) => Ok::<_, rusqlite::Error>(None),
                Err(e) => Ok(Some(e)),
            })
            .await
            .unwrap()
            .expect("fts5 should reject the expression");
        assert!(is_query_syntax_error(&err), "got {err}");

        let missing = rusqlite::Error::QueryReturnedNoRows;
        assert!(!is_query_syntax_error(&missing));
    }

    #[tokio::test]
    async fn missing_index_surfaces_as_storage_error() {
        let store = setup_store().await;
        store.save("u1", "The user's favorite city is Tokyo").await.unwrap();

        // Simulate a broken store: the FTS index is gone entirely. This
        // is not a rejected query and must not degrade to "no results".
        store
            .conn
            .call(|conn| {
                conn.execute_batch(
                    "DROP TRIGGER facts_ai;
                     DROP TRIGGER facts_ad;
                     DROP TABLE facts_fts;",
                )?;
                Ok::<_, rusqlite::Error>(())
            })
            .await
            .unwrap();

        let err = store.search("u1", "favorite city", 5).await.unwrap_err();
        assert!(matches!(err, RecuerdoError::Storage { .. }));
    }

    #[tokio::test]
    async fn search_respects_max_results() {
        let store = setup_store().await;
        for i in 0..10 {
            store.save("u1", &format!("The user visited museum number {i}")).await.unwrap();
        }
        let hits = store.search("u1", "museum", 3).await.unwrap();
        assert_eq!(hits.len(), 3);
    }

    #[tokio::test]
    async fn clear_removes_only_that_owner() {
        let store = setup_store().await;
        store.save("u1", "Fact for u1").await.unwrap();
        store.save("u1", "Another fact for u1").await.unwrap();
        store.save("u2", "Fact for u2").await.unwrap();

        let removed = store.clear("u1").await.unwrap();
        assert_eq!(removed, 2);
        assert!(store.list_all("u1").await.unwrap().is_empty());
        assert_eq!(store.list_all("u2").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn cleared_facts_are_gone_from_the_index() {
        let store = setup_store().await;
        store.save("u1", "The user's favorite city is Tokyo").await.unwrap();
        store.clear("u1").await.unwrap();

        let hits = store.search("u1", "favorite city", 5).await.unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn list_all_respects_cap() {
        let store = FactStore::open_in_memory(3).await.unwrap();
        for i in 0..5 {
            store.save("u1", &format!("Distinct fact number {i}")).await.unwrap();
        }
        assert_eq!(store.list_all("u1").await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn list_facts_carries_metadata() {
        let store = setup_store().await;
        store.save("u1", "The user has a dog named Max").await.unwrap();

        let facts = store.list_facts("u1").await.unwrap();
        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].owner, "u1");
        assert!(!facts[0].id.is_empty());
        assert!(!facts[0].created_at.is_empty());
    }

    #[tokio::test]
    async fn on_disk_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("facts.db");
        {
            let store = FactStore::open(&path, true, 100).await.unwrap();
            store.save("u1", "The user prefers window seats").await.unwrap();
        }
        let store = FactStore::open(&path, true, 100).await.unwrap();
        assert_eq!(store.list_all("u1").await.unwrap().len(), 1);
    }
}
