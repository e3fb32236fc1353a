//! # Optimistic Transactions
//!
//! Multi-document read-modify-write with all-or-nothing commit.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  let mut tx = db.transaction();                                        │
//! │                                                                         │
//! │  1. READ PHASE     tx.get(..)      records (collection, id) → version  │
//! │                                    (None if the document was missing)  │
//! │  2. WRITE PHASE    tx.create(..)   buffered, nothing touches the store │
//! │                    tx.update(..)                                        │
//! │                    tx.delete(..)                                        │
//! │  3. COMMIT         one BEGIN IMMEDIATE SQLite transaction:              │
//! │                      ├── re-read every recorded version                 │
//! │                      │     mismatch → DbError::Conflict, roll back      │
//! │                      ├── apply buffered writes in order                 │
//! │                      └── COMMIT                                         │
//! │                                                                         │
//! │  Dropping the transaction without commit discards the buffered writes. │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A read after the first buffered write fails with
//! [`DbError::ReadAfterWrite`]. Conflicts are reported, never retried here.
//!
//! Commit takes the write lock up front, so concurrent committers queue on
//! `busy_timeout` and the version check alone decides who conflicts.

use std::collections::BTreeMap;

use chrono::Utc;
use sqlx::{Sqlite, SqlitePool};
use tracing::{debug, warn};

use crate::collection::generate_document_id;
use crate::document::{encode_body, fetch_document, merge_fields, Document};
use crate::error::{DbError, DbResult};
use crate::value::Fields;

type DocKey = (String, String);

/// Opens a SQL transaction holding the write lock from the start.
///
/// A deferred `BEGIN` would upgrade on the first write and fail with
/// `SQLITE_BUSY_SNAPSHOT` when another writer committed after our reads.
pub(crate) async fn begin_write(
    pool: &SqlitePool,
) -> DbResult<sqlx::Transaction<'static, Sqlite>> {
    Ok(pool.begin_with("BEGIN IMMEDIATE").await?)
}

#[derive(Debug)]
enum PendingWrite {
    Create {
        collection: String,
        id: String,
        fields: Fields,
    },
    Update {
        collection: String,
        id: String,
        patch: Fields,
    },
    Delete {
        collection: String,
        id: String,
    },
}

/// An open optimistic transaction. See the module docs for the rules.
#[derive(Debug)]
pub struct Transaction {
    pool: SqlitePool,
    reads: BTreeMap<DocKey, Option<i64>>,
    writes: Vec<PendingWrite>,
}

impl Transaction {
    pub(crate) fn new(pool: SqlitePool) -> Self {
        Transaction {
            pool,
            reads: BTreeMap::new(),
            writes: Vec::new(),
        }
    }

    /// Reads a document and records the version seen.
    ///
    /// ## Errors
    /// - `DbError::ReadAfterWrite` once any write has been buffered
    /// - `DbError::Conflict` when the same document changed between two reads
    pub async fn get(&mut self, collection: &str, id: &str) -> DbResult<Option<Document>> {
        if !self.writes.is_empty() {
            return Err(DbError::ReadAfterWrite);
        }

        let document = fetch_document(&self.pool, collection, id).await?;
        let seen = document.as_ref().map(|d| d.version);
        let key = (collection.to_string(), id.to_string());

        match self.reads.get(&key) {
            Some(previous) if *previous != seen => {
                warn!(collection = %collection, id = %id, "Document changed between reads");
                return Err(DbError::Conflict {
                    collection: key.0,
                    id: key.1,
                });
            }
            Some(_) => {}
            None => {
                self.reads.insert(key, seen);
            }
        }

        Ok(document)
    }

    /// Buffers a create under a generated id and returns that id.
    pub fn create(&mut self, collection: &str, fields: Fields) -> String {
        let id = generate_document_id();
        self.insert(collection, &id, fields);
        id
    }

    /// Buffers a create under a caller-chosen id.
    pub fn insert(&mut self, collection: &str, id: &str, fields: Fields) {
        self.writes.push(PendingWrite::Create {
            collection: collection.to_string(),
            id: id.to_string(),
            fields,
        });
    }

    /// Buffers a shallow-merge update.
    pub fn update(&mut self, collection: &str, id: &str, patch: Fields) {
        self.writes.push(PendingWrite::Update {
            collection: collection.to_string(),
            id: id.to_string(),
            patch,
        });
    }

    /// Buffers a delete.
    pub fn delete(&mut self, collection: &str, id: &str) {
        self.writes.push(PendingWrite::Delete {
            collection: collection.to_string(),
            id: id.to_string(),
        });
    }

    /// Number of buffered writes.
    pub fn pending_writes(&self) -> usize {
        self.writes.len()
    }

    /// Verifies every read and applies every buffered write atomically.
    ///
    /// ## Errors
    /// - `DbError::Conflict` if a read document changed since it was read
    /// - `DbError::AlreadyExists` / `DbError::NotFound` from individual writes
    ///
    /// Any error leaves the store exactly as it was before commit.
    pub async fn commit(self) -> DbResult<()> {
        let started = std::time::Instant::now();
        let mut tx = begin_write(&self.pool).await?;

        for ((collection, id), seen) in &self.reads {
            let current: Option<i64> =
                sqlx::query_scalar("SELECT version FROM documents WHERE collection = ?1 AND id = ?2")
                    .bind(collection)
                    .bind(id)
                    .fetch_optional(&mut *tx)
                    .await?;

            if current != *seen {
                warn!(
                    collection = %collection,
                    id = %id,
                    seen = ?seen,
                    current = ?current,
                    "Commit conflict"
                );
                return Err(DbError::Conflict {
                    collection: collection.clone(),
                    id: id.clone(),
                });
            }
        }

        let now = Utc::now();

        for write in &self.writes {
            match write {
                PendingWrite::Create {
                    collection,
                    id,
                    fields,
                } => {
                    let body = encode_body(collection, id, fields)?;
                    sqlx::query(
                        r#"
                        INSERT INTO documents (collection, id, data, version, created_at, updated_at)
                        VALUES (?1, ?2, ?3, 1, ?4, ?4)
                        "#,
                    )
                    .bind(collection)
                    .bind(id)
                    .bind(body)
                    .bind(now)
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| match DbError::from(e) {
                        DbError::AlreadyExists { .. } => DbError::AlreadyExists {
                            collection: collection.clone(),
                            id: id.clone(),
                        },
                        other => other,
                    })?;
                }

                PendingWrite::Update {
                    collection,
                    id,
                    patch,
                } => {
                    let current = fetch_document(&mut *tx, collection, id)
                        .await?
                        .ok_or_else(|| DbError::not_found(collection, id))?;
                    let fields = merge_fields(current.fields, patch.clone());
                    let body = encode_body(collection, id, &fields)?;

                    sqlx::query(
                        r#"
                        UPDATE documents
                        SET data = ?3, version = version + 1, updated_at = ?4
                        WHERE collection = ?1 AND id = ?2
                        "#,
                    )
                    .bind(collection)
                    .bind(id)
                    .bind(body)
                    .bind(now)
                    .execute(&mut *tx)
                    .await?;
                }

                PendingWrite::Delete { collection, id } => {
                    let result =
                        sqlx::query("DELETE FROM documents WHERE collection = ?1 AND id = ?2")
                            .bind(collection)
                            .bind(id)
                            .execute(&mut *tx)
                            .await?;
                    if result.rows_affected() == 0 {
                        return Err(DbError::not_found(collection, id));
                    }
                }
            }
        }

        tx.commit().await?;

        debug!(
            reads = self.reads.len(),
            writes = self.writes.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Transaction committed"
        );

        Ok(())
    }
}
