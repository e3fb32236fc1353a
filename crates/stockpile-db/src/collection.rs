//! # Collections
//!
//! A handle on one named collection of the document store. Every call here
//! runs as its own implicit transaction; use
//! [`Transaction`](crate::transaction::Transaction) when several documents
//! must change together.
//!
//! ```text
//! db.collection("products")
//!   ├── get_all()              newest first
//!   ├── find_eq(field, value)  top-level string equality
//!   ├── get(id)
//!   ├── create(fields)         generated UUID id
//!   ├── insert(id, fields)     caller-chosen id
//!   ├── update(id, patch)      shallow merge, version + 1
//!   └── delete(id)
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::document::{encode_body, fetch_document, merge_fields, Document, DocumentRow};
use crate::error::{DbError, DbResult};
use crate::transaction::begin_write;
use crate::value::Fields;

/// Handle on one collection. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Collection {
    pool: SqlitePool,
    name: String,
}

impl Collection {
    pub(crate) fn new(pool: SqlitePool, name: impl Into<String>) -> Self {
        Collection {
            pool,
            name: name.into(),
        }
    }

    /// Collection name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns every document, newest first.
    pub async fn get_all(&self) -> DbResult<Vec<Document>> {
        let rows: Vec<DocumentRow> = sqlx::query_as(
            r#"
            SELECT collection, id, data, version, created_at, updated_at
            FROM documents
            WHERE collection = ?1
            ORDER BY created_at DESC, id
            "#,
        )
        .bind(&self.name)
        .fetch_all(&self.pool)
        .await?;

        debug!(collection = %self.name, count = rows.len(), "Fetched collection");
        rows.into_iter().map(Document::try_from).collect()
    }

    /// Returns documents whose top-level `field` equals `value`, newest first.
    pub async fn find_eq(&self, field: &str, value: &str) -> DbResult<Vec<Document>> {
        let path = json_path(field)?;

        let rows: Vec<DocumentRow> = sqlx::query_as(
            r#"
            SELECT collection, id, data, version, created_at, updated_at
            FROM documents
            WHERE collection = ?1 AND json_extract(data, ?2) = ?3
            ORDER BY created_at DESC, id
            "#,
        )
        .bind(&self.name)
        .bind(path)
        .bind(value)
        .fetch_all(&self.pool)
        .await?;

        debug!(
            collection = %self.name,
            field = %field,
            count = rows.len(),
            "Filtered collection"
        );
        rows.into_iter().map(Document::try_from).collect()
    }

    /// Returns one document, or `None` when the id is unknown.
    pub async fn get(&self, id: &str) -> DbResult<Option<Document>> {
        fetch_document(&self.pool, &self.name, id).await
    }

    /// Creates a document under a freshly generated UUID v4.
    pub async fn create(&self, fields: Fields) -> DbResult<Document> {
        let id = generate_document_id();
        self.insert(&id, fields).await
    }

    /// Creates a document under a caller-chosen id.
    ///
    /// ## Errors
    /// `DbError::AlreadyExists` when the id is taken.
    pub async fn insert(&self, id: &str, fields: Fields) -> DbResult<Document> {
        let now = Utc::now();
        let body = encode_body(&self.name, id, &fields)?;

        debug!(collection = %self.name, id = %id, "Creating document");

        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, data, version, created_at, updated_at)
            VALUES (?1, ?2, ?3, 1, ?4, ?4)
            "#,
        )
        .bind(&self.name)
        .bind(id)
        .bind(body)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::AlreadyExists { .. } => DbError::AlreadyExists {
                collection: self.name.clone(),
                id: id.to_string(),
            },
            other => other,
        })?;

        Ok(Document {
            collection: self.name.clone(),
            id: id.to_string(),
            fields,
            version: 1,
            created_at: now,
            updated_at: now,
        })
    }

    /// Merges `patch` into an existing document and bumps its version.
    ///
    /// ## Errors
    /// `DbError::NotFound` when the document does not exist.
    pub async fn update(&self, id: &str, patch: Fields) -> DbResult<Document> {
        let mut tx = begin_write(&self.pool).await?;

        let current = fetch_document(&mut *tx, &self.name, id)
            .await?
            .ok_or_else(|| DbError::not_found(&self.name, id))?;

        let updated_at = Utc::now();
        let fields = merge_fields(current.fields, patch);
        let body = encode_body(&self.name, id, &fields)?;

        debug!(collection = %self.name, id = %id, version = current.version, "Updating document");

        sqlx::query(
            r#"
            UPDATE documents
            SET data = ?3, version = version + 1, updated_at = ?4
            WHERE collection = ?1 AND id = ?2
            "#,
        )
        .bind(&self.name)
        .bind(id)
        .bind(body)
        .bind(updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Document {
            collection: self.name.clone(),
            id: id.to_string(),
            fields,
            version: current.version + 1,
            created_at: current.created_at,
            updated_at,
        })
    }

    /// Deletes a document.
    ///
    /// ## Errors
    /// `DbError::NotFound` when nothing was deleted.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(collection = %self.name, id = %id, "Deleting document");

        let result = sqlx::query("DELETE FROM documents WHERE collection = ?1 AND id = ?2")
            .bind(&self.name)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(&self.name, id));
        }

        Ok(())
    }

    /// Counts documents in the collection.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM documents WHERE collection = ?1")
            .bind(&self.name)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Generates a new document id.
pub fn generate_document_id() -> String {
    Uuid::new_v4().to_string()
}

/// Builds a JSON path for a top-level field, rejecting anything that would
/// change the path's meaning.
fn json_path(field: &str) -> DbResult<String> {
    if field.is_empty()
        || !field
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(DbError::QueryFailed(format!(
            "unsupported field name '{}'",
            field
        )));
    }
    Ok(format!("$.{}", field))
}
