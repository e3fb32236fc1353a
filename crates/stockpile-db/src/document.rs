//! # Documents
//!
//! A stored document: its address, fields and bookkeeping columns, plus the
//! row-level helpers shared by [`Collection`](crate::collection::Collection)
//! and [`Transaction`](crate::transaction::Transaction).

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use sqlx::{Executor, FromRow, Sqlite};

use crate::error::{DbError, DbResult};
use crate::sanitize::sanitize_fields;
use crate::value::{fields_from_wire, fields_to_wire, Fields, Value};

/// A document read from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub collection: String,
    pub id: String,
    pub fields: Fields,
    /// Starts at 1, bumped by every write. Transactions compare it at commit.
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    /// Returns a top-level field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Numeric field, with a missing or null field reading as `0`.
    ///
    /// Counters such as `totalAdjusted` are absent on products created before
    /// the first adjustment.
    pub fn number_or_zero(&self, field: &str) -> DbResult<f64> {
        match self.fields.get(field) {
            None | Some(Value::Null) => Ok(0.0),
            Some(value) => value.as_f64().ok_or_else(|| {
                DbError::invalid_document(
                    &self.collection,
                    &self.id,
                    format!("field '{}' is not a number", field),
                )
            }),
        }
    }

    /// Plain JSON object for the client side: timestamps sanitized to
    /// ISO-8601 strings and the document id included as `id`.
    pub fn to_plain_json(&self) -> serde_json::Value {
        let mut object: serde_json::Map<String, serde_json::Value> = sanitize_fields(&self.fields)
            .into_iter()
            .map(|(key, value)| (key, value.into()))
            .collect();
        object
            .entry("id")
            .or_insert_with(|| serde_json::Value::String(self.id.clone()));
        serde_json::Value::Object(object)
    }

    /// Deserializes the sanitized document into a typed record.
    pub fn decode<T: DeserializeOwned>(&self) -> DbResult<T> {
        serde_json::from_value(self.to_plain_json())
            .map_err(|e| DbError::invalid_document(&self.collection, &self.id, e.to_string()))
    }
}

// =============================================================================
// Row mapping
// =============================================================================

#[derive(Debug, FromRow)]
pub(crate) struct DocumentRow {
    pub collection: String,
    pub id: String,
    pub data: String,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<DocumentRow> for Document {
    type Error = DbError;

    fn try_from(row: DocumentRow) -> DbResult<Self> {
        let fields = decode_body(&row.collection, &row.id, &row.data)?;
        Ok(Document {
            collection: row.collection,
            id: row.id,
            fields,
            version: row.version,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Serializes fields into the stored `data` column.
pub(crate) fn encode_body(collection: &str, id: &str, fields: &Fields) -> DbResult<String> {
    let object = fields_to_wire(fields)
        .map_err(|e| DbError::invalid_document(collection, id, e.to_string()))?;
    serde_json::to_string(&object).map_err(|e| DbError::invalid_document(collection, id, e.to_string()))
}

/// Parses the stored `data` column back into fields.
pub(crate) fn decode_body(collection: &str, id: &str, data: &str) -> DbResult<Fields> {
    let json: serde_json::Value = serde_json::from_str(data)
        .map_err(|e| DbError::invalid_document(collection, id, e.to_string()))?;

    match json {
        serde_json::Value::Object(map) => fields_from_wire(map)
            .map_err(|e| DbError::invalid_document(collection, id, e.to_string())),
        _ => Err(DbError::invalid_document(
            collection,
            id,
            "document body is not an object",
        )),
    }
}

/// Fetches one document through any executor (pool or open transaction).
pub(crate) async fn fetch_document<'e, E>(
    executor: E,
    collection: &str,
    id: &str,
) -> DbResult<Option<Document>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row: Option<DocumentRow> = sqlx::query_as(
        r#"
        SELECT collection, id, data, version, created_at, updated_at
        FROM documents
        WHERE collection = ?1 AND id = ?2
        "#,
    )
    .bind(collection)
    .bind(id)
    .fetch_optional(executor)
    .await?;

    row.map(Document::try_from).transpose()
}

/// Shallow merge: patch keys replace existing keys, others are kept.
pub(crate) fn merge_fields(mut current: Fields, patch: Fields) -> Fields {
    current.extend(patch);
    current
}
