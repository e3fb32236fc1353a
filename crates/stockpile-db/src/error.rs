//! # Database Error Types
//!
//! Error types for document store operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)        CoreError (inventory rules)         │
//! │       │                                  │                              │
//! │       ▼                                  ▼                              │
//! │  DbError (this module) ◄──── DbError::Rejected                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (admin app) ← Serialized for the UI                          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing in the transactional path is swallowed: every variant reaches the
//! caller unchanged.

use stockpile_core::CoreError;
use thiserror::Error;

/// Document store operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Document not found.
    ///
    /// ## When This Occurs
    /// - `update` or `delete` on a missing id
    /// - Buffered transaction update on a document deleted meanwhile
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A create targeted an id that is already taken in the collection.
    #[error("Document already exists: {collection}/{id}")]
    AlreadyExists { collection: String, id: String },

    /// Optimistic concurrency check failed at commit.
    ///
    /// ## When This Occurs
    /// A document read inside the transaction was created, modified or
    /// deleted by someone else before commit. The transaction is aborted in
    /// full and not retried.
    #[error("Transaction aborted: {collection}/{id} changed since it was read")]
    Conflict { collection: String, id: String },

    /// A transaction tried to read after buffering a write.
    #[error("Transactions must perform all reads before any writes")]
    ReadAfterWrite,

    /// Stored document body could not be decoded or encoded.
    #[error("Invalid document {collection}/{id}: {reason}")]
    InvalidDocument {
        collection: String,
        id: String,
        reason: String,
    },

    /// An inventory rule rejected the operation inside a transaction.
    #[error(transparent)]
    Rejected(#[from] CoreError),

    /// Database connection failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Transaction could not be started or committed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates an InvalidDocument error.
    pub fn invalid_document(
        collection: impl Into<String>,
        id: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        DbError::InvalidDocument {
            collection: collection.into(),
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// True when the failure came from a concurrent writer.
    pub fn is_conflict(&self) -> bool {
        matches!(self, DbError::Conflict { .. })
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → Analyze message for constraint type
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Document".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // "UNIQUE constraint failed: documents.collection, documents.id"
                if msg.contains("UNIQUE constraint failed") {
                    DbError::AlreadyExists {
                        collection: "unknown".to_string(),
                        id: "unknown".to_string(),
                    }
                } else if msg.contains("database is locked") || msg.contains("database is busy") {
                    DbError::TransactionFailed(msg.to_string())
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;
