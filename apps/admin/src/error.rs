//! # API Error Type
//!
//! Unified error type for admin commands.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Command Function → Result<T, ApiError>                                │
//! │       │                                                                 │
//! │       ├── DbError::Conflict ───────────────► CONFLICT (retry the form) │
//! │       ├── DbError::NotFound ───────────────► NOT_FOUND                 │
//! │       ├── DbError::Rejected(CoreError) ────► VALIDATION_ERROR /        │
//! │       │                                      NOT_FOUND                 │
//! │       └── other DbError ───────────────────► DATABASE_ERROR (logged)   │
//! │                                                                         │
//! │  UI receives: { "code": "CONFLICT", "message": "..." }                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Internal details (SQL messages, corrupt document reasons) are logged and
//! replaced by a generic message.

use serde::Serialize;
use stockpile_core::CoreError;
use stockpile_db::DbError;
use tracing::{error, warn};

use crate::config::ConfigError;

/// Error returned from commands.
///
/// ```json
/// { "code": "NOT_FOUND", "message": "Product not found: P1" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable message
    pub message: String,
}

/// Error codes for command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Someone else changed the data first; reload and try again
    Conflict,

    /// Database operation failed
    DatabaseError,

    /// Anything else
    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::AlreadyExists { collection, id } => ApiError::validation(format!(
                "{} '{}' already exists",
                collection, id
            )),
            DbError::Conflict { collection, id } => {
                warn!(collection = %collection, id = %id, "Write conflict");
                ApiError::new(
                    ErrorCode::Conflict,
                    "The data changed while saving. Reload and try again.",
                )
            }
            DbError::ReadAfterWrite => {
                error!("Transaction read after write");
                ApiError::internal("Internal error")
            }
            DbError::InvalidDocument {
                collection,
                id,
                reason,
            } => {
                error!(collection = %collection, id = %id, reason = %reason, "Invalid document");
                ApiError::new(ErrorCode::DatabaseError, "Stored data is unreadable")
            }
            DbError::Rejected(core) => ApiError::from(core),
            DbError::ConnectionFailed(e) => {
                error!("Database connection failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                error!("Database migration failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                error!("Transaction failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database transaction failed")
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => ApiError::not_found("Product", &id),
            err @ (CoreError::InvalidQuantity { .. }
            | CoreError::StockOverflow { .. }
            | CoreError::AmountOverflow) => {
                ApiError::validation(err.to_string())
            }
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        error!("Configuration error: {}", err);
        ApiError::internal(err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Result type for commands.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use stockpile_core::ValidationError;

    #[test]
    fn test_conflict_maps_to_conflict_code() {
        let err = ApiError::from(DbError::Conflict {
            collection: "products".to_string(),
            id: "P1".to_string(),
        });
        assert_eq!(err.code, ErrorCode::Conflict);
    }

    #[test]
    fn test_rejections_map_through_core() {
        let missing = ApiError::from(DbError::Rejected(CoreError::ProductNotFound(
            "P9".to_string(),
        )));
        assert_eq!(missing.code, ErrorCode::NotFound);
        assert_eq!(missing.message, "Product not found: P9");

        let invalid = ApiError::from(DbError::Rejected(CoreError::Validation(
            ValidationError::Required {
                field: "location".to_string(),
            },
        )));
        assert_eq!(invalid.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_internal_details_are_not_leaked() {
        let err = ApiError::from(DbError::QueryFailed("near \"SELEC\": syntax error".into()));
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(!err.message.contains("SELEC"));
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(ApiError::not_found("Product", "P1")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "code": "NOT_FOUND", "message": "Product not found: P1" })
        );
    }
}
