//! # Error Types
//!
//! Domain-specific error types for stockpile-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  stockpile-core errors (this file)                                     │
//! │  ├── CoreError        - Inventory rule violations                      │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  stockpile-db errors (separate crate)                                  │
//! │  └── DbError          - Store failures, wraps CoreError as Rejected    │
//! │                                                                         │
//! │  Admin API errors (in app)                                             │
//! │  └── ApiError         - What the UI sees (serialized)                  │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → UI           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// Raised while an adjustment or transfer is being prepared or applied.
/// Every variant aborts the surrounding store transaction.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A line item references a product that is not in the catalog.
    ///
    /// ## When This Occurs
    /// - Product id typed by hand or stale in the UI
    /// - Product deleted while the adjustment form was open
    #[error("Product does not exist: {0}")]
    ProductNotFound(String),

    /// A quantity is NaN or infinite.
    #[error("Quantity for product {product_id} is not a finite number")]
    InvalidQuantity { product_id: String },

    /// Applying the delta would leave a product with a non-finite stock level.
    #[error("Stock for product {product_id} would no longer be a finite number")]
    StockOverflow { product_id: String },

    /// A line value or the record total does not fit in cents.
    #[error("Total amount is too large")]
    AmountOverflow,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Used for early validation before any store round trip.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be a finite number.
    #[error("{field} must be a finite number")]
    NotFinite { field: String },

    /// Invalid format (e.g., malformed reference number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::ProductNotFound("P1".to_string());
        assert_eq!(err.to_string(), "Product does not exist: P1");

        let err = CoreError::InvalidQuantity {
            product_id: "P2".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Quantity for product P2 is not a finite number"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "location".to_string(),
        };
        assert_eq!(err.to_string(), "location is required");

        let err = ValidationError::NotFinite {
            field: "quantity".to_string(),
        };
        assert_eq!(err.to_string(), "quantity must be a finite number");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "items".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
