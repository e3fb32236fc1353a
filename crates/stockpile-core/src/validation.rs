//! # Validation Module
//!
//! Input validation for inventory records.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Admin UI forms                                               │
//! │  └── Required fields, immediate feedback                               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Admin command (Rust)                                         │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: Business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Store transaction                                            │
//! │  └── Product existence, finite stock after the delta                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::{NewProduct, NewStockAdjustment, NewStockTransfer, StockLineItem};
use crate::MAX_LINE_ITEMS;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

fn require(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - At most 200 characters
///
/// ```rust
/// use stockpile_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Coca-Cola 330ml").is_ok());
/// assert!(validate_product_name("").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    require("name", name)?;

    if name.trim().len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a business location name (store, warehouse).
pub fn validate_location(field: &str, location: &str) -> ValidationResult<()> {
    require(field, location)?;

    if location.trim().len() > 100 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 100,
        });
    }

    Ok(())
}

/// Validates a caller-supplied reference number.
///
/// ## Rules
/// - Not blank, at most 50 characters
/// - Letters, digits, hyphens, underscores and slashes only
pub fn validate_reference_no(reference_no: &str) -> ValidationResult<()> {
    let reference_no = reference_no.trim();
    require("referenceNo", reference_no)?;

    if reference_no.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "referenceNo".to_string(),
            max: 50,
        });
    }

    if !reference_no
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '/')
    {
        return Err(ValidationError::InvalidFormat {
            field: "referenceNo".to_string(),
            reason: "must contain only letters, numbers, '-', '_' and '/'".to_string(),
        });
    }

    Ok(())
}

/// A caller-supplied reference number, treating blank input as absent so a
/// generated one is used instead.
pub fn supplied_reference_no(reference_no: Option<&str>) -> Option<&str> {
    reference_no.map(str::trim).filter(|r| !r.is_empty())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates an amount in cents that cannot be negative (prices, charges).
///
/// ```rust
/// use stockpile_core::validation::validate_non_negative_cents;
///
/// assert!(validate_non_negative_cents("price", 0).is_ok());
/// assert!(validate_non_negative_cents("price", -1).is_err());
/// ```
pub fn validate_non_negative_cents(field: &str, cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }
    Ok(())
}

/// Validates a signed quantity or stock level: any finite number.
pub fn validate_finite(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite {
            field: field.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Record Validators
// =============================================================================

/// Validates the line items of an adjustment or transfer.
///
/// ## Rules
/// - At least one line, at most `MAX_LINE_ITEMS`
/// - Every line names a product
/// - Unit prices are not negative
///
/// Quantity finiteness is checked again inside the store transaction, where
/// it aborts the whole operation.
pub fn validate_line_items(items: &[StockLineItem]) -> ValidationResult<()> {
    if items.is_empty() {
        return Err(ValidationError::Required {
            field: "items".to_string(),
        });
    }

    if items.len() > MAX_LINE_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "items".to_string(),
            min: 1,
            max: MAX_LINE_ITEMS as i64,
        });
    }

    for item in items {
        require("productId", &item.product_id)?;
        validate_non_negative_cents("unitPriceCents", item.unit_price_cents)?;
    }

    Ok(())
}

/// Validates a new product before insert.
pub fn validate_new_product(product: &NewProduct) -> ValidationResult<()> {
    validate_product_name(&product.name)?;
    validate_finite("stock", product.stock)?;
    validate_non_negative_cents("purchasePriceCents", product.purchase_price_cents)?;
    validate_non_negative_cents("sellingPriceCents", product.selling_price_cents)?;
    Ok(())
}

/// Validates an adjustment request (everything except product existence).
pub fn validate_new_adjustment(input: &NewStockAdjustment) -> ValidationResult<()> {
    validate_location("location", &input.location)?;
    require("authorId", &input.author_id)?;
    if let Some(reference_no) = supplied_reference_no(input.reference_no.as_deref()) {
        validate_reference_no(reference_no)?;
    }
    if let Some(recovered) = input.recovered_amount_cents {
        validate_non_negative_cents("recoveredAmountCents", recovered)?;
    }
    validate_line_items(&input.items)
}

/// Validates a transfer request (everything except product existence).
pub fn validate_new_transfer(input: &NewStockTransfer) -> ValidationResult<()> {
    validate_location("fromLocation", &input.from_location)?;
    validate_location("toLocation", &input.to_location)?;
    require("authorId", &input.author_id)?;
    if let Some(reference_no) = supplied_reference_no(input.reference_no.as_deref()) {
        validate_reference_no(reference_no)?;
    }
    validate_non_negative_cents("shippingChargeCents", input.shipping_charge_cents)?;
    validate_line_items(&input.items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AdjustmentType, TransferStatus};
    use chrono::Utc;

    fn line(product_id: &str, quantity: f64) -> StockLineItem {
        StockLineItem {
            product_id: product_id.to_string(),
            quantity,
            unit_price_cents: 100,
        }
    }

    fn adjustment(items: Vec<StockLineItem>) -> NewStockAdjustment {
        NewStockAdjustment {
            date: Utc::now(),
            location: "Main Store".to_string(),
            adjustment_type: AdjustmentType::Normal,
            items,
            reference_no: None,
            recovered_amount_cents: None,
            reason: None,
            notes: None,
            author_id: "user-1".to_string(),
        }
    }

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Coca-Cola 330ml").is_ok());
        assert!(validate_product_name("   ").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_reference_no() {
        assert!(validate_reference_no("ADJ-1767225600000").is_ok());
        assert!(validate_reference_no("INV/2026/001").is_ok());
        assert!(validate_reference_no("").is_err());
        assert!(validate_reference_no("has space").is_err());
        assert!(validate_reference_no(&"R".repeat(51)).is_err());
    }

    #[test]
    fn test_blank_reference_no_counts_as_absent() {
        assert_eq!(supplied_reference_no(None), None);
        assert_eq!(supplied_reference_no(Some("  ")), None);
        assert_eq!(supplied_reference_no(Some(" ADJ-1 ")), Some("ADJ-1"));

        let mut blank = adjustment(vec![line("P1", 1.0)]);
        blank.reference_no = Some(String::new());
        assert!(validate_new_adjustment(&blank).is_ok());
    }

    #[test]
    fn test_validate_line_items() {
        assert!(validate_line_items(&[line("P1", -5.0)]).is_ok());
        assert!(validate_line_items(&[]).is_err());
        assert!(validate_line_items(&[line("", 1.0)]).is_err());

        let mut negative_price = line("P1", 1.0);
        negative_price.unit_price_cents = -1;
        assert!(validate_line_items(&[negative_price]).is_err());
    }

    #[test]
    fn test_validate_new_adjustment() {
        assert!(validate_new_adjustment(&adjustment(vec![line("P1", 3.0)])).is_ok());

        let mut missing_location = adjustment(vec![line("P1", 3.0)]);
        missing_location.location = String::new();
        assert!(matches!(
            validate_new_adjustment(&missing_location),
            Err(ValidationError::Required { field }) if field == "location"
        ));

        let mut negative_recovery = adjustment(vec![line("P1", 3.0)]);
        negative_recovery.recovered_amount_cents = Some(-10);
        assert!(validate_new_adjustment(&negative_recovery).is_err());
    }

    #[test]
    fn test_validate_new_transfer() {
        let transfer = NewStockTransfer {
            business_id: None,
            date: Utc::now(),
            from_location: "Warehouse".to_string(),
            to_location: "Main Store".to_string(),
            status: TransferStatus::Pending,
            items: vec![line("P1", 10.0)],
            shipping_charge_cents: 0,
            reference_no: None,
            notes: None,
            author_id: "user-1".to_string(),
        };
        assert!(validate_new_transfer(&transfer).is_ok());

        let negative_shipping = NewStockTransfer {
            shipping_charge_cents: -500,
            ..transfer.clone()
        };
        assert!(validate_new_transfer(&negative_shipping).is_err());

        let no_destination = NewStockTransfer {
            to_location: " ".to_string(),
            ..transfer
        };
        assert!(validate_new_transfer(&no_destination).is_err());
    }

    #[test]
    fn test_validate_new_product() {
        let product = NewProduct {
            business_id: None,
            name: "Cola".to_string(),
            category: None,
            stock: f64::NAN,
            purchase_price_cents: 100,
            selling_price_cents: 150,
        };
        assert!(matches!(
            validate_new_product(&product),
            Err(ValidationError::NotFinite { .. })
        ));
    }
}
