//! # Domain Types
//!
//! Core domain types shared by the store layer and the admin commands.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌──────────────────┐   ┌──────────────────┐     │
//! │  │    Product      │   │ StockAdjustment  │   │  StockTransfer   │     │
//! │  │  ─────────────  │   │  ──────────────  │   │  ──────────────  │     │
//! │  │  id             │◄──│  items[]         │   │  items[]         │──►  │
//! │  │  stock          │   │  adjustment_type │   │  from/to         │     │
//! │  │  total_adjusted │   │  total_amount    │   │  shipping_charge │     │
//! │  │  total_transf.  │   └──────────────────┘   └──────────────────┘     │
//! │  └─────────────────┘            │                      │               │
//! │                                 └──── StockLineItem ───┘               │
//! │                                       product_id, quantity, unit price │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! All records use camelCase field names; they are the JSON shapes the admin
//! UI already renders. Store timestamps arrive as ISO-8601 strings after
//! sanitization and deserialize straight into `DateTime<Utc>`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A catalog product whose stock is moved by adjustments and transfers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    /// Store-generated identifier.
    pub id: String,

    /// Business (tenant) this product belongs to.
    #[serde(default)]
    pub business_id: Option<String>,

    pub name: String,

    #[serde(default)]
    pub category: Option<String>,

    /// Current stock level. Signed; negative stock is allowed.
    #[serde(default)]
    pub stock: f64,

    /// Unit purchase price in cents.
    #[serde(default)]
    pub purchase_price_cents: i64,

    /// Selling price in cents.
    #[serde(default)]
    pub selling_price_cents: i64,

    /// Net units moved by stock adjustments over the product's lifetime.
    #[serde(default)]
    pub total_adjusted: f64,

    /// Net units moved by stock transfers over the product's lifetime.
    #[serde(default)]
    pub total_transferred: f64,

    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Returns the purchase price as Money.
    #[inline]
    pub fn purchase_price(&self) -> Money {
        Money::from_cents(self.purchase_price_cents)
    }

    /// Returns the selling price as Money.
    #[inline]
    pub fn selling_price(&self) -> Money {
        Money::from_cents(self.selling_price_cents)
    }
}

/// Input for creating a catalog product.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewProduct {
    #[serde(default)]
    pub business_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub stock: f64,
    #[serde(default)]
    pub purchase_price_cents: i64,
    #[serde(default)]
    pub selling_price_cents: i64,
}

// =============================================================================
// Line Items
// =============================================================================

/// One product line on an adjustment or transfer.
///
/// `quantity` is signed: a negative adjustment line decreases stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StockLineItem {
    pub product_id: String,
    pub quantity: f64,
    pub unit_price_cents: i64,
}

impl StockLineItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Value of this line, ignoring direction: `|quantity| × unit price`.
    /// `None` when the value does not fit in cents.
    pub fn line_amount(&self) -> Option<Money> {
        self.unit_price().checked_multiply_quantity(self.quantity.abs())
    }
}

// =============================================================================
// Stock Adjustment
// =============================================================================

/// Why stock was adjusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum AdjustmentType {
    /// Routine correction (recount, opening balance).
    #[default]
    Normal,
    /// Loss events: damage, theft, expiry.
    Abnormal,
}

impl AdjustmentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdjustmentType::Normal => "normal",
            AdjustmentType::Abnormal => "abnormal",
        }
    }
}

impl fmt::Display for AdjustmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input for `add_stock_adjustment`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewStockAdjustment {
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    pub location: String,
    #[serde(default)]
    pub adjustment_type: AdjustmentType,
    pub items: Vec<StockLineItem>,
    /// Generated from the current time when absent.
    #[serde(default)]
    pub reference_no: Option<String>,
    #[serde(default)]
    pub recovered_amount_cents: Option<i64>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub author_id: String,
}

/// A recorded stock adjustment. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StockAdjustment {
    pub id: String,
    #[serde(default)]
    pub business_id: Option<String>,
    pub reference_no: String,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    pub location: String,
    pub adjustment_type: AdjustmentType,
    pub items: Vec<StockLineItem>,
    pub total_amount_cents: i64,
    #[serde(default)]
    pub recovered_amount_cents: Option<i64>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub author_id: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl StockAdjustment {
    #[inline]
    pub fn total_amount(&self) -> Money {
        Money::from_cents(self.total_amount_cents)
    }
}

// =============================================================================
// Stock Transfer
// =============================================================================

/// Where a transfer is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum TransferStatus {
    #[default]
    Pending,
    Sent,
    Completed,
}

impl TransferStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferStatus::Pending => "pending",
            TransferStatus::Sent => "sent",
            TransferStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input for `add_stock_transfer`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewStockTransfer {
    #[serde(default)]
    pub business_id: Option<String>,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    pub from_location: String,
    pub to_location: String,
    #[serde(default)]
    pub status: TransferStatus,
    pub items: Vec<StockLineItem>,
    #[serde(default)]
    pub shipping_charge_cents: i64,
    #[serde(default)]
    pub reference_no: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub author_id: String,
}

/// A recorded stock transfer between two locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StockTransfer {
    pub id: String,
    #[serde(default)]
    pub business_id: Option<String>,
    pub reference_no: String,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    pub from_location: String,
    pub to_location: String,
    pub status: TransferStatus,
    pub items: Vec<StockLineItem>,
    pub shipping_charge_cents: i64,
    pub total_amount_cents: i64,
    #[serde(default)]
    pub notes: Option<String>,
    pub author_id: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl StockTransfer {
    #[inline]
    pub fn total_amount(&self) -> Money {
        Money::from_cents(self.total_amount_cents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_amount_ignores_direction() {
        let out = StockLineItem {
            product_id: "P1".to_string(),
            quantity: -5.0,
            unit_price_cents: 1000,
        };
        let back = StockLineItem {
            quantity: 5.0,
            ..out.clone()
        };
        assert_eq!(out.line_amount(), back.line_amount());
        assert_eq!(out.line_amount(), Some(Money::from_cents(5000)));
    }

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(
            serde_json::to_value(AdjustmentType::Abnormal).unwrap(),
            serde_json::json!("abnormal")
        );
        assert_eq!(
            serde_json::to_value(TransferStatus::Sent).unwrap(),
            serde_json::json!("sent")
        );
        assert_eq!(AdjustmentType::default(), AdjustmentType::Normal);
        assert_eq!(TransferStatus::default(), TransferStatus::Pending);
    }

    #[test]
    fn test_product_missing_counters_default_to_zero() {
        let product: Product = serde_json::from_value(serde_json::json!({
            "id": "P1",
            "name": "Cola 330ml",
            "stock": 12.0
        }))
        .unwrap();

        assert_eq!(product.total_adjusted, 0.0);
        assert_eq!(product.total_transferred, 0.0);
        assert_eq!(product.business_id, None);
        assert!(product.created_at.is_none());
    }

    #[test]
    fn test_adjustment_input_accepts_camel_case() {
        let input: NewStockAdjustment = serde_json::from_value(serde_json::json!({
            "date": "2026-03-01T10:00:00.000Z",
            "location": "Main Store",
            "adjustmentType": "abnormal",
            "items": [{ "productId": "P1", "quantity": -2, "unitPriceCents": 450 }],
            "authorId": "user-1"
        }))
        .unwrap();

        assert_eq!(input.adjustment_type, AdjustmentType::Abnormal);
        assert_eq!(input.items[0].quantity, -2.0);
        assert!(input.reference_no.is_none());
    }
}
