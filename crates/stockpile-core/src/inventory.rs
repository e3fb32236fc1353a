//! # Inventory Math
//!
//! Pure calculations behind stock adjustments and transfers. The store layer
//! runs these inside its transactions; nothing here touches I/O.
//!
//! ## Flow
//! ```text
//! items ──► line_items_total()  ──► total_amount_cents on the record
//!   │
//!   └────► aggregate_deltas()   ──► one delta per product
//!                │
//!                ▼
//!          apply_delta(current, delta) ──► new stock / counter values
//! ```

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::StockLineItem;

/// Reference number prefix for stock adjustments.
pub const ADJUSTMENT_REF_PREFIX: &str = "ADJ";

/// Reference number prefix for stock transfers.
pub const TRANSFER_REF_PREFIX: &str = "TRF";

/// Sums `|quantity| × unit price` over all lines.
///
/// Direction never changes the money value: removing five units and adding
/// five units of the same product cost the same.
///
/// ```rust
/// use stockpile_core::inventory::line_items_total;
/// use stockpile_core::StockLineItem;
///
/// let items = vec![StockLineItem {
///     product_id: "P1".into(),
///     quantity: -5.0,
///     unit_price_cents: 1000,
/// }];
/// assert_eq!(line_items_total(&items).unwrap().cents(), 5000);
/// ```
///
/// ## Errors
/// `CoreError::AmountOverflow` if a line or the sum leaves the `i64` range.
pub fn line_items_total(items: &[StockLineItem]) -> CoreResult<Money> {
    items.iter().try_fold(Money::zero(), |total, item| {
        item.line_amount()
            .and_then(|amount| total.checked_add(amount))
            .ok_or(CoreError::AmountOverflow)
    })
}

/// Transfer total: line value plus the shipping charge.
pub fn transfer_total(items: &[StockLineItem], shipping_charge: Money) -> CoreResult<Money> {
    line_items_total(items)?
        .checked_add(shipping_charge)
        .ok_or(CoreError::AmountOverflow)
}

/// Collapses line items into one signed delta per product.
///
/// Two lines for the same product accumulate, so a single read-modify-write
/// per product sees the full change.
///
/// ## Errors
/// `CoreError::InvalidQuantity` if any quantity is NaN or infinite.
pub fn aggregate_deltas(items: &[StockLineItem]) -> CoreResult<BTreeMap<String, f64>> {
    let mut deltas: BTreeMap<String, f64> = BTreeMap::new();

    for item in items {
        if !item.quantity.is_finite() {
            return Err(CoreError::InvalidQuantity {
                product_id: item.product_id.clone(),
            });
        }
        *deltas.entry(item.product_id.clone()).or_insert(0.0) += item.quantity;
    }

    Ok(deltas)
}

/// Applies a delta to a stock level or counter.
///
/// No floor is enforced; stock may go negative. The result must stay finite.
pub fn apply_delta(product_id: &str, current: f64, delta: f64) -> CoreResult<f64> {
    if !delta.is_finite() {
        return Err(CoreError::InvalidQuantity {
            product_id: product_id.to_string(),
        });
    }

    let next = current + delta;
    if !next.is_finite() {
        return Err(CoreError::StockOverflow {
            product_id: product_id.to_string(),
        });
    }

    Ok(next)
}

/// Generates a reference number from a timestamp: `PREFIX-<unix millis>`.
///
/// ## Example
/// `ADJ-1767225600000`
pub fn generate_reference_no(prefix: &str, now: DateTime<Utc>) -> String {
    format!("{}-{}", prefix, now.timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn item(product_id: &str, quantity: f64, unit_price_cents: i64) -> StockLineItem {
        StockLineItem {
            product_id: product_id.to_string(),
            quantity,
            unit_price_cents,
        }
    }

    #[test]
    fn test_total_is_independent_of_sign() {
        let decrease = vec![item("P1", -5.0, 1000), item("P2", -2.0, 250)];
        let increase = vec![item("P1", 5.0, 1000), item("P2", 2.0, 250)];

        assert_eq!(
            line_items_total(&decrease).unwrap(),
            line_items_total(&increase).unwrap()
        );
        assert_eq!(line_items_total(&decrease).unwrap().cents(), 5500);
    }

    #[test]
    fn test_transfer_total_includes_shipping() {
        let items = vec![item("P1", 3.0, 199)];
        let total = transfer_total(&items, Money::from_cents(500)).unwrap();
        assert_eq!(total.cents(), 597 + 500);
    }

    #[test]
    fn test_empty_items_total_zero() {
        assert!(line_items_total(&[]).unwrap().is_zero());
    }

    #[test]
    fn test_totals_reject_amounts_beyond_i64() {
        let two_max = vec![item("P1", 1.0, i64::MAX), item("P1", 1.0, i64::MAX)];
        assert!(matches!(line_items_total(&two_max), Err(CoreError::AmountOverflow)));

        let huge_quantity = vec![item("P1", 1e300, 100)];
        assert!(matches!(line_items_total(&huge_quantity), Err(CoreError::AmountOverflow)));

        let items = vec![item("P1", 1.0, i64::MAX - 10)];
        assert!(matches!(
            transfer_total(&items, Money::from_cents(500)),
            Err(CoreError::AmountOverflow)
        ));
    }

    #[test]
    fn test_aggregate_deltas_merges_duplicate_products() {
        let items = vec![item("P1", 4.0, 100), item("P2", 1.0, 100), item("P1", -1.5, 100)];
        let deltas = aggregate_deltas(&items).unwrap();

        assert_eq!(deltas.len(), 2);
        assert_eq!(deltas["P1"], 2.5);
        assert_eq!(deltas["P2"], 1.0);
    }

    #[test]
    fn test_aggregate_deltas_rejects_non_finite() {
        let items = vec![item("P1", 1.0, 100), item("P9", f64::NAN, 100)];
        let err = aggregate_deltas(&items).unwrap_err();
        assert!(matches!(err, CoreError::InvalidQuantity { product_id } if product_id == "P9"));

        let items = vec![item("P1", f64::INFINITY, 100)];
        assert!(aggregate_deltas(&items).is_err());
    }

    #[test]
    fn test_apply_delta_allows_negative_stock() {
        assert_eq!(apply_delta("P1", 100.0, -5.0).unwrap(), 95.0);
        assert_eq!(apply_delta("P1", 2.0, -5.0).unwrap(), -3.0);
    }

    #[test]
    fn test_apply_delta_rejects_overflow() {
        let err = apply_delta("P1", f64::MAX, f64::MAX).unwrap_err();
        assert!(matches!(err, CoreError::StockOverflow { .. }));
    }

    #[test]
    fn test_reference_number_format() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(
            generate_reference_no(ADJUSTMENT_REF_PREFIX, now),
            "ADJ-1767225600000"
        );
    }
}
