//! # Repository Module
//!
//! Typed access to the collections the admin app works with.
//!
//! ```text
//! db.products()            ─► ProductRepository          "products"
//! db.stock_adjustments()   ─► StockAdjustmentRepository  "stockAdjustments"
//! db.stock_transfers()     ─► StockTransferRepository    "stockTransfers"
//! ```
//!
//! Reads decode documents through the sanitizer into `stockpile_core` types.
//! Writes map each field explicitly so dates are stored as timestamps, never
//! as strings.
//!
//! The two stock services share one transactional shape, implemented by
//! [`stage_product_deltas`]:
//!
//! ```text
//! tx.get(product) for every distinct product   (missing → ProductNotFound)
//! compute counter + Σ delta per product
//! tx.update(product, patch) for every product
//! tx.insert(record)
//! tx.commit()                                  (changed → Conflict)
//! ```

pub mod product;
pub mod stock_adjustment;
pub mod stock_transfer;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use stockpile_core::inventory::apply_delta;
use stockpile_core::{CoreError, StockLineItem};
use tracing::debug;

use crate::collection::Collection;
use crate::document::Document;
use crate::error::DbResult;
use crate::transaction::Transaction;
use crate::value::{Fields, Value};

/// Collection holding products.
pub const PRODUCTS: &str = "products";
/// Collection holding stock adjustment records.
pub const STOCK_ADJUSTMENTS: &str = "stockAdjustments";
/// Collection holding stock transfer records.
pub const STOCK_TRANSFERS: &str = "stockTransfers";

/// Field on every business-scoped document.
pub(crate) const BUSINESS_ID: &str = "businessId";

/// Lists a collection, filtered by business when one is given. Newest first.
pub(crate) async fn list_scoped(
    collection: &Collection,
    business_id: Option<&str>,
) -> DbResult<Vec<Document>> {
    match business_id {
        Some(business_id) => collection.find_eq(BUSINESS_ID, business_id).await,
        None => collection.get_all().await,
    }
}

/// Decodes every document into `T`, failing on the first bad one.
pub(crate) fn decode_all<T: DeserializeOwned>(documents: &[Document]) -> DbResult<Vec<T>> {
    documents.iter().map(Document::decode).collect()
}

/// Stored form of a list of line items.
pub(crate) fn line_items_value(items: &[StockLineItem]) -> Value {
    Value::Array(
        items
            .iter()
            .map(|item| {
                let mut line = Fields::new();
                line.insert("productId".into(), Value::from(item.product_id.as_str()));
                line.insert("quantity".into(), Value::Double(item.quantity));
                line.insert("unitPriceCents".into(), Value::Integer(item.unit_price_cents));
                Value::Map(line)
            })
            .collect(),
    )
}

/// Reads every product named in `deltas` and buffers one update per product
/// adding its delta to each of `counters`.
///
/// Must run before any other write is buffered on `tx`.
///
/// ## Errors
/// - `DbError::Rejected(CoreError::ProductNotFound)` for an unknown product
/// - `DbError::Rejected(CoreError::StockOverflow)` if a counter would stop
///   being finite
pub(crate) async fn stage_product_deltas(
    tx: &mut Transaction,
    deltas: &BTreeMap<String, f64>,
    counters: &[&str],
    now: DateTime<Utc>,
) -> DbResult<()> {
    let mut patches = Vec::with_capacity(deltas.len());

    for (product_id, delta) in deltas {
        let product = tx
            .get(PRODUCTS, product_id)
            .await?
            .ok_or_else(|| CoreError::ProductNotFound(product_id.clone()))?;

        let mut patch = Fields::new();
        for counter in counters {
            let current = product.number_or_zero(counter)?;
            let next = apply_delta(product_id, current, *delta)?;
            patch.insert(counter.to_string(), Value::Double(next));
        }
        patch.insert("updatedAt".into(), Value::Timestamp(now));

        debug!(product_id = %product_id, delta = %delta, "Staged product update");
        patches.push((product_id.as_str(), patch));
    }

    for (product_id, patch) in patches {
        tx.update(PRODUCTS, product_id, patch);
    }

    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Fixtures shared by the repository test suites.

    use stockpile_core::{NewProduct, Product, StockLineItem};

    use crate::pool::{Database, DbConfig};

    pub async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    pub async fn product(db: &Database, name: &str, stock: f64) -> Product {
        db.products()
            .insert(&NewProduct {
                business_id: Some("biz-1".to_string()),
                name: name.to_string(),
                category: None,
                stock,
                purchase_price_cents: 800,
                selling_price_cents: 1000,
            })
            .await
            .unwrap()
    }

    pub fn line(product_id: &str, quantity: f64, unit_price_cents: i64) -> StockLineItem {
        StockLineItem {
            product_id: product_id.to_string(),
            quantity,
            unit_price_cents,
        }
    }
}
