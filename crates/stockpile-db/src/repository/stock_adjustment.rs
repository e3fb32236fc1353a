//! # Stock Adjustment Service
//!
//! Records stock corrections (damage, loss, recount) and moves product stock
//! by the same amount, atomically.
//!
//! ## Adding an Adjustment
//! ```text
//! NewStockAdjustment { items: [{P1, -5, 10.00}, {P2, +2, 3.00}] }
//!      │
//!      ├── validate input                     ValidationError → Rejected
//!      ├── aggregate deltas per product       {P1: -5, P2: +2}
//!      ├── total = Σ |qty| × unit price       56.00
//!      │
//!      ▼  one optimistic transaction
//!   read P1, P2                               missing → ProductNotFound
//!   P1.stock -= 5, P1.totalAdjusted -= 5
//!   P2.stock += 2, P2.totalAdjusted += 2
//!   insert stockAdjustments/<uuid>
//!   commit                                    changed meanwhile → Conflict
//! ```
//!
//! Deleting an adjustment removes the record only. Product stock keeps the
//! adjusted value.

use std::time::Instant;

use chrono::{SubsecRound, Utc};
use stockpile_core::inventory::{
    aggregate_deltas, generate_reference_no, line_items_total, ADJUSTMENT_REF_PREFIX,
};
use stockpile_core::validation::{supplied_reference_no, validate_new_adjustment};
use stockpile_core::{CoreError, NewStockAdjustment, StockAdjustment};
use tracing::{debug, info};

use super::{
    decode_all, line_items_value, list_scoped, stage_product_deltas, BUSINESS_ID,
    STOCK_ADJUSTMENTS,
};
use crate::collection::{generate_document_id, Collection};
use crate::error::{DbError, DbResult};
use crate::pool::Database;
use crate::value::{Fields, Value};

/// Product counters moved by an adjustment.
const ADJUSTED_COUNTERS: &[&str] = &["stock", "totalAdjusted"];

/// Stock adjustment service.
#[derive(Debug, Clone)]
pub struct StockAdjustmentRepository {
    db: Database,
}

impl StockAdjustmentRepository {
    pub fn new(db: Database) -> Self {
        StockAdjustmentRepository { db }
    }

    fn collection(&self) -> Collection {
        self.db.collection(STOCK_ADJUSTMENTS)
    }

    /// Records an adjustment and applies it to every referenced product.
    ///
    /// ## Errors
    /// - `DbError::Rejected(CoreError::Validation(..))` for bad input
    /// - `DbError::Rejected(CoreError::InvalidQuantity { .. })` for a NaN or
    ///   infinite quantity
    /// - `DbError::Rejected(CoreError::ProductNotFound(..))` for an unknown
    ///   product
    /// - `DbError::Conflict` if a product changed before commit
    ///
    /// On any error nothing is written.
    pub async fn add(
        &self,
        input: &NewStockAdjustment,
        business_id: Option<&str>,
    ) -> DbResult<StockAdjustment> {
        let started = Instant::now();

        validate_new_adjustment(input).map_err(CoreError::from)?;
        let deltas = aggregate_deltas(&input.items)?;
        let total = line_items_total(&input.items)?;

        let now = Utc::now().trunc_subsecs(3);
        let reference_no = supplied_reference_no(input.reference_no.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| generate_reference_no(ADJUSTMENT_REF_PREFIX, now));

        let record = StockAdjustment {
            id: generate_document_id(),
            business_id: business_id.map(str::to_string),
            reference_no,
            date: input.date.trunc_subsecs(3),
            location: input.location.trim().to_string(),
            adjustment_type: input.adjustment_type,
            items: input.items.clone(),
            total_amount_cents: total.cents(),
            recovered_amount_cents: input.recovered_amount_cents,
            reason: input.reason.clone(),
            notes: input.notes.clone(),
            author_id: input.author_id.clone(),
            created_at: now,
        };

        debug!(
            id = %record.id,
            reference_no = %record.reference_no,
            products = deltas.len(),
            "Adding stock adjustment"
        );

        let mut tx = self.db.transaction();
        stage_product_deltas(&mut tx, &deltas, ADJUSTED_COUNTERS, now).await?;
        tx.insert(STOCK_ADJUSTMENTS, &record.id, adjustment_fields(&record));
        tx.commit().await?;

        info!(
            id = %record.id,
            reference_no = %record.reference_no,
            total = %total,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Stock adjustment recorded"
        );

        Ok(record)
    }

    /// Lists adjustments, newest first, optionally for one business.
    pub async fn list(&self, business_id: Option<&str>) -> DbResult<Vec<StockAdjustment>> {
        let documents = list_scoped(&self.collection(), business_id).await?;
        debug!(count = documents.len(), "Listed stock adjustments");
        decode_all(&documents)
    }

    /// Gets one adjustment.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<StockAdjustment>> {
        match self.collection().get(id).await? {
            Some(document) => Ok(Some(document.decode()?)),
            None => Ok(None),
        }
    }

    /// Deletes the adjustment record. Product stock is not restored.
    ///
    /// ## Errors
    /// `DbError::NotFound` if no such adjustment exists.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        self.collection().delete(id).await.map_err(|e| match e {
            DbError::NotFound { id, .. } => DbError::not_found("Stock adjustment", id),
            other => other,
        })?;
        info!(id = %id, "Stock adjustment deleted");
        Ok(())
    }
}

fn adjustment_fields(record: &StockAdjustment) -> Fields {
    let mut fields = Fields::new();
    fields.insert(BUSINESS_ID.into(), Value::from(record.business_id.clone()));
    fields.insert("referenceNo".into(), Value::from(record.reference_no.as_str()));
    fields.insert("date".into(), Value::Timestamp(record.date));
    fields.insert("location".into(), Value::from(record.location.as_str()));
    fields.insert(
        "adjustmentType".into(),
        Value::from(record.adjustment_type.as_str()),
    );
    fields.insert("items".into(), line_items_value(&record.items));
    fields.insert("totalAmountCents".into(), Value::Integer(record.total_amount_cents));
    fields.insert(
        "recoveredAmountCents".into(),
        Value::from(record.recovered_amount_cents),
    );
    fields.insert("reason".into(), Value::from(record.reason.clone()));
    fields.insert("notes".into(), Value::from(record.notes.clone()));
    fields.insert("authorId".into(), Value::from(record.author_id.as_str()));
    fields.insert("createdAt".into(), Value::Timestamp(record.created_at));
    fields
}
