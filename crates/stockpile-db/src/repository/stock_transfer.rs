//! # Stock Transfer Service
//!
//! Records stock moving between two locations of a business.
//!
//! Stock is tracked per product, not per location, so a transfer leaves
//! `stock` untouched and only moves the product's `totalTransferred`
//! counter. The transactional shape is the same as an adjustment's:
//!
//! ```text
//! validate ─► aggregate deltas ─► tx: read products ─► bump totalTransferred
//!                                     ─► insert stockTransfers/<uuid> ─► commit
//! ```
//!
//! The record total is the line value plus the shipping charge.

use std::time::Instant;

use chrono::{SubsecRound, Utc};
use stockpile_core::inventory::{
    aggregate_deltas, generate_reference_no, transfer_total, TRANSFER_REF_PREFIX,
};
use stockpile_core::validation::{supplied_reference_no, validate_new_transfer};
use stockpile_core::{CoreError, Money, NewStockTransfer, StockTransfer};
use tracing::{debug, info};

use super::{
    decode_all, line_items_value, list_scoped, stage_product_deltas, BUSINESS_ID,
    STOCK_TRANSFERS,
};
use crate::collection::{generate_document_id, Collection};
use crate::error::{DbError, DbResult};
use crate::pool::Database;
use crate::value::{Fields, Value};

const TRANSFERRED_COUNTERS: &[&str] = &["totalTransferred"];

/// Stock transfer service.
#[derive(Debug, Clone)]
pub struct StockTransferRepository {
    db: Database,
}

impl StockTransferRepository {
    pub fn new(db: Database) -> Self {
        StockTransferRepository { db }
    }

    fn collection(&self) -> Collection {
        self.db.collection(STOCK_TRANSFERS)
    }

    /// Records a transfer and bumps `totalTransferred` on every referenced
    /// product.
    ///
    /// ## Errors
    /// Same as [`StockAdjustmentRepository::add`](super::stock_adjustment::StockAdjustmentRepository::add).
    /// On any error nothing is written.
    pub async fn add(&self, input: &NewStockTransfer) -> DbResult<StockTransfer> {
        let started = Instant::now();

        validate_new_transfer(input).map_err(CoreError::from)?;
        let deltas = aggregate_deltas(&input.items)?;
        let shipping = Money::from_cents(input.shipping_charge_cents);
        let total = transfer_total(&input.items, shipping)?;

        let now = Utc::now().trunc_subsecs(3);
        let reference_no = supplied_reference_no(input.reference_no.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| generate_reference_no(TRANSFER_REF_PREFIX, now));

        let record = StockTransfer {
            id: generate_document_id(),
            business_id: input.business_id.clone(),
            reference_no,
            date: input.date.trunc_subsecs(3),
            from_location: input.from_location.trim().to_string(),
            to_location: input.to_location.trim().to_string(),
            status: input.status,
            items: input.items.clone(),
            shipping_charge_cents: input.shipping_charge_cents,
            total_amount_cents: total.cents(),
            notes: input.notes.clone(),
            author_id: input.author_id.clone(),
            created_at: now,
        };

        debug!(
            id = %record.id,
            from = %record.from_location,
            to = %record.to_location,
            products = deltas.len(),
            "Adding stock transfer"
        );

        let mut tx = self.db.transaction();
        stage_product_deltas(&mut tx, &deltas, TRANSFERRED_COUNTERS, now).await?;
        tx.insert(STOCK_TRANSFERS, &record.id, transfer_fields(&record));
        tx.commit().await?;

        info!(
            id = %record.id,
            reference_no = %record.reference_no,
            total = %total,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Stock transfer recorded"
        );

        Ok(record)
    }

    /// Lists transfers, newest first, optionally for one business.
    pub async fn list(&self, business_id: Option<&str>) -> DbResult<Vec<StockTransfer>> {
        let documents = list_scoped(&self.collection(), business_id).await?;
        debug!(count = documents.len(), "Listed stock transfers");
        decode_all(&documents)
    }

    /// Gets one transfer.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<StockTransfer>> {
        match self.collection().get(id).await? {
            Some(document) => Ok(Some(document.decode()?)),
            None => Ok(None),
        }
    }

    /// Deletes the transfer record. Product counters are not reversed.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        self.collection().delete(id).await.map_err(|e| match e {
            DbError::NotFound { id, .. } => DbError::not_found("Stock transfer", id),
            other => other,
        })?;
        info!(id = %id, "Stock transfer deleted");
        Ok(())
    }
}

fn transfer_fields(record: &StockTransfer) -> Fields {
    let mut fields = Fields::new();
    fields.insert(BUSINESS_ID.into(), Value::from(record.business_id.clone()));
    fields.insert("referenceNo".into(), Value::from(record.reference_no.as_str()));
    fields.insert("date".into(), Value::Timestamp(record.date));
    fields.insert("fromLocation".into(), Value::from(record.from_location.as_str()));
    fields.insert("toLocation".into(), Value::from(record.to_location.as_str()));
    fields.insert("status".into(), Value::from(record.status.as_str()));
    fields.insert("items".into(), line_items_value(&record.items));
    fields.insert(
        "shippingChargeCents".into(),
        Value::Integer(record.shipping_charge_cents),
    );
    fields.insert("totalAmountCents".into(), Value::Integer(record.total_amount_cents));
    fields.insert("notes".into(), Value::from(record.notes.clone()));
    fields.insert("authorId".into(), Value::from(record.author_id.as_str()));
    fields.insert("createdAt".into(), Value::Timestamp(record.created_at));
    fields
}
