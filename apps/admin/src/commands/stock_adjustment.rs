//! # Stock Adjustment Commands
//!
//! ```text
//! UI form "Add adjustment"
//!      │
//!      ▼
//! add_stock_adjustment(ctx, input, business_id?)
//!      │  business_id defaults to the active business
//!      ▼
//! db.stock_adjustments().add(..)   one transaction: record + product stock
//!      │
//!      ├── Ok(StockAdjustment)     UI navigates to the list
//!      └── Err(ApiError)           VALIDATION_ERROR / NOT_FOUND / CONFLICT
//! ```

use std::time::Instant;

use stockpile_core::{NewStockAdjustment, StockAdjustment};
use tracing::{debug, info};

use super::elapsed_ms;
use crate::error::{ApiError, ApiResult};
use crate::state::AppContext;

/// Records an adjustment and applies it to product stock.
pub async fn add_stock_adjustment(
    ctx: &AppContext,
    input: NewStockAdjustment,
    business_id: Option<String>,
) -> ApiResult<StockAdjustment> {
    let start = Instant::now();
    let business_id = ctx.business_scope(business_id).await;

    debug!(
        items = input.items.len(),
        location = %input.location,
        business_id = ?business_id,
        "add_stock_adjustment command"
    );

    let adjustment = ctx
        .db()
        .stock_adjustments()
        .add(&input, business_id.as_deref())
        .await?;

    info!(
        id = %adjustment.id,
        reference_no = %adjustment.reference_no,
        total = %ctx.settings().format_amount(adjustment.total_amount_cents).await,
        elapsed_ms = elapsed_ms(start),
        "add_stock_adjustment complete"
    );
    Ok(adjustment)
}

/// Lists adjustments of the given or active business, newest first.
pub async fn get_stock_adjustments(
    ctx: &AppContext,
    business_id: Option<String>,
) -> ApiResult<Vec<StockAdjustment>> {
    let start = Instant::now();
    let business_id = ctx.business_scope(business_id).await;

    let adjustments = ctx
        .db()
        .stock_adjustments()
        .list(business_id.as_deref())
        .await?;

    info!(
        count = adjustments.len(),
        elapsed_ms = elapsed_ms(start),
        "get_stock_adjustments complete"
    );
    Ok(adjustments)
}

/// Gets one adjustment or `NOT_FOUND`.
pub async fn get_stock_adjustment(ctx: &AppContext, id: String) -> ApiResult<StockAdjustment> {
    debug!(id = %id, "get_stock_adjustment command");
    ctx.db()
        .stock_adjustments()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Stock adjustment", &id))
}

/// Deletes an adjustment record. Product stock keeps its adjusted value.
pub async fn delete_stock_adjustment(ctx: &AppContext, id: String) -> ApiResult<()> {
    debug!(id = %id, "delete_stock_adjustment command");
    ctx.db().stock_adjustments().delete(&id).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::state::test_support::{context, product};
    use chrono::Utc;
    use stockpile_core::{AdjustmentType, StockLineItem};

    fn input(product_id: &str, quantity: f64) -> NewStockAdjustment {
        NewStockAdjustment {
            date: Utc::now(),
            location: "Main Store".to_string(),
            adjustment_type: AdjustmentType::Normal,
            items: vec![StockLineItem {
                product_id: product_id.to_string(),
                quantity,
                unit_price_cents: 1000,
            }],
            reference_no: None,
            recovered_amount_cents: None,
            reason: Some("Recount".to_string()),
            notes: None,
            author_id: "user-1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_add_list_get_delete() {
        let ctx = context().await;
        let cola = product(&ctx, "Cola", 100.0).await;

        let added = add_stock_adjustment(&ctx, input(&cola.id, -5.0), None)
            .await
            .unwrap();
        assert_eq!(added.business_id.as_deref(), Some("biz-1"));
        assert_eq!(added.total_amount_cents, 5000);

        let listed = get_stock_adjustments(&ctx, None).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(get_stock_adjustment(&ctx, added.id.clone()).await.unwrap(), added);

        delete_stock_adjustment(&ctx, added.id.clone()).await.unwrap();
        assert!(get_stock_adjustments(&ctx, None).await.unwrap().is_empty());

        let cola = ctx.db().products().get_by_id(&cola.id).await.unwrap().unwrap();
        assert_eq!(cola.stock, 95.0);
    }

    #[tokio::test]
    async fn test_unknown_product_is_not_found() {
        let ctx = context().await;
        let err = add_stock_adjustment(&ctx, input("GHOST", 1.0), None)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_oversized_total_is_validation_error() {
        let ctx = context().await;
        let cola = product(&ctx, "Cola", 10.0).await;

        let mut oversized = input(&cola.id, 1.0);
        oversized.items[0].unit_price_cents = i64::MAX;
        oversized.items.push(oversized.items[0].clone());

        let err = add_stock_adjustment(&ctx, oversized, None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_other_business_is_not_listed() {
        let ctx = context().await;
        let cola = product(&ctx, "Cola", 10.0).await;

        add_stock_adjustment(&ctx, input(&cola.id, 1.0), Some("biz-2".to_string()))
            .await
            .unwrap();

        assert!(get_stock_adjustments(&ctx, None).await.unwrap().is_empty());
        assert_eq!(
            get_stock_adjustments(&ctx, Some("biz-2".to_string()))
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn test_missing_adjustment() {
        let ctx = context().await;
        let err = get_stock_adjustment(&ctx, "nope".to_string()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = delete_stock_adjustment(&ctx, "nope".to_string())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
