//! # Stock Transfer Commands
//!
//! Same shape as the adjustment commands. The business scope travels inside
//! the transfer input; when it is absent the active business is filled in.

use std::time::Instant;

use stockpile_core::{NewStockTransfer, StockTransfer};
use tracing::{debug, info};

use super::elapsed_ms;
use crate::error::{ApiError, ApiResult};
use crate::state::AppContext;

/// Records a transfer and bumps the transferred counters.
pub async fn add_stock_transfer(
    ctx: &AppContext,
    mut input: NewStockTransfer,
) -> ApiResult<StockTransfer> {
    let start = Instant::now();
    input.business_id = ctx.business_scope(input.business_id.take()).await;

    debug!(
        items = input.items.len(),
        from = %input.from_location,
        to = %input.to_location,
        "add_stock_transfer command"
    );

    let transfer = ctx.db().stock_transfers().add(&input).await?;

    info!(
        id = %transfer.id,
        reference_no = %transfer.reference_no,
        total = %ctx.settings().format_amount(transfer.total_amount_cents).await,
        elapsed_ms = elapsed_ms(start),
        "add_stock_transfer complete"
    );
    Ok(transfer)
}

/// Lists transfers of the given or active business, newest first.
pub async fn get_stock_transfers(
    ctx: &AppContext,
    business_id: Option<String>,
) -> ApiResult<Vec<StockTransfer>> {
    let start = Instant::now();
    let business_id = ctx.business_scope(business_id).await;

    let transfers = ctx
        .db()
        .stock_transfers()
        .list(business_id.as_deref())
        .await?;

    info!(
        count = transfers.len(),
        elapsed_ms = elapsed_ms(start),
        "get_stock_transfers complete"
    );
    Ok(transfers)
}

/// Gets one transfer or `NOT_FOUND`.
pub async fn get_stock_transfer(ctx: &AppContext, id: String) -> ApiResult<StockTransfer> {
    debug!(id = %id, "get_stock_transfer command");
    ctx.db()
        .stock_transfers()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Stock transfer", &id))
}

/// Deletes a transfer record. Counters are not reversed.
pub async fn delete_stock_transfer(ctx: &AppContext, id: String) -> ApiResult<()> {
    debug!(id = %id, "delete_stock_transfer command");
    ctx.db().stock_transfers().delete(&id).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::state::test_support::{context, product};
    use chrono::Utc;
    use stockpile_core::{StockLineItem, TransferStatus};

    fn input(product_id: &str, quantity: f64) -> NewStockTransfer {
        NewStockTransfer {
            business_id: None,
            date: Utc::now(),
            from_location: "Warehouse".to_string(),
            to_location: "Main Store".to_string(),
            status: TransferStatus::Pending,
            items: vec![StockLineItem {
                product_id: product_id.to_string(),
                quantity,
                unit_price_cents: 250,
            }],
            shipping_charge_cents: 500,
            reference_no: None,
            notes: None,
            author_id: "user-1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_add_uses_active_business() {
        let ctx = context().await;
        let cola = product(&ctx, "Cola", 50.0).await;

        let transfer = add_stock_transfer(&ctx, input(&cola.id, 4.0)).await.unwrap();
        assert_eq!(transfer.business_id.as_deref(), Some("biz-1"));
        assert_eq!(transfer.total_amount_cents, 1500);

        let listed = get_stock_transfers(&ctx, None).await.unwrap();
        assert_eq!(listed, vec![transfer.clone()]);

        let cola = ctx.db().products().get_by_id(&cola.id).await.unwrap().unwrap();
        assert_eq!(cola.stock, 50.0);
        assert_eq!(cola.total_transferred, 4.0);

        delete_stock_transfer(&ctx, transfer.id.clone()).await.unwrap();
        let err = get_stock_transfer(&ctx, transfer.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_validation_error() {
        let ctx = context().await;
        let cola = product(&ctx, "Cola", 50.0).await;

        let mut bad = input(&cola.id, 1.0);
        bad.from_location = String::new();

        let err = add_stock_transfer(&ctx, bad).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(get_stock_transfers(&ctx, None).await.unwrap().is_empty());
    }
}
