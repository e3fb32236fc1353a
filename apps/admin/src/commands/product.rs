//! # Product Commands
//!
//! Catalog access for the admin UI. Products are needed before any stock can
//! be adjusted or transferred.

use std::time::Instant;

use stockpile_core::{NewProduct, Product};
use tracing::{debug, info};

use super::elapsed_ms;
use crate::error::{ApiError, ApiResult};
use crate::state::AppContext;

/// Creates a product. Without an explicit business it joins the active one.
pub async fn create_product(ctx: &AppContext, mut input: NewProduct) -> ApiResult<Product> {
    let start = Instant::now();
    input.business_id = ctx.business_scope(input.business_id.take()).await;

    debug!(name = %input.name, business_id = ?input.business_id, "create_product command");

    let product = ctx.db().products().insert(&input).await?;

    info!(
        id = %product.id,
        elapsed_ms = elapsed_ms(start),
        "create_product complete"
    );
    Ok(product)
}

/// Gets one product or `NOT_FOUND`.
pub async fn get_product_by_id(ctx: &AppContext, id: String) -> ApiResult<Product> {
    debug!(id = %id, "get_product_by_id command");
    ctx.db()
        .products()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", &id))
}

/// Lists products of the given or active business, newest first.
pub async fn list_products(
    ctx: &AppContext,
    business_id: Option<String>,
) -> ApiResult<Vec<Product>> {
    let start = Instant::now();
    let business_id = ctx.business_scope(business_id).await;

    let products = ctx.db().products().list(business_id.as_deref()).await?;

    info!(
        count = products.len(),
        business_id = ?business_id,
        elapsed_ms = elapsed_ms(start),
        "list_products complete"
    );
    Ok(products)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::state::test_support::context;

    fn new_product(name: &str, stock: f64) -> NewProduct {
        NewProduct {
            business_id: None,
            name: name.to_string(),
            category: Some("Drinks".to_string()),
            stock,
            purchase_price_cents: 600,
            selling_price_cents: 1000,
        }
    }

    #[tokio::test]
    async fn test_create_defaults_to_active_business() {
        let ctx = context().await;

        let product = create_product(&ctx, new_product("Cola", 12.0)).await.unwrap();
        assert_eq!(product.business_id.as_deref(), Some("biz-1"));

        let fetched = get_product_by_id(&ctx, product.id.clone()).await.unwrap();
        assert_eq!(fetched, product);
    }

    #[tokio::test]
    async fn test_list_is_scoped() {
        let ctx = context().await;
        create_product(&ctx, new_product("Cola", 1.0)).await.unwrap();

        let mut elsewhere = new_product("Water", 1.0);
        elsewhere.business_id = Some("biz-2".to_string());
        create_product(&ctx, elsewhere).await.unwrap();

        assert_eq!(list_products(&ctx, None).await.unwrap().len(), 1);
        assert_eq!(
            list_products(&ctx, Some("biz-2".to_string())).await.unwrap()[0].name,
            "Water"
        );
    }

    #[tokio::test]
    async fn test_errors_are_mapped() {
        let ctx = context().await;

        let missing = get_product_by_id(&ctx, "nope".to_string()).await.unwrap_err();
        assert_eq!(missing.code, ErrorCode::NotFound);

        let invalid = create_product(&ctx, new_product("", 1.0)).await.unwrap_err();
        assert_eq!(invalid.code, ErrorCode::ValidationError);
    }
}
