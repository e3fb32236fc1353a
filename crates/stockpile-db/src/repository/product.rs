//! # Product Repository
//!
//! Catalog products stored in the `products` collection.
//!
//! Stock and the `totalAdjusted` / `totalTransferred` counters are written
//! here only at insert time. Afterwards they move exclusively through the
//! stock services, inside transactions.

use chrono::{SubsecRound, Utc};
use stockpile_core::validation::{
    validate_new_product, validate_non_negative_cents, validate_product_name,
};
use stockpile_core::{CoreError, NewProduct, Product};
use tracing::{debug, info};

use super::{decode_all, list_scoped, BUSINESS_ID, PRODUCTS};
use crate::collection::{generate_document_id, Collection};
use crate::error::{DbError, DbResult};
use crate::pool::Database;
use crate::value::{Fields, Value};

/// Repository for products.
///
/// ## Usage
/// ```rust,ignore
/// let product = db.products().insert(&new_product).await?;
/// let same = db.products().get_by_id(&product.id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    db: Database,
}

impl ProductRepository {
    pub fn new(db: Database) -> Self {
        ProductRepository { db }
    }

    fn collection(&self) -> Collection {
        self.db.collection(PRODUCTS)
    }

    /// Inserts a new product with zeroed movement counters.
    ///
    /// ## Errors
    /// `DbError::Rejected` when the input fails validation.
    pub async fn insert(&self, input: &NewProduct) -> DbResult<Product> {
        validate_new_product(input).map_err(CoreError::from)?;

        let id = generate_document_id();
        let now = Utc::now().trunc_subsecs(3);

        debug!(id = %id, name = %input.name, "Inserting product");

        let mut fields = editable_fields(
            input.business_id.as_deref(),
            &input.name,
            input.category.as_deref(),
            input.purchase_price_cents,
            input.selling_price_cents,
        );
        fields.insert("stock".into(), Value::Double(input.stock));
        fields.insert("totalAdjusted".into(), Value::Double(0.0));
        fields.insert("totalTransferred".into(), Value::Double(0.0));
        fields.insert("createdAt".into(), Value::Timestamp(now));
        fields.insert("updatedAt".into(), Value::Timestamp(now));

        let document = self.collection().insert(&id, fields).await?;

        info!(id = %id, "Product created");
        document.decode()
    }

    /// Gets a product by id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        match self.collection().get(id).await? {
            Some(document) => Ok(Some(document.decode()?)),
            None => Ok(None),
        }
    }

    /// Lists products, newest first, optionally for one business.
    pub async fn list(&self, business_id: Option<&str>) -> DbResult<Vec<Product>> {
        let documents = list_scoped(&self.collection(), business_id).await?;
        debug!(count = documents.len(), "Listed products");
        decode_all(&documents)
    }

    /// Updates the descriptive fields and prices of a product.
    ///
    /// Stock and movement counters in `product` are ignored.
    ///
    /// ## Errors
    /// - `DbError::NotFound` if the product does not exist
    /// - `DbError::Rejected` when the new values fail validation
    pub async fn update(&self, product: &Product) -> DbResult<Product> {
        validate_product_name(&product.name).map_err(CoreError::from)?;
        for (field, cents) in [
            ("purchasePriceCents", product.purchase_price_cents),
            ("sellingPriceCents", product.selling_price_cents),
        ] {
            validate_non_negative_cents(field, cents).map_err(CoreError::from)?;
        }

        debug!(id = %product.id, "Updating product");

        let mut patch = editable_fields(
            product.business_id.as_deref(),
            &product.name,
            product.category.as_deref(),
            product.purchase_price_cents,
            product.selling_price_cents,
        );
        patch.insert("updatedAt".into(), Value::Timestamp(Utc::now().trunc_subsecs(3)));

        let document = self
            .collection()
            .update(&product.id, patch)
            .await
            .map_err(|e| match e {
                DbError::NotFound { id, .. } => DbError::not_found("Product", id),
                other => other,
            })?;

        document.decode()
    }

    /// Deletes a product.
    ///
    /// Adjustment and transfer records that reference it are left alone.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting product");
        self.collection()
            .delete(id)
            .await
            .map_err(|e| match e {
                DbError::NotFound { id, .. } => DbError::not_found("Product", id),
                other => other,
            })?;
        info!(id = %id, "Product deleted");
        Ok(())
    }

    /// Counts products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        self.collection().count().await
    }
}

fn editable_fields(
    business_id: Option<&str>,
    name: &str,
    category: Option<&str>,
    purchase_price_cents: i64,
    selling_price_cents: i64,
) -> Fields {
    let mut fields = Fields::new();
    fields.insert(BUSINESS_ID.into(), Value::from(business_id));
    fields.insert("name".into(), Value::from(name.trim()));
    fields.insert("category".into(), Value::from(category));
    fields.insert("purchasePriceCents".into(), Value::Integer(purchase_price_cents));
    fields.insert("sellingPriceCents".into(), Value::Integer(selling_price_cents));
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::{db, product};

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = db().await;
        let created = product(&db, "Cola 330ml", 24.0).await;

        assert_eq!(created.stock, 24.0);
        assert_eq!(created.total_adjusted, 0.0);
        assert_eq!(created.total_transferred, 0.0);
        assert!(created.created_at.is_some());

        let fetched = db.products().get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.selling_price().cents(), 1000);
    }

    #[tokio::test]
    async fn test_insert_rejects_invalid_input() {
        let db = db().await;
        let err = db
            .products()
            .insert(&NewProduct {
                business_id: None,
                name: "  ".to_string(),
                category: None,
                stock: 0.0,
                purchase_price_cents: 0,
                selling_price_cents: 0,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::Rejected(CoreError::Validation(_))));
        assert_eq!(db.products().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_filters_by_business() {
        let db = db().await;
        product(&db, "Cola", 1.0).await;
        product(&db, "Lemonade", 1.0).await;
        db.products()
            .insert(&NewProduct {
                business_id: Some("biz-2".to_string()),
                name: "Water".to_string(),
                category: Some("Drinks".to_string()),
                stock: 3.0,
                purchase_price_cents: 50,
                selling_price_cents: 100,
            })
            .await
            .unwrap();

        assert_eq!(db.products().list(None).await.unwrap().len(), 3);
        assert_eq!(db.products().list(Some("biz-1")).await.unwrap().len(), 2);

        let other = db.products().list(Some("biz-2")).await.unwrap();
        assert_eq!(other.len(), 1);
        assert_eq!(other[0].category.as_deref(), Some("Drinks"));
    }

    #[tokio::test]
    async fn test_update_keeps_stock() {
        let db = db().await;
        let mut cola = product(&db, "Cola", 10.0).await;

        cola.name = "Cola Zero".to_string();
        cola.stock = 999.0;
        cola.selling_price_cents = 1200;

        let updated = db.products().update(&cola).await.unwrap();
        assert_eq!(updated.name, "Cola Zero");
        assert_eq!(updated.selling_price_cents, 1200);
        assert_eq!(updated.stock, 10.0);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing() {
        let db = db().await;
        let mut ghost = product(&db, "Ghost", 0.0).await;
        db.products().delete(&ghost.id).await.unwrap();

        ghost.name = "Still ghost".to_string();
        assert!(matches!(
            db.products().update(&ghost).await,
            Err(DbError::NotFound { .. })
        ));
        assert!(matches!(
            db.products().delete(&ghost.id).await,
            Err(DbError::NotFound { .. })
        ));
        assert!(db.products().get_by_id(&ghost.id).await.unwrap().is_none());
    }
}
