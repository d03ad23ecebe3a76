//! # Product Commands
//!
//! Product list search, the product detail screen and the inventory
//! summary.
//!
//! ## Screens
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  Product List                                                   │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │ 🔍 "ka"          search_products("ka")                   │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │   KAOS-01   12                                                  │
//! │   kain-07    2   ──tap──►  Product Detail                      │
//! │                            get_product_detail("kain-07")       │
//! │                            ├── product                         │
//! │                            ├── purchases (newest first)        │
//! │                            └── orders    (newest first)        │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use std::time::Instant;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::{AppConfig, DbState};
use stockbook_core::{Order, Product, Purchase, StructuredRecord};

/// Product as shown in lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: String,
    pub product_code: String,
    pub stock: i64,
    /// RFC 3339 timestamp of the last stock change.
    pub updated_at: String,
}

impl From<Product> for ProductDto {
    fn from(p: Product) -> Self {
        ProductDto {
            id: p.id,
            product_code: p.product_code,
            stock: p.stock,
            updated_at: p.updated_at.to_rfc3339(),
        }
    }
}

/// Everything the product detail screen shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetailDto {
    pub product: ProductDto,
    pub purchases: Vec<Purchase>,
    pub orders: Vec<Order>,
}

/// Searches products whose code starts with `query`, ignoring case.
///
/// ## Arguments
/// * `query` - Code prefix; empty lists every product
/// * `limit` - Maximum results (defaults to, and is capped at, the
///   configured search limit)
pub async fn search_products(
    db: &DbState,
    config: &AppConfig,
    query: &str,
    limit: Option<u32>,
) -> Result<Vec<ProductDto>, ApiError> {
    let start = Instant::now();
    let query = query.trim();
    let limit = limit.unwrap_or(config.search_limit).min(config.search_limit);

    debug!(query = %query, limit = %limit, "search_products command");

    let products = db.inner().products().search_by_code_prefix(query, limit).await?;
    let dtos: Vec<ProductDto> = products.into_iter().map(ProductDto::from).collect();

    info!(
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        count = dtos.len(),
        query = %query,
        "search_products complete"
    );

    Ok(dtos)
}

/// Loads a product with its purchase and order history.
pub async fn get_product_detail(
    db: &DbState,
    product_code: &str,
) -> Result<ProductDetailDto, ApiError> {
    debug!(product_code = %product_code, "get_product_detail command");

    let db = db.inner();
    let product = db
        .products()
        .get_by_code(product_code)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", product_code))?;

    let purchases = db.purchases().history_for_product(product_code).await?;
    let orders = db.orders().history_for_product(product_code).await?;

    Ok(ProductDetailDto {
        product: ProductDto::from(product),
        purchases,
        orders,
    })
}

/// Every product and its stock as a record ready for the renderer.
///
/// ```text
/// Products:
///   KAOS-01: 12
///   TOPI-02: 9
/// Total Units: 21
/// ```
pub async fn inventory_summary(db: &DbState) -> Result<StructuredRecord, ApiError> {
    let products = db.inner().products().list_all().await?;
    let total: i64 = products.iter().map(|p| p.stock).sum();

    // codes go in as values so the renderer leaves their case alone
    let stock: Vec<String> = products
        .iter()
        .map(|p| format!("{}: {}", p.product_code, p.stock))
        .collect();

    Ok(StructuredRecord::new()
        .with("products", stock)
        .with("totalUnits", total))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use stockbook_core::render::render_text;
    use stockbook_core::{render, LineItem, NewOrder, NewPurchase};
    use stockbook_db::{Database, DbConfig};

    async fn setup() -> DbState {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.purchases()
            .record(&NewPurchase {
                items: vec![LineItem::new("KAOS-01", 12, 45_000), LineItem::new("TOPI-02", 9, 35_000)],
                ..Default::default()
            })
            .await
            .unwrap();
        DbState::new(db)
    }

    #[tokio::test]
    async fn test_search_caps_limit() {
        let db = setup().await;
        let config = AppConfig {
            search_limit: 1,
            ..AppConfig::default()
        };

        let found = search_products(&db, &config, "", Some(10)).await.unwrap();
        assert_eq!(found.len(), 1);

        let found = search_products(&db, &AppConfig::default(), " kaos ", None).await.unwrap();
        assert_eq!(found[0].product_code, "KAOS-01");
        assert_eq!(found[0].stock, 12);
    }

    #[tokio::test]
    async fn test_product_detail_history() {
        let db = setup().await;
        db.inner()
            .orders()
            .record(&NewOrder {
                items: vec![LineItem::new("KAOS-01", 2, 60_000)],
                ..Default::default()
            })
            .await
            .unwrap();

        let detail = get_product_detail(&db, "KAOS-01").await.unwrap();

        assert_eq!(detail.product.stock, 10);
        assert_eq!(detail.purchases.len(), 1);
        assert_eq!(detail.orders.len(), 1);
        assert!(get_product_detail(&db, "TOPI-02").await.unwrap().orders.is_empty());
    }

    #[tokio::test]
    async fn test_product_detail_not_found() {
        let db = setup().await;

        let err = get_product_detail(&db, "NOPE").await.unwrap_err();

        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_inventory_summary_renders() {
        let db = setup().await;

        let summary = inventory_summary(&db).await.unwrap();

        assert_eq!(
            render_text(&render(&summary)),
            "Products:\n  KAOS-01: 12\n  TOPI-02: 9\nTotal Units: 21\n"
        );
    }
}
