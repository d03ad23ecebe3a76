//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Code Prefix Search
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  User types: "ka"                                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  product_code LIKE 'ka%'  (ASCII case-insensitive)                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  KAOS-01   ← match                                                      │
//! │  kain-07   ← match                                                      │
//! │  TOPI-02                                                                │
//! │                                                                         │
//! │  Empty query lists every product. Results are ordered by code.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use stockbook_core::Product;

const PRODUCT_COLUMNS: &str = "id, product_code, stock, created_at, updated_at";

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Products whose code starts with `query`, ignoring ASCII case.
    ///
    /// `%` and `_` in the query match literally.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let products = repo.search_by_code_prefix("kaos", 20).await?;
    ///
    /// // Empty query lists everything
    /// let products = repo.search_by_code_prefix("", 20).await?;
    /// ```
    pub async fn search_by_code_prefix(&self, query: &str, limit: u32) -> DbResult<Vec<Product>> {
        let query = query.trim();

        debug!(query = %query, limit = %limit, "Searching products");

        let pattern = format!("{}%", escape_like(query));
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE product_code LIKE ?1 ESCAPE '\\' \
             ORDER BY product_code COLLATE NOCASE, product_code \
             LIMIT ?2"
        );

        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(pattern)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = products.len(), "Search returned products");
        Ok(products)
    }

    /// Every product, ordered by code.
    pub async fn list_all(&self) -> DbResult<Vec<Product>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY product_code COLLATE NOCASE, product_code"
        );

        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");

        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Gets a product by its exact code.
    pub async fn get_by_code(&self, product_code: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE product_code = ?1");

        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(product_code)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Ok(Product)` - The inserted product
    /// * `Err(DbError::UniqueViolation)` - Code already exists
    pub async fn insert(&self, product: &Product) -> DbResult<Product> {
        debug!(product_code = %product.product_code, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (id, product_code, stock, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&product.id)
        .bind(&product.product_code)
        .bind(product.stock)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(product.clone())
    }

    /// Counts all products.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Escapes LIKE wildcards so user input matches literally.
fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};
    use chrono::Utc;
    use uuid::Uuid;

    fn product(code: &str, stock: i64) -> Product {
        let now = Utc::now();
        Product {
            id: Uuid::new_v4().to_string(),
            product_code: code.to_string(),
            stock,
            created_at: now,
            updated_at: now,
        }
    }

    async fn seeded() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        for (code, stock) in [("KAOS-01", 5), ("kain-07", 2), ("TOPI-02", 9), ("A_1", 1), ("AB1", 1)] {
            db.products().insert(&product(code, stock)).await.unwrap();
        }
        db
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("a_b%c\\"), "a\\_b\\%c\\\\");
        assert_eq!(escape_like("KAOS"), "KAOS");
    }

    #[tokio::test]
    async fn test_search_prefix_ignores_case() {
        let db = seeded().await;

        let found = db.products().search_by_code_prefix("ka", 10).await.unwrap();
        let codes: Vec<_> = found.iter().map(|p| p.product_code.as_str()).collect();

        assert_eq!(codes, vec!["kain-07", "KAOS-01"]);
    }

    #[tokio::test]
    async fn test_search_empty_lists_all() {
        let db = seeded().await;

        assert_eq!(db.products().search_by_code_prefix("  ", 10).await.unwrap().len(), 5);
        assert_eq!(db.products().search_by_code_prefix("", 2).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_search_underscore_is_literal() {
        let db = seeded().await;

        let found = db.products().search_by_code_prefix("A_", 10).await.unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].product_code, "A_1");
    }

    #[tokio::test]
    async fn test_get_by_code_and_id() {
        let db = seeded().await;

        let by_code = db.products().get_by_code("TOPI-02").await.unwrap().unwrap();
        let by_id = db.products().get_by_id(&by_code.id).await.unwrap().unwrap();

        assert_eq!(by_code, by_id);
        assert_eq!(by_id.stock, 9);
        assert!(db.products().get_by_code("topi-02").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_code_rejected() {
        let db = seeded().await;

        let err = db.products().insert(&product("KAOS-01", 1)).await.unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation { .. }));
        assert_eq!(db.products().count().await.unwrap(), 5);
    }
}
