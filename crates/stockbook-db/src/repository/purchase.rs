//! # Purchase Repository
//!
//! Stock-in records.
//!
//! ## Recording a Purchase
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  BEGIN                                                                  │
//! │    INSERT purchases (header)                                            │
//! │    INSERT purchase_items (one per line, in order)                       │
//! │    for each line:                                                       │
//! │      UPDATE products SET stock = stock + qty   ── 0 rows? ──┐           │
//! │                                                             ▼           │
//! │                                  INSERT products (stock = qty)          │
//! │  COMMIT                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A failure anywhere rolls the whole purchase back; the transaction is
//! dropped without commit.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use super::{validate_items, ItemTable};
use crate::error::DbResult;
use stockbook_core::stock::purchase_movements;
use stockbook_core::{LineItem, NewPurchase, Purchase};

#[derive(Debug, sqlx::FromRow)]
struct PurchaseRow {
    id: String,
    notes: Option<String>,
    purchaser: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PurchaseRow {
    fn with_items(self, items: Vec<LineItem>) -> Purchase {
        Purchase {
            id: self.id,
            items,
            notes: self.notes,
            purchaser: self.purchaser,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Repository for purchase database operations.
#[derive(Debug, Clone)]
pub struct PurchaseRepository {
    pool: SqlitePool,
}

impl PurchaseRepository {
    /// Creates a new PurchaseRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PurchaseRepository { pool }
    }

    /// Records a purchase and adds its quantities to stock.
    ///
    /// A line whose product code is not in the catalogue creates the product
    /// with that line's quantity as its stock.
    ///
    /// ## Returns
    /// * `Ok(Purchase)` - The stored purchase
    /// * `Err(DbError::Validation)` - No lines, or a line breaks a field rule
    pub async fn record(&self, purchase: &NewPurchase) -> DbResult<Purchase> {
        validate_items(&purchase.items)?;

        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        info!(purchase_id = %id, lines = purchase.items.len(), "Recording purchase");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO purchases (id, notes, purchaser, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&id)
        .bind(&purchase.notes)
        .bind(&purchase.purchaser)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        ItemTable::Purchase.insert(&mut tx, &id, &purchase.items).await?;

        for movement in purchase_movements(purchase) {
            let updated = sqlx::query(
                "UPDATE products SET stock = stock + ?2, updated_at = ?3 WHERE product_code = ?1",
            )
            .bind(&movement.product_code)
            .bind(movement.delta)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            if updated.rows_affected() == 0 {
                debug!(product_code = %movement.product_code, "Creating product from purchase");

                sqlx::query(
                    r#"
                    INSERT INTO products (id, product_code, stock, created_at, updated_at)
                    VALUES (?1, ?2, ?3, ?4, ?5)
                    "#,
                )
                .bind(Uuid::new_v4().to_string())
                .bind(&movement.product_code)
                .bind(movement.delta)
                .bind(now)
                .bind(now)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;

        Ok(Purchase {
            id,
            items: purchase.items.clone(),
            notes: purchase.notes.clone(),
            purchaser: purchase.purchaser.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Gets a purchase with its items.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Purchase>> {
        let row = sqlx::query_as::<_, PurchaseRow>(
            "SELECT id, notes, purchaser, created_at, updated_at FROM purchases WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let items = ItemTable::Purchase.load(&self.pool, &row.id).await?;
                Ok(Some(row.with_items(items)))
            }
            None => Ok(None),
        }
    }

    /// Purchases with at least one line for `product_code`, newest first.
    pub async fn history_for_product(&self, product_code: &str) -> DbResult<Vec<Purchase>> {
        let rows = sqlx::query_as::<_, PurchaseRow>(
            r#"
            SELECT p.id, p.notes, p.purchaser, p.created_at, p.updated_at
            FROM purchases p
            WHERE EXISTS (
                SELECT 1 FROM purchase_items i
                WHERE i.purchase_id = p.id AND i.product_code = ?1
            )
            ORDER BY p.created_at DESC, p.rowid DESC
            "#,
        )
        .bind(product_code)
        .fetch_all(&self.pool)
        .await?;

        let mut purchases = Vec::with_capacity(rows.len());
        for row in rows {
            let items = ItemTable::Purchase.load(&self.pool, &row.id).await?;
            purchases.push(row.with_items(items));
        }

        debug!(product_code = %product_code, count = purchases.len(), "Loaded purchase history");
        Ok(purchases)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
