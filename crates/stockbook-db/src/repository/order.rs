//! # Order Repository
//!
//! Stock-out records. Same transaction shape as purchases, except stock is
//! decremented and lines for unknown product codes leave stock alone.
//!
//! The decrement only applies while enough stock is left, so two orders
//! racing for the same units cannot both succeed; the loser's transaction is
//! rolled back with `InsufficientStock`.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{validate_items, ItemTable};
use crate::error::{DbError, DbResult};
use stockbook_core::stock::order_movements;
use stockbook_core::{LineItem, NewOrder, Order};

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: String,
    notes: Option<String>,
    admin: Option<String>,
    buyer: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderRow {
    fn with_items(self, items: Vec<LineItem>) -> Order {
        Order {
            id: self.id,
            items,
            notes: self.notes,
            admin: self.admin,
            buyer: self.buyer,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Records an order and takes its quantities out of stock.
    ///
    /// Nothing is written if any known product has less stock than its line
    /// asks for.
    pub async fn record(&self, order: &NewOrder) -> DbResult<Order> {
        validate_items(&order.items)?;

        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        info!(order_id = %id, lines = order.items.len(), "Recording order");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO orders (id, notes, admin, buyer, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&id)
        .bind(&order.notes)
        .bind(&order.admin)
        .bind(&order.buyer)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        ItemTable::Order.insert(&mut tx, &id, &order.items).await?;

        for movement in order_movements(order) {
            let updated = sqlx::query(
                r#"
                UPDATE products SET stock = stock + ?2, updated_at = ?3
                WHERE product_code = ?1 AND stock + ?2 >= 0
                "#,
            )
            .bind(&movement.product_code)
            .bind(movement.delta)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            if updated.rows_affected() > 0 {
                continue;
            }

            let available: Option<i64> =
                sqlx::query_scalar("SELECT stock FROM products WHERE product_code = ?1")
                    .bind(&movement.product_code)
                    .fetch_optional(&mut *tx)
                    .await?;

            match available {
                Some(available) => {
                    warn!(
                        order_id = %id,
                        product_code = %movement.product_code,
                        available,
                        "Order refused, stock ran out"
                    );
                    return Err(DbError::InsufficientStock {
                        product_code: movement.product_code,
                        available,
                        requested: -movement.delta,
                    });
                }
                None => {
                    warn!(product_code = %movement.product_code, "Order line for unknown product, stock unchanged");
                }
            }
        }

        tx.commit().await?;

        Ok(Order {
            id,
            items: order.items.clone(),
            notes: order.notes.clone(),
            admin: order.admin.clone(),
            buyer: order.buyer.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Gets an order with its items.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Order>> {
        let row = sqlx::query_as::<_, OrderRow>(
            "SELECT id, notes, admin, buyer, created_at, updated_at FROM orders WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let items = ItemTable::Order.load(&self.pool, &row.id).await?;
                Ok(Some(row.with_items(items)))
            }
            None => Ok(None),
        }
    }

    /// Orders with at least one line for `product_code`, newest first.
    pub async fn history_for_product(&self, product_code: &str) -> DbResult<Vec<Order>> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT o.id, o.notes, o.admin, o.buyer, o.created_at, o.updated_at
            FROM orders o
            WHERE EXISTS (
                SELECT 1 FROM order_items i
                WHERE i.order_id = o.id AND i.product_code = ?1
            )
            ORDER BY o.created_at DESC, o.rowid DESC
            "#,
        )
        .bind(product_code)
        .fetch_all(&self.pool)
        .await?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            let items = ItemTable::Order.load(&self.pool, &row.id).await?;
            orders.push(row.with_items(items));
        }

        debug!(product_code = %product_code, count = orders.len(), "Loaded order history");
        Ok(orders)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use stockbook_core::NewPurchase;

    async fn stocked() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.purchases()
            .record(&NewPurchase {
                items: vec![LineItem::new("A1", 10, 1_000), LineItem::new("B2", 3, 500)],
                ..Default::default()
            })
            .await
            .unwrap();
        db
    }

    #[tokio::test]
    async fn test_order_decrements_stock() {
        let db = stocked().await;

        let order = db
            .orders()
            .record(&NewOrder {
                items: vec![LineItem::new("A1", 2, 15_000), LineItem::new("B2", 3, 7_500)],
                buyer: Some("Sari".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(db.products().get_by_code("A1").await.unwrap().unwrap().stock, 8);
        assert_eq!(db.products().get_by_code("B2").await.unwrap().unwrap().stock, 0);
        assert_eq!(order.total().rupiah(), 52_500);

        let loaded = db.orders().get_by_id(&order.id).await.unwrap().unwrap();
        assert_eq!(loaded, order);
    }

    #[tokio::test]
    async fn test_order_skips_unknown_product() {
        let db = stocked().await;

        db.orders()
            .record(&NewOrder {
                items: vec![LineItem::new("ZZ", 1, 100)],
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(db.products().get_by_code("ZZ").await.unwrap().is_none());
        assert_eq!(db.orders().history_for_product("ZZ").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_order_beyond_stock_writes_nothing() {
        let db = stocked().await;

        let err = db
            .orders()
            .record(&NewOrder {
                items: vec![LineItem::new("A1", 2, 100), LineItem::new("B2", 4, 100)],
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DbError::InsufficientStock { ref product_code, available: 3, requested: 4 } if product_code == "B2"
        ));
        assert_eq!(db.products().get_by_code("A1").await.unwrap().unwrap().stock, 10);
        assert!(db.orders().history_for_product("A1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_competing_orders_cannot_oversell() {
        let db = stocked().await;
        let all_b = NewOrder {
            items: vec![LineItem::new("B2", 3, 100)],
            ..Default::default()
        };

        let (orders_a, orders_b) = (db.orders(), db.orders());
        let (first, second) = tokio::join!(orders_a.record(&all_b), orders_b.record(&all_b));

        assert_eq!(first.is_ok() as u8 + second.is_ok() as u8, 1);
        assert_eq!(db.products().get_by_code("B2").await.unwrap().unwrap().stock, 0);
    }

    #[tokio::test]
    async fn test_order_history_filters_by_product() {
        let db = stocked().await;
        let only_a = NewOrder {
            items: vec![LineItem::new("A1", 1, 100)],
            ..Default::default()
        };
        let only_b = NewOrder {
            items: vec![LineItem::new("B2", 1, 100)],
            ..Default::default()
        };

        let first = db.orders().record(&only_a).await.unwrap();
        db.orders().record(&only_b).await.unwrap();
        let last = db.orders().record(&only_a).await.unwrap();

        let history = db.orders().history_for_product("A1").await.unwrap();
        let ids: Vec<_> = history.iter().map(|o| o.id.clone()).collect();

        assert_eq!(ids, vec![last.id, first.id]);
    }
}
