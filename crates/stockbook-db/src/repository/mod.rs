//! # Repository Module
//!
//! Database repository implementations for Stockbook.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  App Command                                                            │
//! │       │                                                                 │
//! │       │  db.purchases().record(&new_purchase)                           │
//! │       ▼                                                                 │
//! │  PurchaseRepository                                                     │
//! │  ├── record(&self, purchase)        ─┐                                  │
//! │  ├── get_by_id(&self, id)            │ one transaction:                 │
//! │  └── history_for_product(&self, c)   │ header + items + stock           │
//! │       │                             ─┘                                  │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - Product lookup and search
//! - [`PurchaseRepository`](purchase::PurchaseRepository) - Stock-in records
//! - [`OrderRepository`](order::OrderRepository) - Stock-out records

pub mod order;
pub mod product;
pub mod purchase;

use sqlx::{SqliteConnection, SqlitePool};

use crate::error::DbResult;
use stockbook_core::validation::{validate_price, validate_product_code, validate_quantity};
use stockbook_core::{LineItem, ValidationError};

/// The two line-item tables. Both have the same shape and differ only in the
/// parent they hang off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ItemTable {
    Purchase,
    Order,
}

impl ItemTable {
    fn table(self) -> &'static str {
        match self {
            ItemTable::Purchase => "purchase_items",
            ItemTable::Order => "order_items",
        }
    }

    fn parent_column(self) -> &'static str {
        match self {
            ItemTable::Purchase => "purchase_id",
            ItemTable::Order => "order_id",
        }
    }

    /// Writes `items` in order under `parent_id`.
    pub(crate) async fn insert(
        self,
        conn: &mut SqliteConnection,
        parent_id: &str,
        items: &[LineItem],
    ) -> DbResult<()> {
        let sql = format!(
            "INSERT INTO {} ({}, position, product_code, quantity, price) VALUES (?1, ?2, ?3, ?4, ?5)",
            self.table(),
            self.parent_column()
        );

        for (position, item) in items.iter().enumerate() {
            sqlx::query(&sql)
                .bind(parent_id)
                .bind(position as i64)
                .bind(&item.product_code)
                .bind(item.quantity)
                .bind(item.price)
                .execute(&mut *conn)
                .await?;
        }

        Ok(())
    }

    /// Loads the items of `parent_id` in their original order.
    pub(crate) async fn load(self, pool: &SqlitePool, parent_id: &str) -> DbResult<Vec<LineItem>> {
        let sql = format!(
            "SELECT product_code, quantity, price FROM {} WHERE {} = ?1 ORDER BY position",
            self.table(),
            self.parent_column()
        );

        let items = sqlx::query_as::<_, LineItem>(&sql)
            .bind(parent_id)
            .fetch_all(pool)
            .await?;

        Ok(items)
    }
}

/// Rejects a submission with no lines or with a line the forms would have
/// flagged.
pub(crate) fn validate_items(items: &[LineItem]) -> Result<(), ValidationError> {
    if items.is_empty() {
        return Err(ValidationError::Required {
            field: "items".to_string(),
        });
    }

    for item in items {
        validate_product_code(&item.product_code)?;
        validate_quantity(item.quantity)?;
        validate_price(item.price)?;
    }

    Ok(())
}
