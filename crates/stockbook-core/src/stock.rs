//! # Stock Movements
//!
//! Purchases add stock, orders remove it. This module turns a submission
//! into per-product deltas; the database layer applies them inside the same
//! transaction that records the submission.
//!
//! ```text
//! NewPurchase { items: [A1 ×5] }   ──►  [ +5 A1 ]
//! NewOrder    { items: [A1 ×2,     ──►  [ -2 A1, -1 B2 ]
//!                       B2 ×1] }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::{LineItem, NewOrder, NewPurchase, Product};

/// A signed change to one product's stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockMovement {
    pub product_code: String,
    pub delta: i64,
}

impl StockMovement {
    pub fn stock_in(product_code: impl Into<String>, quantity: i64) -> Self {
        StockMovement {
            product_code: product_code.into(),
            delta: quantity,
        }
    }

    pub fn stock_out(product_code: impl Into<String>, quantity: i64) -> Self {
        StockMovement {
            product_code: product_code.into(),
            delta: -quantity,
        }
    }
}

/// One incoming movement per purchase line.
pub fn purchase_movements(purchase: &NewPurchase) -> Vec<StockMovement> {
    purchase
        .items
        .iter()
        .map(|item| StockMovement::stock_in(&item.product_code, item.quantity))
        .collect()
}

/// One outgoing movement per order line.
pub fn order_movements(order: &NewOrder) -> Vec<StockMovement> {
    order
        .items
        .iter()
        .map(|item| StockMovement::stock_out(&item.product_code, item.quantity))
        .collect()
}

impl Product {
    /// Applies a movement and stamps `updated_at`.
    pub fn apply_movement(&mut self, movement: &StockMovement, now: DateTime<Utc>) {
        self.stock += movement.delta;
        self.updated_at = now;
    }
}

/// Checks that each line can be covered by the product's current stock.
///
/// Lines whose product is unknown are not checked here; the order screen only
/// offers known products.
pub fn check_stock(items: &[LineItem], products: &[Product]) -> CoreResult<()> {
    for item in items {
        let Some(product) = products.iter().find(|p| p.product_code == item.product_code) else {
            continue;
        };

        if !product.can_fulfil(item.quantity) {
            return Err(CoreError::InsufficientStock {
                product_code: item.product_code.clone(),
                available: product.stock,
                requested: item.quantity,
            });
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
