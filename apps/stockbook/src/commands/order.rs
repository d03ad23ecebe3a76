//! # Order Commands
//!
//! Editing and submitting the multi-row order (stock-out) form.
//!
//! ## Submit Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  submit_order()                                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  form.to_new_order()   ── field / duplicate warnings ──► VALIDATION    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  db.orders().record()  (one transaction)                               │
//! │       │  stock decremented only while enough is left                   │
//! │       │                       ── short ──► INSUFFICIENT_STOCK          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  new blank form over the updated catalogue                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use tracing::info;

use super::ConfirmationDto;
use crate::error::ApiError;
use crate::state::{DbState, OrderFormState};
use stockbook_core::{CoreResult, Order, OrderForm};

/// One change to the order form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum OrderEdit {
    #[serde(rename_all = "camelCase")]
    SelectProduct { row: usize, product_code: String },
    Quantity { row: usize, quantity: i64 },
    Price { row: usize, text: String },
    AddRowAfter { row: usize },
    DeleteRow { row: usize },
    Notes { text: String },
    Admin { text: String },
    Buyer { text: String },
}

/// Starts a new order over the current catalogue.
pub async fn start_order(db: &DbState, state: &OrderFormState) -> Result<OrderForm, ApiError> {
    let products = db.inner().products().list_all().await?;
    let form = OrderForm::new(products);

    state.replace(form.clone());
    Ok(form)
}

/// Returns the form as it stands.
pub fn get_order_form(state: &OrderFormState) -> OrderForm {
    state.with_form(OrderForm::clone)
}

/// Applies one edit and returns the updated form.
///
/// A price keystroke the numeric filter refuses leaves the form unchanged.
pub fn edit_order(state: &OrderFormState, edit: OrderEdit) -> Result<OrderForm, ApiError> {
    state.with_form_mut(|form| -> Result<OrderForm, ApiError> {
        apply_edit(form, edit)?;
        Ok(form.clone())
    })
}

fn apply_edit(form: &mut OrderForm, edit: OrderEdit) -> CoreResult<()> {
    match edit {
        OrderEdit::SelectProduct { row, product_code } => form.select_product(row, &product_code),
        OrderEdit::Quantity { row, quantity } => form.set_quantity(row, quantity),
        OrderEdit::Price { row, text } => form.set_price_input(row, &text).map(|_| ()),
        OrderEdit::AddRowAfter { row } => form.add_row_after(row),
        OrderEdit::DeleteRow { row } => form.delete_row(row),
        OrderEdit::Notes { text } => {
            form.notes = text;
            Ok(())
        }
        OrderEdit::Admin { text } => {
            form.admin = text;
            Ok(())
        }
        OrderEdit::Buyer { text } => {
            form.buyer = text;
            Ok(())
        }
    }
}

/// Renders the confirmation dialog for the current form.
pub fn order_confirmation(state: &OrderFormState) -> ConfirmationDto {
    let record = state.with_form(OrderForm::confirmation_record);
    ConfirmationDto::from(&record)
}

/// Validates and saves the order, then starts a blank one.
///
/// The form checks stock against its own catalogue, which may be stale; the
/// repository checks it again inside the transaction that takes the stock.
pub async fn submit_order(db: &DbState, state: &OrderFormState) -> Result<Order, ApiError> {
    let new_order = state.with_form_mut(OrderForm::to_new_order)?;

    let order = db.inner().orders().record(&new_order).await?;
    info!(order_id = %order.id, total = %order.total(), "Order submitted");

    start_order(db, state).await?;
    Ok(order)
}

// =============================================================================
// Unit Tests
// =============================================================================
