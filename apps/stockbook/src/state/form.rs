//! # Form State
//!
//! The order and purchase forms currently being edited.
//!
//! ## Thread Safety
//! Each form sits behind `Arc<Mutex<_>>`: commands may run concurrently but
//! only one may change a form at a time. Locks are held for the duration of
//! a closure and never across an `.await`.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Screen Action          Command              Form Change                │
//! │  ─────────────          ───────              ───────────                │
//! │  Pick product ────────► edit_order() ──────► select_product(row, code) │
//! │  Tap "+" on row 1 ────► edit_order() ──────► add_row_after(1)          │
//! │  Type price ──────────► edit_purchase() ───► set_price_input(text)     │
//! │  Tap submit ──────────► submit_order() ────► validate + save + reset   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use stockbook_core::{OrderForm, PurchaseForm};

/// Takes the lock, recovering the form if a previous holder panicked.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// =============================================================================
// Order Form
// =============================================================================

/// Thread-safe wrapper around the order form.
#[derive(Debug, Clone)]
pub struct OrderFormState {
    form: Arc<Mutex<OrderForm>>,
}

impl OrderFormState {
    /// Creates an empty order form with no products to pick from.
    pub fn new() -> Self {
        OrderFormState {
            form: Arc::new(Mutex::new(OrderForm::new(Vec::new()))),
        }
    }

    /// Executes a function with read access to the form.
    pub fn with_form<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&OrderForm) -> R,
    {
        let form = lock(&self.form);
        f(&form)
    }

    /// Executes a function with write access to the form.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// order_state.with_form_mut(|form| form.add_row_after(0))?;
    /// ```
    pub fn with_form_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut OrderForm) -> R,
    {
        let mut form = lock(&self.form);
        f(&mut form)
    }

    /// Swaps in a fresh form.
    pub fn replace(&self, form: OrderForm) {
        *lock(&self.form) = form;
    }
}

impl Default for OrderFormState {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Purchase Form
// =============================================================================

/// Thread-safe wrapper around the purchase form.
#[derive(Debug, Clone)]
pub struct PurchaseFormState {
    form: Arc<Mutex<PurchaseForm>>,
}

impl PurchaseFormState {
    /// Creates a blank purchase form.
    pub fn new() -> Self {
        PurchaseFormState {
            form: Arc::new(Mutex::new(PurchaseForm::new())),
        }
    }

    /// Executes a function with read access to the form.
    pub fn with_form<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&PurchaseForm) -> R,
    {
        let form = lock(&self.form);
        f(&form)
    }

    /// Executes a function with write access to the form.
    pub fn with_form_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut PurchaseForm) -> R,
    {
        let mut form = lock(&self.form);
        f(&mut form)
    }

    /// Swaps in a fresh form.
    pub fn replace(&self, form: PurchaseForm) {
        *lock(&self.form) = form;
    }
}

impl Default for PurchaseFormState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_the_form() {
        let state = PurchaseFormState::new();
        let other = state.clone();

        state.with_form_mut(|form| form.set_product_code("A1"));

        assert_eq!(other.with_form(|form| form.product_code().to_string()), "A1");
    }

    #[test]
    fn test_replace_order_form() {
        let state = OrderFormState::new();
        state.with_form_mut(|form| form.notes = "draft".to_string());

        state.replace(OrderForm::new(Vec::new()));

        assert_eq!(state.with_form(|form| form.notes.clone()), "");
    }
}
