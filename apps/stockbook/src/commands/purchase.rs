//! # Purchase Commands
//!
//! Editing and submitting the purchase (stock-in) form.
//!
//! ```text
//! start_purchase(Some("KAOS-01"))   ← from Product Detail, code locked
//! start_purchase(None)              ← from Product List, code editable
//!        │
//!        ▼
//! edit_purchase(Quantity("12")) ... edit_purchase(Price("45000"))
//!        │
//!        ▼
//! purchase_confirmation()  ──►  dialog  ──►  submit_purchase()
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::ConfirmationDto;
use crate::error::ApiError;
use crate::state::{DbState, PurchaseFormState};
use stockbook_core::{Purchase, PurchaseForm};

/// One change to the purchase form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum PurchaseEdit {
    ProductCode(String),
    Quantity(String),
    Price(String),
    Purchaser(String),
    Notes(String),
}

/// Starts a new purchase, optionally locked to one product.
pub fn start_purchase(state: &PurchaseFormState, product_code: Option<String>) -> PurchaseForm {
    let form = match product_code {
        Some(code) => PurchaseForm::for_product(code),
        None => PurchaseForm::new(),
    };

    state.replace(form.clone());
    form
}

/// Returns the form as it stands.
pub fn get_purchase_form(state: &PurchaseFormState) -> PurchaseForm {
    state.with_form(PurchaseForm::clone)
}

/// Applies one edit and returns the updated form.
///
/// Keystrokes the numeric filter refuses, and code edits on a locked form,
/// leave the form unchanged.
pub fn edit_purchase(state: &PurchaseFormState, edit: PurchaseEdit) -> PurchaseForm {
    state.with_form_mut(|form| {
        let accepted = match edit {
            PurchaseEdit::ProductCode(code) => form.set_product_code(code),
            PurchaseEdit::Quantity(text) => form.set_quantity_input(&text),
            PurchaseEdit::Price(text) => form.set_price_input(&text),
            PurchaseEdit::Purchaser(name) => {
                form.purchaser = name;
                true
            }
            PurchaseEdit::Notes(notes) => {
                form.notes = notes;
                true
            }
        };

        if !accepted {
            debug!("Purchase edit refused");
        }
        form.clone()
    })
}

/// Renders the confirmation dialog for the current form.
pub fn purchase_confirmation(state: &PurchaseFormState) -> Result<ConfirmationDto, ApiError> {
    let record = state.with_form(PurchaseForm::confirmation_record)?;
    Ok(ConfirmationDto::from(&record))
}

/// Validates and saves the purchase, then clears the form.
///
/// On a validation failure nothing is saved and the form keeps its input
/// with warnings attached.
pub async fn submit_purchase(db: &DbState, state: &PurchaseFormState) -> Result<Purchase, ApiError> {
    let new_purchase = state.with_form_mut(PurchaseForm::to_new_purchase)?;

    let purchase = db.inner().purchases().record(&new_purchase).await?;

    info!(purchase_id = %purchase.id, "Purchase submitted");
    state.replace(PurchaseForm::new());
    Ok(purchase)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use stockbook_core::validation::PRICE_TOO_SMALL;
    use stockbook_db::{Database, DbConfig};

    async fn setup() -> (DbState, PurchaseFormState) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        (DbState::new(db), PurchaseFormState::new())
    }

    #[tokio::test]
    async fn test_purchase_flow() {
        let (db, state) = setup().await;

        start_purchase(&state, None);
        edit_purchase(&state, PurchaseEdit::ProductCode("KAOS-01".into()));
        edit_purchase(&state, PurchaseEdit::Quantity("12".into()));
        edit_purchase(&state, PurchaseEdit::Price("45000".into()));
        edit_purchase(&state, PurchaseEdit::Purchaser("Budi".into()));

        let confirmation = purchase_confirmation(&state).unwrap();
        assert!(confirmation.text.contains("Sub Total (IDR): 540.000\n"));

        let purchase = submit_purchase(&db, &state).await.unwrap();

        assert_eq!(purchase.purchaser.as_deref(), Some("Budi"));
        let product = db.inner().products().get_by_code("KAOS-01").await.unwrap().unwrap();
        assert_eq!(product.stock, 12);
        assert_eq!(get_purchase_form(&state), PurchaseForm::new());
    }

    #[tokio::test]
    async fn test_invalid_purchase_keeps_input() {
        let (db, state) = setup().await;
        start_purchase(&state, Some("A1".into()));
        edit_purchase(&state, PurchaseEdit::Quantity("3".into()));

        let err = submit_purchase(&db, &state).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        let form = get_purchase_form(&state);
        assert_eq!(form.quantity_input(), "3");
        assert_eq!(form.warnings().price.as_deref(), Some(PRICE_TOO_SMALL));
        assert_eq!(db.inner().products().count().await.unwrap(), 0);
    }

    #[test]
    fn test_locked_code_and_filtered_input() {
        let state = PurchaseFormState::new();
        start_purchase(&state, Some("A1".into()));

        let form = edit_purchase(&state, PurchaseEdit::ProductCode("B2".into()));
        assert_eq!(form.product_code(), "A1");

        edit_purchase(&state, PurchaseEdit::Price("15".into()));
        let form = edit_purchase(&state, PurchaseEdit::Price("015".into()));
        assert_eq!(form.price_input(), "15");
    }
}
