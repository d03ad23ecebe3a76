//! # Purchase and Order Forms
//!
//! Screen-independent form state. Screens forward input events here and read
//! back rows, warnings and the confirmation record.
//!
//! ## Row Structs
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  OrderForm.rows: Vec<FormRow<OrderItem>>                                │
//! │                                                                         │
//! │   #0 ┌ item: A1 ×2 @15.000 ┐                                            │
//! │      └ warnings: {}        ┘                                            │
//! │   #1 ┌ item: A1 ×1 @15.000 ┐   ◄── insert / delete moves the item       │
//! │      └ warnings: {code}    ┘       and its warnings together            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each row owns its own warnings, so one `list_edit` call per event keeps
//! them aligned with their item.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::list_edit::{self, FieldPatch, InsertPoint, RowUpdate};
use crate::money::Money;
use crate::stock::check_stock;
use crate::structured::StructuredRecord;
use crate::types::{LineItem, NewOrder, NewPurchase, OrderItem, Product};
use crate::validation::{
    is_numeric_input, parse_numeric_input, validate_price, validate_product_code,
    validate_quantity, ValidationResult, DUPLICATE_PRODUCT_CODE, PRICE_TOO_LARGE,
    PRICE_TOO_SMALL, PRODUCT_CODE_EMPTY, QUANTITY_TOO_LARGE, QUANTITY_TOO_SMALL,
};

// =============================================================================
// Line Item Patches
// =============================================================================

/// One editable field of a [`LineItem`] with its new value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum LineItemField {
    ProductCode(String),
    Quantity(i64),
    Price(i64),
}

impl FieldPatch for LineItem {
    type Patch = LineItemField;

    fn apply_patch(&mut self, patch: LineItemField) {
        match patch {
            LineItemField::ProductCode(code) => self.product_code = code,
            LineItemField::Quantity(qty) => self.quantity = qty,
            LineItemField::Price(price) => self.price = price,
        }
    }
}

// =============================================================================
// Rows
// =============================================================================

/// Warnings shown under each input of a row.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowWarnings {
    pub product_code: Option<String>,
    pub quantity: Option<String>,
    pub price: Option<String>,
}

impl RowWarnings {
    pub fn is_empty(&self) -> bool {
        self.product_code.is_none() && self.quantity.is_none() && self.price.is_none()
    }

    fn check_item(item: &LineItem) -> Self {
        Self::check(&item.product_code, Ok(item.quantity), Ok(item.price))
    }

    /// Checks each field on its own; a number that failed to parse becomes
    /// a warning on that field only.
    fn check(
        product_code: &str,
        quantity: ValidationResult<i64>,
        price: ValidationResult<i64>,
    ) -> Self {
        RowWarnings {
            product_code: validate_product_code(product_code)
                .err()
                .map(|_| PRODUCT_CODE_EMPTY.to_string()),
            quantity: range_warning(
                quantity.and_then(validate_quantity),
                QUANTITY_TOO_SMALL,
                QUANTITY_TOO_LARGE,
            ),
            price: range_warning(
                price.and_then(validate_price),
                PRICE_TOO_SMALL,
                PRICE_TOO_LARGE,
            ),
        }
    }
}

fn range_warning(result: ValidationResult<()>, too_small: &str, too_large: &str) -> Option<String> {
    match result {
        Ok(()) => None,
        Err(ValidationError::AboveMaximum { .. }) => Some(too_large.to_string()),
        Err(_) => Some(too_small.to_string()),
    }
}

/// A line item together with its warnings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormRow<T> {
    pub item: T,
    pub warnings: RowWarnings,
}

impl<T> FormRow<T> {
    pub fn new(item: T) -> Self {
        FormRow {
            item,
            warnings: RowWarnings::default(),
        }
    }
}

/// Field edits go to the item; warnings are left for the next validation.
impl<T: FieldPatch> FieldPatch for FormRow<T> {
    type Patch = T::Patch;

    fn apply_patch(&mut self, patch: Self::Patch) {
        self.item.apply_patch(patch);
    }
}

// =============================================================================
// Order Form
// =============================================================================

/// Multi-row stock-out form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderForm {
    products: Vec<Product>,
    rows: Vec<FormRow<OrderItem>>,
    pub notes: String,
    pub admin: String,
    pub buyer: String,
}

impl OrderForm {
    /// Starts a form with one blank row for the first product.
    pub fn new(products: Vec<Product>) -> Self {
        let first = FormRow::new(blank_order_item(&products));
        OrderForm {
            products,
            rows: vec![first],
            notes: String::new(),
            admin: String::new(),
            buyer: String::new(),
        }
    }

    pub fn rows(&self) -> &[FormRow<OrderItem>] {
        &self.rows
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Picks the product for a row. The quantity is lowered to the product's
    /// stock if it was higher.
    pub fn select_product(&mut self, row: usize, product_code: &str) -> CoreResult<()> {
        let product = self.find_product(product_code)?.clone();
        let current = self.row(row)?.item.quantity;

        let rows = list_edit::set_at(
            &self.rows,
            row,
            RowUpdate::Field(LineItemField::ProductCode(product.product_code)),
        )?;
        self.rows = list_edit::set_at(
            &rows,
            row,
            RowUpdate::Field(LineItemField::Quantity(current.min(product.stock))),
        )?;
        Ok(())
    }

    /// Quantities the picker offers for a row: `1..=stock`.
    pub fn quantity_choices(&self, row: usize) -> CoreResult<RangeInclusive<i64>> {
        let code = &self.row(row)?.item.product_code;
        let product = self.find_product(code)?;
        Ok(1..=product.stock)
    }

    /// Sets a row's quantity; more than the product's stock is refused.
    pub fn set_quantity(&mut self, row: usize, quantity: i64) -> CoreResult<()> {
        let mut candidate = self.row(row)?.item.clone();
        candidate.quantity = quantity;
        check_stock(std::slice::from_ref(&candidate), &self.products)?;

        self.rows = list_edit::set_at(
            &self.rows,
            row,
            RowUpdate::Field(LineItemField::Quantity(quantity)),
        )?;
        Ok(())
    }

    /// Feeds price text typed into a row. Text that can never become a
    /// number is ignored and `Ok(false)` returned.
    pub fn set_price_input(&mut self, row: usize, text: &str) -> CoreResult<bool> {
        if !is_numeric_input(text) {
            return Ok(false);
        }

        let price = parse_numeric_input(text)?;
        self.rows = list_edit::set_at(&self.rows, row, RowUpdate::Field(LineItemField::Price(price)))?;
        Ok(true)
    }

    /// Adds a blank row right after `row`.
    pub fn add_row_after(&mut self, row: usize) -> CoreResult<()> {
        let blank = FormRow::new(blank_order_item(&self.products));
        self.rows = list_edit::insert_after(&self.rows, InsertPoint::After(row), blank)?;
        Ok(())
    }

    /// Removes `row`; the last remaining row is kept.
    pub fn delete_row(&mut self, row: usize) -> CoreResult<()> {
        self.rows = list_edit::delete_at(&self.rows, row)?;
        Ok(())
    }

    /// Recomputes every row's warnings.
    ///
    /// Field rules are checked first; duplicate product codes are only
    /// reported once every row passes them, and then every row sharing a
    /// code is flagged.
    pub fn validate(&mut self) -> ValidationResult<()> {
        for row in &mut self.rows {
            row.warnings = RowWarnings::check_item(&row.item);
        }

        let failing = self.rows.iter().filter(|r| !r.warnings.is_empty()).count();
        if failing > 0 {
            return Err(ValidationError::Rows { rows: failing });
        }

        let duplicates =
            list_edit::find_duplicate_indices(&self.rows, |r| r.item.product_code.trim().to_string());
        if duplicates.is_empty() {
            return Ok(());
        }

        let mut first = usize::MAX;
        for &i in &duplicates {
            self.rows[i].warnings.product_code = Some(DUPLICATE_PRODUCT_CODE.to_string());
            first = first.min(i);
        }

        Err(ValidationError::Duplicate {
            field: "productCode".to_string(),
            value: self.rows[first].item.product_code.clone(),
        })
    }

    /// Sum of all row subtotals.
    pub fn total(&self) -> Money {
        self.rows.iter().map(|r| r.item.subtotal()).sum()
    }

    /// The record shown in the confirmation dialog.
    pub fn confirmation_record(&self) -> StructuredRecord {
        let items: Vec<StructuredRecord> = self
            .rows
            .iter()
            .map(|r| {
                StructuredRecord::new()
                    .with("productCode", &r.item.product_code)
                    .with(
                        "Price (IDR)",
                        format!("{} (x{})", r.item.unit_price().to_grouped(), r.item.quantity),
                    )
                    .with("Subtotal (IDR)", r.item.subtotal())
            })
            .collect();

        StructuredRecord::new()
            .with("items", items)
            .with("notes", &self.notes)
            .with("admin", &self.admin)
            .with("buyer", &self.buyer)
            .with("Total (IDR)", self.total())
    }

    /// Validates and converts the form into an order ready to be saved.
    pub fn to_new_order(&mut self) -> CoreResult<NewOrder> {
        self.validate()?;
        let items: Vec<OrderItem> = self.rows.iter().map(|r| r.item.clone()).collect();
        check_stock(&items, &self.products)?;

        Ok(NewOrder {
            items,
            notes: non_empty(&self.notes),
            admin: non_empty(&self.admin),
            buyer: non_empty(&self.buyer),
        })
    }

    fn row(&self, row: usize) -> CoreResult<&FormRow<OrderItem>> {
        self.rows.get(row).ok_or_else(|| {
            CoreError::from(crate::error::ListEditError::IndexOutOfRange {
                index: row,
                len: self.rows.len(),
            })
        })
    }

    fn find_product(&self, code: &str) -> CoreResult<&Product> {
        self.products
            .iter()
            .find(|p| p.product_code == code)
            .ok_or_else(|| CoreError::ProductNotFound(code.to_string()))
    }
}

fn blank_order_item(products: &[Product]) -> OrderItem {
    LineItem {
        product_code: products
            .first()
            .map(|p| p.product_code.clone())
            .unwrap_or_default(),
        quantity: 1,
        price: 0,
    }
}

// =============================================================================
// Purchase Form
// =============================================================================

/// Single-product stock-in form.
///
/// Quantity and price are kept as typed so partial input survives until
/// submit.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseForm {
    product_code: String,
    code_locked: bool,
    quantity: String,
    price: String,
    pub purchaser: String,
    pub notes: String,
    warnings: RowWarnings,
}

impl PurchaseForm {
    pub fn new() -> Self {
        PurchaseForm {
            quantity: "0".to_string(),
            price: "0".to_string(),
            ..Default::default()
        }
    }

    /// Restocking an existing product: the code is filled in and locked.
    pub fn for_product(product_code: impl Into<String>) -> Self {
        PurchaseForm {
            product_code: product_code.into(),
            code_locked: true,
            ..PurchaseForm::new()
        }
    }

    pub fn product_code(&self) -> &str {
        &self.product_code
    }

    pub fn is_code_locked(&self) -> bool {
        self.code_locked
    }

    pub fn quantity_input(&self) -> &str {
        &self.quantity
    }

    pub fn price_input(&self) -> &str {
        &self.price
    }

    pub fn warnings(&self) -> &RowWarnings {
        &self.warnings
    }

    /// Returns `false` (and changes nothing) when the code is locked.
    pub fn set_product_code(&mut self, code: impl Into<String>) -> bool {
        if self.code_locked {
            return false;
        }
        self.product_code = code.into();
        true
    }

    /// Keystroke-filtered quantity input.
    pub fn set_quantity_input(&mut self, text: &str) -> bool {
        accept_numeric(&mut self.quantity, text)
    }

    /// Keystroke-filtered price input.
    pub fn set_price_input(&mut self, text: &str) -> bool {
        accept_numeric(&mut self.price, text)
    }

    /// The purchase line as currently entered.
    pub fn item(&self) -> ValidationResult<LineItem> {
        Ok(LineItem {
            product_code: self.product_code.trim().to_string(),
            quantity: parse_numeric_input(&self.quantity)?,
            price: parse_numeric_input(&self.price)?,
        })
    }

    /// Recomputes the warnings for every field.
    pub fn validate(&mut self) -> ValidationResult<()> {
        self.warnings = RowWarnings::check(
            &self.product_code,
            parse_numeric_input(&self.quantity),
            parse_numeric_input(&self.price),
        );

        if self.warnings.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::Rows { rows: 1 })
        }
    }

    /// The record shown in the confirmation dialog.
    pub fn confirmation_record(&self) -> ValidationResult<StructuredRecord> {
        let item = self.item()?;

        Ok(StructuredRecord::new()
            .with("productCode", item.product_code.as_str())
            .with("quantity", item.quantity)
            .with("Price (IDR)", item.unit_price())
            .with("notes", &self.notes)
            .with("purchaser", &self.purchaser)
            .with("Sub Total (IDR)", item.subtotal()))
    }

    /// Validates and converts the form into a purchase ready to be saved.
    pub fn to_new_purchase(&mut self) -> ValidationResult<NewPurchase> {
        self.validate()?;

        Ok(NewPurchase {
            items: vec![self.item()?],
            notes: non_empty(&self.notes),
            purchaser: non_empty(&self.purchaser),
        })
    }
}

fn accept_numeric(slot: &mut String, text: &str) -> bool {
    if !is_numeric_input(text) {
        return false;
    }
    *slot = text.to_string();
    true
}

fn non_empty(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{render, render_text, DisplayNode};
    use crate::structured::StructuredValue;
    use chrono::Utc;

    fn product(code: &str, stock: i64) -> Product {
        let now = Utc::now();
        Product {
            id: format!("id-{code}"),
            product_code: code.to_string(),
            stock,
            created_at: now,
            updated_at: now,
        }
    }

    fn catalog() -> Vec<Product> {
        vec![product("A1", 10), product("B2", 3)]
    }

    fn codes(form: &OrderForm) -> Vec<&str> {
        form.rows().iter().map(|r| r.item.product_code.as_str()).collect()
    }

    #[test]
    fn test_new_order_form_has_one_row() {
        let form = OrderForm::new(catalog());

        assert_eq!(form.rows().len(), 1);
        assert_eq!(form.rows()[0].item, LineItem::new("A1", 1, 0));
    }

    #[test]
    fn test_new_order_form_without_products() {
        let form = OrderForm::new(Vec::new());
        assert_eq!(form.rows()[0].item.product_code, "");
    }

    #[test]
    fn test_select_product_clamps_quantity() {
        let mut form = OrderForm::new(catalog());
        form.set_quantity(0, 8).unwrap();

        form.select_product(0, "B2").unwrap();

        assert_eq!(form.rows()[0].item.product_code, "B2");
        assert_eq!(form.rows()[0].item.quantity, 3);
        assert_eq!(form.quantity_choices(0).unwrap(), 1..=3);
    }

    #[test]
    fn test_select_unknown_product() {
        let mut form = OrderForm::new(catalog());
        assert!(matches!(
            form.select_product(0, "ZZ"),
            Err(CoreError::ProductNotFound(_))
        ));
    }

    #[test]
    fn test_set_quantity_above_stock_is_refused() {
        let mut form = OrderForm::new(catalog());
        let err = form.set_quantity(0, 11).unwrap_err();

        assert!(matches!(err, CoreError::InsufficientStock { available: 10, .. }));
        assert_eq!(form.rows()[0].item.quantity, 1);
    }

    #[test]
    fn test_price_input_filter() {
        let mut form = OrderForm::new(catalog());

        assert!(form.set_price_input(0, "15000").unwrap());
        assert!(!form.set_price_input(0, "015").unwrap());
        assert_eq!(form.rows()[0].item.price, 15_000);
    }

    #[test]
    fn test_add_and_delete_rows() {
        let mut form = OrderForm::new(catalog());
        form.select_product(0, "B2").unwrap();

        form.add_row_after(0).unwrap();
        assert_eq!(codes(&form), vec!["B2", "A1"]);

        form.delete_row(0).unwrap();
        assert_eq!(codes(&form), vec!["A1"]);

        // last row stays
        form.delete_row(0).unwrap();
        assert_eq!(form.rows().len(), 1);

        assert!(form.add_row_after(5).is_err());
    }

    #[test]
    fn test_validate_field_rules() {
        let mut form = OrderForm::new(catalog());

        let err = form.validate().unwrap_err();

        assert_eq!(err, ValidationError::Rows { rows: 1 });
        let warnings = &form.rows()[0].warnings;
        assert_eq!(warnings.price.as_deref(), Some(PRICE_TOO_SMALL));
        assert_eq!(warnings.product_code, None);
    }

    #[test]
    fn test_validate_flags_every_duplicate_row() {
        let mut form = OrderForm::new(catalog());
        form.set_price_input(0, "1000").unwrap();
        form.add_row_after(0).unwrap();
        form.select_product(1, "B2").unwrap();
        form.set_price_input(1, "2000").unwrap();
        form.add_row_after(1).unwrap();
        form.set_price_input(2, "3000").unwrap();

        let err = form.validate().unwrap_err();

        assert!(matches!(err, ValidationError::Duplicate { ref value, .. } if value == "A1"));
        let flagged: Vec<bool> = form
            .rows()
            .iter()
            .map(|r| r.warnings.product_code.as_deref() == Some(DUPLICATE_PRODUCT_CODE))
            .collect();
        assert_eq!(flagged, vec![true, false, true]);
    }

    #[test]
    fn test_warnings_move_with_their_row() {
        let mut form = OrderForm::new(catalog());
        form.set_price_input(0, "1000").unwrap();
        form.add_row_after(0).unwrap();
        let _ = form.validate();
        assert!(form.rows()[0].warnings.is_empty());
        assert!(form.rows()[1].warnings.price.is_some());

        // a new row in front of the failing one shifts it and its warning
        form.add_row_after(0).unwrap();
        assert!(form.rows()[1].warnings.is_empty());
        assert!(form.rows()[2].warnings.price.is_some());

        form.delete_row(1).unwrap();
        assert!(form.rows()[1].warnings.price.is_some());
    }

    #[test]
    fn test_order_confirmation_record() {
        let mut form = OrderForm::new(catalog());
        form.set_price_input(0, "15000").unwrap();
        form.set_quantity(0, 2).unwrap();
        form.buyer = "Sari".to_string();

        let nodes = render(&form.confirmation_record());

        assert_eq!(
            nodes[0],
            DisplayNode::group(
                "Items",
                vec![DisplayNode::group(
                    "#1",
                    vec![
                        DisplayNode::leaf("Product Code", "A1"),
                        DisplayNode::leaf("Price (IDR)", "15.000 (x2)"),
                        DisplayNode::leaf("Subtotal (IDR)", "30.000"),
                    ]
                )]
            )
        );
        assert_eq!(nodes[3], DisplayNode::leaf("Buyer", "Sari"));
        assert_eq!(nodes[4], DisplayNode::leaf("Total (IDR)", "30.000"));
    }

    #[test]
    fn test_order_total_with_huge_price() {
        let mut form = OrderForm::new(catalog());
        assert!(form.set_price_input(0, "9223372036854775807").unwrap());
        form.set_quantity(0, 2).unwrap();

        assert_eq!(form.total().rupiah(), i64::MAX);
        let _ = form.confirmation_record();

        assert_eq!(form.validate(), Err(ValidationError::Rows { rows: 1 }));
        assert_eq!(form.rows()[0].warnings.price.as_deref(), Some(PRICE_TOO_LARGE));
    }

    #[test]
    fn test_to_new_order() {
        let mut form = OrderForm::new(catalog());
        form.set_price_input(0, "500").unwrap();
        form.admin = "  ".to_string();
        form.notes = "cash".to_string();

        let order = form.to_new_order().unwrap();

        assert_eq!(order.items, vec![LineItem::new("A1", 1, 500)]);
        assert_eq!(order.admin, None);
        assert_eq!(order.notes.as_deref(), Some("cash"));
    }

    #[test]
    fn test_purchase_form_locked_code() {
        let mut form = PurchaseForm::for_product("A1");

        assert!(!form.set_product_code("B2"));
        assert_eq!(form.product_code(), "A1");
        assert!(form.is_code_locked());
    }

    #[test]
    fn test_purchase_form_validation() {
        let mut form = PurchaseForm::new();

        assert!(form.validate().is_err());
        assert_eq!(form.warnings().product_code.as_deref(), Some(PRODUCT_CODE_EMPTY));
        assert_eq!(form.warnings().quantity.as_deref(), Some(QUANTITY_TOO_SMALL));
        assert_eq!(form.warnings().price.as_deref(), Some(PRICE_TOO_SMALL));

        form.set_product_code("KAOS-01");
        assert!(form.set_quantity_input("12"));
        assert!(!form.set_quantity_input("012"));
        assert!(form.set_price_input("45000"));

        assert!(form.validate().is_ok());
        assert!(form.warnings().is_empty());
    }

    #[test]
    fn test_purchase_price_above_maximum() {
        let mut form = PurchaseForm::new();
        form.set_product_code("A1");
        form.set_quantity_input("2");
        form.set_price_input("9223372036854775807");

        assert_eq!(form.validate(), Err(ValidationError::Rows { rows: 1 }));
        assert_eq!(form.warnings().price.as_deref(), Some(PRICE_TOO_LARGE));
        assert_eq!(form.warnings().quantity, None);

        let record = form.confirmation_record().unwrap();
        assert_eq!(
            record.get("Sub Total (IDR)"),
            Some(&StructuredValue::from(Money::from_rupiah(i64::MAX)))
        );
    }

    #[test]
    fn test_purchase_warnings_follow_current_input() {
        let mut form = PurchaseForm::new();
        assert!(form.validate().is_err());

        form.set_product_code("A1");
        form.set_quantity_input("99999999999999999999");
        form.set_price_input("100");

        assert_eq!(form.validate(), Err(ValidationError::Rows { rows: 1 }));
        assert_eq!(
            form.warnings(),
            &RowWarnings {
                product_code: None,
                quantity: Some(QUANTITY_TOO_LARGE.to_string()),
                price: None,
            }
        );
        assert!(form.to_new_purchase().is_err());
    }

    #[test]
    fn test_purchase_confirmation_text() {
        let mut form = PurchaseForm::new();
        form.set_product_code("KAOS-01");
        form.set_quantity_input("3");
        form.set_price_input("45000");
        form.purchaser = "Budi".to_string();

        let text = render_text(&render(&form.confirmation_record().unwrap()));

        assert_eq!(
            text,
            "Product Code: KAOS-01\n\
             Quantity: 3\n\
             Price (IDR): 45.000\n\
             Notes: \n\
             Purchaser: Budi\n\
             Sub Total (IDR): 135.000\n"
        );
    }

    #[test]
    fn test_to_new_purchase() {
        let mut form = PurchaseForm::for_product("A1");
        form.set_quantity_input("4");
        form.set_price_input("1000");

        let purchase = form.to_new_purchase().unwrap();

        assert_eq!(purchase.items, vec![LineItem::new("A1", 4, 1_000)]);
        assert_eq!(purchase.purchaser, None);
    }
}
