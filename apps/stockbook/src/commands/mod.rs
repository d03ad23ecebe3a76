//! # Commands Module
//!
//! Everything the screens can ask of the app.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (shared DTOs)
//! ├── product.rs   ◄─── Product list search, product detail, inventory
//! ├── purchase.rs  ◄─── Purchase form editing and submission
//! └── order.rs     ◄─── Order form editing and submission
//! ```
//!
//! ## State Injection
//! Each command declares only the state it needs:
//! ```rust,ignore
//! // Only needs database
//! async fn search_products(db: &DbState, config: &AppConfig, ...)
//!
//! // Only needs the form
//! fn order_confirmation(form: &OrderFormState)
//!
//! // Needs both
//! async fn submit_order(db: &DbState, form: &OrderFormState)
//! ```

pub mod order;
pub mod product;
pub mod purchase;

use serde::Serialize;
use stockbook_core::render::render_text;
use stockbook_core::{render, DisplayNode, StructuredRecord};

/// A confirmation dialog: the display tree and the same content as text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationDto {
    pub nodes: Vec<DisplayNode>,
    pub text: String,
}

impl From<&StructuredRecord> for ConfirmationDto {
    fn from(record: &StructuredRecord) -> Self {
        let nodes = render(record);
        let text = render_text(&nodes);
        ConfirmationDto { nodes, text }
    }
}
