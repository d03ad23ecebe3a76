//! # stockbook-core: Pure Inventory Logic for Stockbook
//!
//! Everything Stockbook decides without touching storage: how a confirmation
//! dialog is laid out, how line-item rows are edited, which form input is
//! acceptable and how purchases and orders move stock.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockbook Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Screens                                      │   │
//! │  │    Product List ──► Product Detail ──► Purchase / Order Form    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    App Commands (apps/stockbook)                │   │
//! │  │    search_products, submit_order, order_confirmation, etc.      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ stockbook-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  render   │  │ list_edit │  │   form    │  │   stock   │  │   │
//! │  │   │ DisplayNd │  │  set_at   │  │ OrderForm │  │ movements │  │   │
//! │  │   │ startCase │  │ delete_at │  │ Purchase  │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 stockbook-db (Database Layer)                   │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`structured`] - Nested record values fed to the renderer
//! - [`render`] - Record to labelled display tree
//! - [`list_edit`] - Copy-on-write edits of indexed row lists
//! - [`form`] - Purchase and order form state
//! - [`validation`] - Field rules and keystroke filters
//! - [`stock`] - Stock movements from purchases and orders
//! - [`types`] - Domain types (Product, Purchase, Order)
//! - [`money`] - Integer rupiah amounts
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use stockbook_core::{render, StructuredRecord};
//! use stockbook_core::render::render_text;
//!
//! let record = StructuredRecord::new()
//!     .with("productCode", "A1")
//!     .with("unitPrice (IDR)", "15.000");
//!
//! assert_eq!(
//!     render_text(&render(&record)),
//!     "Product Code: A1\nUnit Price (IDR): 15.000\n"
//! );
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod form;
pub mod list_edit;
pub mod money;
pub mod render;
pub mod stock;
pub mod structured;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ListEditError, ValidationError};
pub use form::{FormRow, OrderForm, PurchaseForm, RowWarnings};
pub use money::Money;
pub use render::{render, DisplayNode};
pub use structured::{StructuredRecord, StructuredValue};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Currency code shown in confirmation labels.
pub const CURRENCY_CODE: &str = "IDR";

/// Most products returned by one search.
pub const DEFAULT_SEARCH_LIMIT: u32 = 50;
