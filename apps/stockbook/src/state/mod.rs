//! # State Module
//!
//! Application state, split into one type per concern so each command
//! takes only what it touches.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌──────────────────┐ ┌──────────────────────┐ ┌──────────────────┐    │
//! │  │    DbState       │ │  OrderFormState      │ │   AppConfig      │    │
//! │  │                  │ │  PurchaseFormState   │ │                  │    │
//! │  │  • Database pool │ │  • Form being edited │ │  • DB path       │    │
//! │  │  • Repositories  │ │  • Arc<Mutex<_>>     │ │  • Currency      │    │
//! │  └──────────────────┘ └──────────────────────┘ └──────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod db;
pub mod form;

pub use config::AppConfig;
pub use db::DbState;
pub use form::{OrderFormState, PurchaseFormState};
