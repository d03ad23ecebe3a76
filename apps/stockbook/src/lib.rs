//! # Stockbook App Library
//!
//! Wires the core logic and the database into the commands the screens
//! call.
//!
//! ## Module Organization
//! ```text
//! stockbook_app/
//! ├── lib.rs          ◄─── You are here (logging & startup)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── db.rs       ◄─── Database state wrapper
//! │   ├── form.rs     ◄─── Order / purchase form state
//! │   └── config.rs   ◄─── Configuration state
//! ├── commands/
//! │   ├── mod.rs      ◄─── Shared confirmation DTO
//! │   ├── product.rs  ◄─── Search, detail, inventory summary
//! │   ├── purchase.rs ◄─── Purchase form commands
//! │   └── order.rs    ◄─── Order form commands
//! └── error.rs        ◄─── API error type for commands
//! ```

pub mod commands;
pub mod error;
pub mod state;

use tracing::info;
use tracing_subscriber::EnvFilter;

use error::ApiError;
use state::{AppConfig, DbState, OrderFormState, PurchaseFormState};
use stockbook_db::{Database, DbConfig};

/// Everything a running app holds.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  1. Read AppConfig (defaults + STOCKBOOK_* variables)                   │
/// │  2. Connect to SQLite, run pending migrations                           │
/// │  3. Create blank order and purchase forms                               │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone)]
pub struct App {
    pub config: AppConfig,
    pub db: DbState,
    pub order_form: OrderFormState,
    pub purchase_form: PurchaseFormState,
}

impl App {
    /// Opens the database named by `config` and sets up fresh state.
    pub async fn open(config: AppConfig) -> Result<Self, ApiError> {
        info!(path = %config.database_path.display(), "Opening Stockbook");

        let db = Database::new(DbConfig::new(&config.database_path)).await?;

        info!("Database connected and migrations applied");

        Ok(App {
            config,
            db: DbState::new(db),
            order_form: OrderFormState::new(),
            purchase_form: PurchaseFormState::new(),
        })
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=stockbook=trace` - Trace for stockbook crates only
/// - Default: INFO, DEBUG for stockbook crates, WARN for sqlx
///
/// Logs go to stderr so command output on stdout stays clean.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,stockbook=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
