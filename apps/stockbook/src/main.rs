//! # Stockbook Entry Point
//!
//! ## Usage
//! ```bash
//! stockbook                  # inventory summary
//! stockbook search ka        # products whose code starts with "ka"
//! stockbook detail KAOS-01   # one product with its history, as JSON
//! ```
//!
//! `STOCKBOOK_DB_PATH` picks the database file.

use std::env;
use std::process::ExitCode;

use stockbook_app::commands::product::{get_product_detail, inventory_summary, search_products};
use stockbook_app::error::ApiError;
use stockbook_app::state::AppConfig;
use stockbook_app::{init_tracing, App};
use stockbook_core::render;
use stockbook_core::render::render_text;
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = env::args().skip(1).collect();

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(code = ?e.code, "{}", e.message);
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &[String]) -> Result<(), ApiError> {
    let app = App::open(AppConfig::from_env()).await?;

    match args.first().map(String::as_str) {
        None | Some("summary") => {
            let summary = inventory_summary(&app.db).await?;
            print!("{}", render_text(&render(&summary)));
        }
        Some("search") => {
            let query = args.get(1).map(String::as_str).unwrap_or("");
            for product in search_products(&app.db, &app.config, query, None).await? {
                println!("{:<24} {:>6}", product.product_code, product.stock);
            }
        }
        Some("detail") => {
            let code = args
                .get(1)
                .ok_or_else(|| ApiError::validation("detail needs a product code"))?;
            let detail = get_product_detail(&app.db, code).await?;
            let json = serde_json::to_string_pretty(&detail)
                .map_err(|e| ApiError::internal(e.to_string()))?;
            println!("{}", json);
        }
        Some(other) => {
            return Err(ApiError::validation(format!(
                "unknown command '{}', expected summary, search or detail",
                other
            )));
        }
    }

    Ok(())
}
