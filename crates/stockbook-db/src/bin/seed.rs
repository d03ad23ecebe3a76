//! # Seed Data Generator
//!
//! Populates the database with demo products for development.
//!
//! ## Usage
//! ```bash
//! # Seed the default database
//! cargo run -p stockbook-db --bin seed
//!
//! # Specify database path
//! cargo run -p stockbook-db --bin seed -- --db ./data/stockbook.db
//! ```
//!
//! Every product arrives through a recorded purchase, so the product detail
//! screen has history to show from the start.

use std::env;
use stockbook_core::{LineItem, NewPurchase};
use stockbook_db::{Database, DbConfig};

/// Product families: code prefix and a base unit price in rupiah.
const FAMILIES: &[(&str, i64)] = &[
    ("KAOS", 45_000),
    ("KEMEJA", 120_000),
    ("CELANA", 150_000),
    ("TOPI", 35_000),
    ("KAOS-KAKI", 15_000),
    ("JAKET", 250_000),
];

/// Variants per family.
const SIZES: &[&str] = &["S", "M", "L", "XL"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = env::var("STOCKBOOK_DB_PATH").unwrap_or_else(|_| "./stockbook.db".to_string());

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Stockbook Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./stockbook.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Stockbook Seed Data Generator");
    println!("=============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid doubling stock.");
        return Ok(());
    }

    let start = std::time::Instant::now();
    let mut recorded = 0;

    for (family_idx, (family, base_price)) in FAMILIES.iter().enumerate() {
        let items: Vec<LineItem> = SIZES
            .iter()
            .enumerate()
            .map(|(size_idx, size)| {
                let seed = family_idx * SIZES.len() + size_idx;
                LineItem::new(
                    format!("{family}-{size}"),
                    5 + (seed as i64 * 7) % 40,
                    base_price + size_idx as i64 * 5_000,
                )
            })
            .collect();

        let purchase = NewPurchase {
            items,
            notes: Some("Opening stock".to_string()),
            purchaser: Some("seed".to_string()),
        };

        if let Err(e) = db.purchases().record(&purchase).await {
            eprintln!("Failed to record {} purchase: {}", family, e);
            continue;
        }
        recorded += 1;
    }

    println!();
    println!(
        "✓ Recorded {} purchases ({} products) in {:?}",
        recorded,
        db.products().count().await?,
        start.elapsed()
    );

    let kaos = db.products().search_by_code_prefix("kaos", 50).await?;
    println!("  Search 'kaos': {} results", kaos.len());

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
