//! # Seed Data Generator
//!
//! Populates a database with sample bookkeeping records for development.
//!
//! ## Usage
//! ```bash
//! # Eight months of history (default)
//! cargo run -p cloudstock-db --bin seed
//!
//! # Custom history length
//! cargo run -p cloudstock-db --bin seed -- --months 14
//!
//! # Specify database path
//! cargo run -p cloudstock-db --bin seed -- --db ./data/cloudstock.db
//! ```
//!
//! ## Generated Records
//! - One restock batch per catalog item
//! - Sales spread over the requested months, across all platforms
//! - Monthly packaging and postage expenses, plus an owner drawing
//!
//! Values are derived from the record index, so two runs produce the same
//! figures (ids differ).

use chrono::{Datelike, Months, NaiveDate, Utc};
use std::env;
use uuid::Uuid;

use cloudstock_core::{
    AppData, Expense, ExpenseType, InventoryId, Money, NewExpense, NewInventoryBatch, NewSale,
    Platform, Sale,
};
use cloudstock_db::{Database, DbConfig, RecordStore};

/// (item name, unit price in sen, shipping in sen, quantity)
const CATALOG: &[(&str, i64, i64, i64)] = &[
    ("Wireless Earbuds", 4_500, 300, 40),
    ("Phone Case Clear", 650, 50, 120),
    ("USB-C Cable 1m", 420, 30, 200),
    ("Ring Light 10in", 3_800, 450, 15),
    ("Tumbler 500ml", 1_750, 120, 60),
    ("Tote Bag Canvas", 900, 80, 4),
    ("Desk Organizer", 2_200, 200, 3),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut months: u32 = 8;
    let mut db_path = String::from("./cloudstock_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--months" | "-m" => {
                if i + 1 < args.len() {
                    months = args[i + 1].parse().unwrap_or(8);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("CloudStock Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -m, --months <N>   Months of sales history (default: 8)");
                println!("  -d, --db <PATH>    Database file path (default: ./cloudstock_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 CloudStock Seed Data Generator");
    println!("=================================");
    println!("Database: {}", db_path);
    println!("Months:   {}", months);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let store = RecordStore::open(&db).await?;
    let existing = store.snapshot().await;
    if !existing.is_empty() {
        println!(
            "⚠ Database already has {} batches and {} sales",
            existing.inventory.len(),
            existing.sales.len()
        );
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let start_month = Utc::now()
        .date_naive()
        .with_day(1)
        .and_then(|d| d.checked_sub_months(Months::new(months.saturating_sub(1))))
        .ok_or("could not compute start month")?;

    let data = generate(start_month, months);
    let (batches, sales, expenses) = (data.inventory.len(), data.sales.len(), data.expenses.len());

    store.apply(|_| data).await?;

    println!();
    println!("✓ Inserted {} batches", batches);
    println!("✓ Inserted {} sales", sales);
    println!("✓ Inserted {} expenses", expenses);
    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Builds the whole sample aggregate in chronological order.
fn generate(start_month: NaiveDate, months: u32) -> AppData {
    let mut data = AppData::default();
    let purchase_date = start_month.format("%Y-%m-%d").to_string();

    let mut batch_ids = Vec::new();
    for (name, unit_price, shipping, qty) in CATALOG {
        let id = InventoryId::generate();
        batch_ids.push(id.clone());
        data = data.with_restock(
            NewInventoryBatch {
                date_purchase: purchase_date.clone(),
                item_name: name.to_string(),
                qty_received: *qty,
                unit_price: Money::from_sen(*unit_price),
                shipping_charge: Money::from_sen(*shipping),
            },
            id,
        );
    }

    let mut seed: usize = 0;
    for offset in 0..months {
        let Some(month) = start_month.checked_add_months(Months::new(offset)) else {
            continue;
        };

        for day in [3u32, 9, 14, 21, 27] {
            let Some(date) = month.with_day(day) else {
                continue;
            };
            let (name, unit_price, shipping, _) = CATALOG[seed % CATALOG.len()];
            let cost = unit_price + shipping;
            // 40% - 110% markup
            let price = cost + cost * (40 + (seed * 13 % 71) as i64) / 100;
            let platform = Platform::ALL[seed % Platform::ALL.len()];
            let fee = match platform {
                Platform::Offline => 0,
                _ => price * 8 / 100,
            };

            data = data.with_sale(Sale::record(
                NewSale {
                    inventory_id: batch_ids[seed % batch_ids.len()].clone(),
                    item_name: name.to_string(),
                    sale_date: date.format("%Y-%m-%d").to_string(),
                    selling_price: Money::from_sen(price),
                    cogs: Money::from_sen(cost),
                    platform_fee: Money::from_sen(fee),
                    tracking_num: format!("MY{:08}", 10_000_000 + seed * 7_919),
                    username_buyer: format!("buyer_{:04}", seed * 37 % 10_000),
                    sku_ref_no: format!("SKU-{:03}", seed % CATALOG.len() + 1),
                    platform,
                },
                Uuid::new_v4().to_string(),
            ));
            seed += 1;
        }

        let month_date = month.format("%Y-%m-%d").to_string();
        for (category, description, amount, kind) in [
            ("Packaging", "Boxes and bubble wrap", 3_500, ExpenseType::Operating),
            ("Postage & Courier", "Courier top-up", 6_000, ExpenseType::Operating),
            ("Others", "Owner drawing", 50_000, ExpenseType::Drawing),
        ] {
            data = data.with_expense(Expense::record(
                NewExpense {
                    date_spent: month_date.clone(),
                    category: category.to_string(),
                    description: description.to_string(),
                    amount: Money::from_sen(amount + (offset as i64) * 150),
                    kind,
                },
                Uuid::new_v4().to_string(),
            ));
        }
    }

    data
}
