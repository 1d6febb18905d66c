//! # Commands Module
//!
//! All commands exposed to the web frontend.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs        ◄─── You are here (exports)
//! ├── inventory.rs  ◄─── restock_inventory, list_stock_groups
//! ├── sale.rs       ◄─── record_sale, search_sales, refund_sale
//! ├── expense.rs    ◄─── record_expense, expense_summary
//! ├── report.rs     ◄─── dashboard, monthly_trend, platform_breakdown, annual_report
//! ├── import.rs     ◄─── import_from_platform
//! ├── backup.rs     ◄─── export_backup, restore_backup
//! └── settings.rs   ◄─── set_passcode, clear_passcode, unlock
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Frontend form                                                          │
//! │    { item_name: "Lamp", qty_received: "10", unit_price: "25.00" }      │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  restock_inventory(&app, RestockForm)                                  │
//! │    ├── validate names / dates / category                               │
//! │    ├── coerce numeric strings (blank → 0)                              │
//! │    └── app.store().apply(|data| data.with_restock(...))                │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Result<InventoryItem, ApiError>  (JSON to the frontend)               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Reads take a snapshot and run a pure function from `cloudstock-core`.
//! Writes go through `RecordStore::apply`, never around it.

pub mod backup;
pub mod expense;
pub mod import;
pub mod inventory;
pub mod report;
pub mod sale;
pub mod settings;

/// Today's date as the `YYYY-MM-DD` string the records store.
pub(crate) fn today() -> String {
    chrono::Local::now().date_naive().format("%Y-%m-%d").to_string()
}
