//! # cloudstock-core: Pure Business Logic for CloudStock
//!
//! This crate is the **heart** of CloudStock. It holds the bookkeeping data
//! model and every derived computation as pure functions with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       CloudStock Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Frontend (web UI)                            │   │
//! │  │  Dashboard ─ Inventory ─ Sales ─ Expenses ─ Tax ─ Settings     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  cloudstock-app (commands)                      │   │
//! │  │   restock_inventory, refund_sale, annual_report, ...            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ cloudstock-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │  ┌────────┐ ┌────────┐ ┌─────────┐ ┌────────┐ ┌────────────┐  │   │
//! │  │  │ types  │ │ money  │ │ metrics │ │ ledger │ │   backup   │  │   │
//! │  │  │AppData │ │ Money  │ │ Totals  │ │ refund │ │ encode /   │  │   │
//! │  │  │ Sale   │ │ (sen)  │ │ Trend   │ │ restock│ │ decode     │  │   │
//! │  │  └────────┘ └────────┘ └─────────┘ └────────┘ └────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              cloudstock-db (RecordStore + SQLite slot)          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Record types (InventoryItem, Sale, Expense, AppData, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Form validation and lenient numeric coercion
//! - [`metrics`] - Dashboard KPIs, monthly trend, platform split, annual report
//! - [`query`] - Inventory grouping and sales search for the list screens
//! - [`ledger`] - Mutation operations on the aggregate (restock, sale, refund, expense)
//! - [`backup`] - Backup file encoding and restore validation
//!
//! ## Example Usage
//!
//! ```rust
//! use cloudstock_core::metrics::totals;
//! use cloudstock_core::{AppData, Money};
//!
//! let data = AppData::default();
//! let t = totals(&data.sales, &data.expenses);
//! assert_eq!(t.net_profit, Money::zero());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod backup;
pub mod error;
pub mod ledger;
pub mod metrics;
pub mod money;
pub mod query;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{BackupError, CoreError, ValidationError};
pub use ledger::{RefundOutcome, RefundPolicy};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// An item group is "low stock" when its summed `current_qty` is strictly
/// below this value.
pub const LOW_STOCK_THRESHOLD: i64 = 5;

/// Number of most recent month buckets kept for the trend chart.
pub const TREND_MONTHS: usize = 6;

/// Maximum length of an item name.
pub const MAX_ITEM_NAME_LEN: usize = 200;

/// Minimum passcode length for the local lock.
pub const MIN_PASSCODE_LEN: usize = 4;
