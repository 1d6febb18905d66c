//! # Domain Types
//!
//! Record types used throughout CloudStock.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          AppData (aggregate)                            │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  InventoryItem  │   │      Sale       │   │     Expense     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id ◄───────────┼───┼─ inventory_id   │   │  id             │       │
//! │  │  item_name      │   │  item_name      │   │  category       │       │
//! │  │  current_qty    │   │  selling_price  │   │  amount         │       │
//! │  │  total_unit_cost│   │  cogs, fee      │   │  type           │       │
//! │  └─────────────────┘   │  platform       │   └─────────────────┘       │
//! │                        │  status         │                              │
//! │                        └─────────────────┘   ┌─────────────────┐       │
//! │                                              │   SkuMapping    │       │
//! │                                              │  external_sku   │       │
//! │                                              │  internal_name  │       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Soft Foreign Key
//! `Sale::inventory_id` points at an `InventoryItem::id` through the
//! [`InventoryId`] newtype. Nothing enforces that the batch exists; lookups
//! go through [`AppData::find_batch`] and a dangling reference is a no-op.
//!
//! ## Dates
//! Dates are kept as the `YYYY-MM-DD` strings the frontend submits. The
//! monthly trend and annual report key off string prefixes of these values.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Identifiers
// =============================================================================

/// Identity of one inventory batch (one restock event).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct InventoryId(String);

impl InventoryId {
    /// Wraps an existing id string.
    pub fn new(id: impl Into<String>) -> Self {
        InventoryId(id.into())
    }

    /// Generates a fresh UUID v4 id.
    pub fn generate() -> Self {
        InventoryId(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InventoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Generates a record id for sales and expenses.
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

// =============================================================================
// Closed Enumerations
// =============================================================================

/// Physical state of an inventory batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum StockStatus {
    #[default]
    Onhand,
    Sold,
    Damaged,
    Returned,
}

/// Lifecycle state of a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum SaleStatus {
    /// Normal completed order.
    #[default]
    Delivered,
    /// Refunded and the unit went back on the shelf.
    Returned,
    /// Refunded without restock; the cost basis is written off.
    Refunded,
}

/// Marketplace the sale came through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Platform {
    Shopee,
    Lazada,
    TikTok,
    Offline,
    Other,
}

/// Accounting treatment of an expense.
///
/// Only `Operating` counts against profit. Drawings and capital are equity
/// movements; `Income` and `Restock` are recorded for the owner's reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ExpenseType {
    #[default]
    Operating,
    Drawing,
    Capital,
    Income,
    Restock,
}

impl StockStatus {
    pub const ALL: [StockStatus; 4] = [
        StockStatus::Onhand,
        StockStatus::Sold,
        StockStatus::Damaged,
        StockStatus::Returned,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            StockStatus::Onhand => "Onhand",
            StockStatus::Sold => "Sold",
            StockStatus::Damaged => "Damaged",
            StockStatus::Returned => "Returned",
        }
    }
}

impl SaleStatus {
    pub const ALL: [SaleStatus; 3] = [
        SaleStatus::Delivered,
        SaleStatus::Returned,
        SaleStatus::Refunded,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            SaleStatus::Delivered => "Delivered",
            SaleStatus::Returned => "Returned",
            SaleStatus::Refunded => "Refunded",
        }
    }
}

impl Platform {
    /// Platforms in the order the sales filter bar lists them.
    pub const ALL: [Platform; 5] = [
        Platform::Shopee,
        Platform::Lazada,
        Platform::TikTok,
        Platform::Offline,
        Platform::Other,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Platform::Shopee => "Shopee",
            Platform::Lazada => "Lazada",
            Platform::TikTok => "TikTok",
            Platform::Offline => "Offline",
            Platform::Other => "Other",
        }
    }
}

impl ExpenseType {
    pub const ALL: [ExpenseType; 5] = [
        ExpenseType::Operating,
        ExpenseType::Drawing,
        ExpenseType::Capital,
        ExpenseType::Income,
        ExpenseType::Restock,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            ExpenseType::Operating => "Operating",
            ExpenseType::Drawing => "Drawing",
            ExpenseType::Capital => "Capital",
            ExpenseType::Income => "Income",
            ExpenseType::Restock => "Restock",
        }
    }
}

/// Display and case-insensitive parsing for the closed enums.
///
/// The frontend posts the variant spelling ("TikTok", "Operating"); parsing
/// tolerates any casing so hand-edited backups still load.
macro_rules! impl_enum_text {
    ($ty:ty, $field:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                <$ty>::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| ValidationError::NotAllowed {
                        field: $field.to_string(),
                        allowed: <$ty>::ALL.iter().map(|v| v.as_str().to_string()).collect(),
                    })
            }
        }
    };
}

impl_enum_text!(StockStatus, "status");
impl_enum_text!(SaleStatus, "status");
impl_enum_text!(Platform, "platform");
impl_enum_text!(ExpenseType, "type");

// =============================================================================
// Inventory Item
// =============================================================================

/// One restock event: a batch of identical units bought together.
///
/// `item_name` is free text and doubles as the grouping key for stock
/// levels, so two batches named "Widget" count as the same product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InventoryItem {
    pub id: InventoryId,
    pub date_purchase: String,
    pub item_name: String,
    pub qty_received: i64,
    pub unit_price: Money,
    pub shipping_charge: Money,
    /// `unit_price + shipping_charge`, fixed at creation.
    pub total_unit_cost: Money,
    /// Units left. Raised by +1 on a return-to-stock refund.
    pub current_qty: i64,
    pub status: StockStatus,
}

/// Restock form input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewInventoryBatch {
    pub date_purchase: String,
    pub item_name: String,
    pub qty_received: i64,
    pub unit_price: Money,
    pub shipping_charge: Money,
}

// =============================================================================
// Sale
// =============================================================================

/// A marketplace or walk-in sale of a single unit.
///
/// `item_name` is a denormalized copy taken at sale time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Sale {
    pub id: String,
    pub inventory_id: InventoryId,
    pub item_name: String,
    pub sale_date: String,
    pub selling_price: Money,
    pub cogs: Money,
    pub platform_fee: Money,
    /// Payout after platform fee.
    pub selling_earn: Money,
    /// Profit contribution of this sale.
    pub margin_earn: Money,
    pub tracking_num: String,
    pub username_buyer: String,
    pub sku_ref_no: String,
    pub platform: Platform,
    pub status: SaleStatus,
}

/// Sale entry input (manual form or platform import).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewSale {
    pub inventory_id: InventoryId,
    pub item_name: String,
    pub sale_date: String,
    pub selling_price: Money,
    pub cogs: Money,
    pub platform_fee: Money,
    pub tracking_num: String,
    pub username_buyer: String,
    pub sku_ref_no: String,
    pub platform: Platform,
}

// =============================================================================
// Expense
// =============================================================================

/// A spending (or owner equity) entry. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Expense {
    pub id: String,
    pub date_spent: String,
    pub category: String,
    pub description: String,
    pub amount: Money,
    #[serde(rename = "type")]
    pub kind: ExpenseType,
}

/// Expense form input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewExpense {
    pub date_spent: String,
    pub category: String,
    pub description: String,
    pub amount: Money,
    #[serde(rename = "type")]
    pub kind: ExpenseType,
}

// =============================================================================
// SKU Mapping
// =============================================================================

/// Maps a marketplace SKU to an internal item name.
///
/// Carried in the aggregate and in backups; no computation reads it yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SkuMapping {
    pub external_sku: String,
    pub internal_item_name: String,
}

// =============================================================================
// AppData Aggregate
// =============================================================================

/// The single source of truth: all four record collections.
///
/// Always persisted, backed up and restored as one unit. Every collection
/// is newest-first. A persisted document missing a collection loads it as
/// empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AppData {
    #[serde(default)]
    pub inventory: Vec<InventoryItem>,
    #[serde(default)]
    pub sales: Vec<Sale>,
    #[serde(default)]
    pub expenses: Vec<Expense>,
    #[serde(default, rename = "skuMappings")]
    pub sku_mappings: Vec<SkuMapping>,
}

impl AppData {
    /// Returns true when all four collections are empty.
    pub fn is_empty(&self) -> bool {
        self.inventory.is_empty()
            && self.sales.is_empty()
            && self.expenses.is_empty()
            && self.sku_mappings.is_empty()
    }

    /// Looks up the batch a sale points at.
    pub fn find_batch(&self, id: &InventoryId) -> Option<&InventoryItem> {
        self.inventory.iter().find(|item| &item.id == id)
    }

    pub fn find_batch_mut(&mut self, id: &InventoryId) -> Option<&mut InventoryItem> {
        self.inventory.iter_mut().find(|item| &item.id == id)
    }

    pub fn find_sale(&self, id: &str) -> Option<&Sale> {
        self.sales.iter().find(|sale| sale.id == id)
    }

    pub fn find_sale_mut(&mut self, id: &str) -> Option<&mut Sale> {
        self.sales.iter_mut().find(|sale| sale.id == id)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_parsing_is_case_insensitive() {
        assert_eq!("tiktok".parse::<Platform>().unwrap(), Platform::TikTok);
        assert_eq!(" Shopee ".parse::<Platform>().unwrap(), Platform::Shopee);
        assert_eq!(
            "operating".parse::<ExpenseType>().unwrap(),
            ExpenseType::Operating
        );
        assert!("Amazon".parse::<Platform>().is_err());
    }

    #[test]
    fn test_enum_display_matches_json() {
        for platform in Platform::ALL {
            let json = serde_json::to_string(&platform).unwrap();
            assert_eq!(json, format!("\"{}\"", platform));
        }
        assert_eq!(StockStatus::Onhand.to_string(), "Onhand");
    }

    #[test]
    fn test_expense_kind_serializes_as_type() {
        let expense = Expense {
            id: "e1".to_string(),
            date_spent: "2024-02-01".to_string(),
            category: "Packaging".to_string(),
            description: "Bubble wrap".to_string(),
            amount: Money::from_sen(1_200),
            kind: ExpenseType::Operating,
        };
        let value = serde_json::to_value(&expense).unwrap();
        assert_eq!(value["type"], "Operating");
        assert_eq!(value["amount"], 12);
    }

    #[test]
    fn test_app_data_field_names_and_defaults() {
        let value = serde_json::to_value(AppData::default()).unwrap();
        assert!(value["skuMappings"].is_array());

        let partial: AppData = serde_json::from_str(r#"{"inventory": [], "sales": []}"#).unwrap();
        assert!(partial.is_empty());
    }

    #[test]
    fn test_find_batch() {
        let id = InventoryId::new("batch-1");
        let data = AppData {
            inventory: vec![InventoryItem {
                id: id.clone(),
                date_purchase: "2024-01-01".to_string(),
                item_name: "Widget".to_string(),
                qty_received: 3,
                unit_price: Money::from_sen(500),
                shipping_charge: Money::from_sen(50),
                total_unit_cost: Money::from_sen(550),
                current_qty: 3,
                status: StockStatus::Onhand,
            }],
            ..AppData::default()
        };

        assert_eq!(data.find_batch(&id).unwrap().item_name, "Widget");
        assert!(data.find_batch(&InventoryId::new("missing")).is_none());
    }
}
