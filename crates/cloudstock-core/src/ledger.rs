//! # Ledger Operations
//!
//! Every write to the aggregate is one of the operations in this module.
//! Each takes the previous `AppData` and yields the next one, so the store
//! can run them inside `apply` against the latest snapshot.
//!
//! ## Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Operation            Collection     Effect                             │
//! │  ─────────            ──────────     ──────                             │
//! │  with_restock()       inventory      prepend batch, current = received  │
//! │  with_sale()          sales          prepend sale (no stock decrement)  │
//! │  with_expense()       expenses       prepend expense                    │
//! │  refund_sale()        sales (+inv)   zero money fields, see policies    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Refund Policies
//! ```text
//!                       ReturnToStock          RefundOnly
//!                       ─────────────          ──────────
//!  selling_price        0                      0
//!  platform_fee         0                      0
//!  selling_earn         0                      0
//!  cogs                 0                      unchanged
//!  margin_earn          0                      -cogs
//!  status               Returned               Refunded
//!  batch current_qty    +1                     unchanged
//! ```
//!
//! Sales are unit-quantity, so a return restores exactly one unit.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{
    generate_id, AppData, Expense, InventoryId, InventoryItem, NewExpense, NewInventoryBatch,
    NewSale, Sale, SaleStatus, StockStatus,
};

// =============================================================================
// Record Construction
// =============================================================================

impl InventoryItem {
    /// Builds a new on-hand batch from a restock entry.
    pub fn from_restock(batch: NewInventoryBatch, id: InventoryId) -> Self {
        InventoryItem {
            id,
            date_purchase: batch.date_purchase,
            item_name: batch.item_name,
            qty_received: batch.qty_received,
            unit_price: batch.unit_price,
            shipping_charge: batch.shipping_charge,
            total_unit_cost: batch.unit_price + batch.shipping_charge,
            current_qty: batch.qty_received,
            status: StockStatus::Onhand,
        }
    }
}

impl Sale {
    /// Builds a delivered sale.
    ///
    /// `selling_earn` is the payout after the platform fee and
    /// `margin_earn` is that payout minus the cost of goods.
    pub fn record(sale: NewSale, id: impl Into<String>) -> Self {
        let selling_earn = sale.selling_price - sale.platform_fee;
        Sale {
            id: id.into(),
            inventory_id: sale.inventory_id,
            item_name: sale.item_name,
            sale_date: sale.sale_date,
            selling_price: sale.selling_price,
            cogs: sale.cogs,
            platform_fee: sale.platform_fee,
            selling_earn,
            margin_earn: selling_earn - sale.cogs,
            tracking_num: sale.tracking_num,
            username_buyer: sale.username_buyer,
            sku_ref_no: sale.sku_ref_no,
            platform: sale.platform,
            status: SaleStatus::Delivered,
        }
    }
}

impl Expense {
    pub fn record(expense: NewExpense, id: impl Into<String>) -> Self {
        Expense {
            id: id.into(),
            date_spent: expense.date_spent,
            category: expense.category,
            description: expense.description,
            amount: expense.amount,
            kind: expense.kind,
        }
    }
}

// =============================================================================
// Refund Types
// =============================================================================

/// What happens to the unit when a sale is refunded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum RefundPolicy {
    /// The buyer sent the unit back and it can be sold again.
    ReturnToStock,
    /// Money back without a usable unit; the cost basis becomes the loss.
    RefundOnly,
}

impl RefundPolicy {
    /// Maps the frontend's `returnToStock` flag.
    pub const fn from_return_flag(return_to_stock: bool) -> Self {
        if return_to_stock {
            RefundPolicy::ReturnToStock
        } else {
            RefundPolicy::RefundOnly
        }
    }
}

/// Result of a refund attempt. None of these is an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum RefundOutcome {
    /// The sale was refunded; `restocked` tells whether a unit went back.
    Refunded { restocked: bool },
    /// Return-to-stock refund applied but the referenced batch is gone, so
    /// no quantity was restored.
    RefundedBatchMissing { inventory_id: InventoryId },
    /// No sale has this id; nothing changed.
    SaleNotFound,
}

// =============================================================================
// Aggregate Operations
// =============================================================================

impl AppData {
    /// Prepends a new batch built from a restock entry.
    pub fn with_restock(mut self, batch: NewInventoryBatch, id: InventoryId) -> Self {
        self.inventory
            .insert(0, InventoryItem::from_restock(batch, id));
        self
    }

    /// Prepends a sale. The referenced batch's `current_qty` is left alone.
    pub fn with_sale(mut self, sale: Sale) -> Self {
        self.sales.insert(0, sale);
        self
    }

    pub fn with_expense(mut self, expense: Expense) -> Self {
        self.expenses.insert(0, expense);
        self
    }

    /// Convenience for callers that have form input rather than records.
    pub fn with_new_sale(self, sale: NewSale) -> Self {
        self.with_sale(Sale::record(sale, generate_id()))
    }

    pub fn with_new_expense(self, expense: NewExpense) -> Self {
        self.with_expense(Expense::record(expense, generate_id()))
    }

    /// Applies a refund to the sale with `sale_id`.
    ///
    /// An unknown id leaves the aggregate untouched. Refunding an already
    /// refunded sale applies the policy again: for `ReturnToStock` that
    /// restores another unit.
    pub fn refund_sale(&mut self, sale_id: &str, policy: RefundPolicy) -> RefundOutcome {
        let Some(sale) = self.find_sale_mut(sale_id) else {
            return RefundOutcome::SaleNotFound;
        };

        sale.selling_price = Money::zero();
        sale.platform_fee = Money::zero();
        sale.selling_earn = Money::zero();

        match policy {
            RefundPolicy::RefundOnly => {
                sale.margin_earn = -sale.cogs;
                sale.status = SaleStatus::Refunded;
                RefundOutcome::Refunded { restocked: false }
            }
            RefundPolicy::ReturnToStock => {
                sale.cogs = Money::zero();
                sale.margin_earn = Money::zero();
                sale.status = SaleStatus::Returned;

                let inventory_id = sale.inventory_id.clone();
                match self.find_batch_mut(&inventory_id) {
                    Some(batch) => {
                        batch.current_qty += 1;
                        RefundOutcome::Refunded { restocked: true }
                    }
                    None => RefundOutcome::RefundedBatchMissing { inventory_id },
                }
            }
        }
    }

    /// Consuming form of [`AppData::refund_sale`] for use inside `apply`.
    pub fn with_refund(mut self, sale_id: &str, policy: RefundPolicy) -> (Self, RefundOutcome) {
        let outcome = self.refund_sale(sale_id, policy);
        (self, outcome)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
