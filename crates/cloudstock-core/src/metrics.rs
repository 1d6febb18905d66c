//! # Derived Metrics
//!
//! Pure folds over the record collections. Every screen recomputes these
//! from the current snapshot; nothing here is cached or persisted.
//!
//! ## Folds
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  sales ──────┬──► totals()             revenue, cogs, fees, profit     │
//! │              ├──► monthly_trend()      per YYYY-MM bucket, last N      │
//! │              ├──► platform_breakdown() selling_price per platform      │
//! │              └──► annual_report()      year-prefix filtered P&L        │
//! │                                                                         │
//! │  expenses ───┬──► totals()             Operating only                  │
//! │              ├──► monthly_trend()      Operating only                  │
//! │              ├──► annual_report()      Operating, by category          │
//! │              └──► expense_totals_by_type()                             │
//! │                                                                         │
//! │  inventory ──────► stock_levels() / low_stock()                        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Profit
//! ```text
//! gross_profit = Σ selling_price − Σ cogs
//! net_profit   = gross_profit − Σ platform_fee − Σ amount[Operating]
//! ```
//!
//! Grouped outputs (stock levels, platforms, expense categories) come back
//! in order of first occurrence in the input.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::money::Money;
use crate::types::{AppData, Expense, ExpenseType, InventoryItem, Platform, Sale};

// =============================================================================
// Totals
// =============================================================================

/// Whole-history (or caller-scoped) profit figures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Totals {
    pub total_revenue: Money,
    pub total_cogs: Money,
    pub total_fees: Money,
    pub operating_expenses: Money,
    pub gross_profit: Money,
    pub net_profit: Money,
}

/// Folds sales and expenses into the headline profit figures.
///
/// No date filtering happens here; scope the slices first if needed.
pub fn totals(sales: &[Sale], expenses: &[Expense]) -> Totals {
    let total_revenue: Money = sales.iter().map(|s| s.selling_price).sum();
    let total_cogs: Money = sales.iter().map(|s| s.cogs).sum();
    let total_fees: Money = sales.iter().map(|s| s.platform_fee).sum();
    let operating_expenses = operating_total(expenses);

    let gross_profit = total_revenue - total_cogs;
    Totals {
        total_revenue,
        total_cogs,
        total_fees,
        operating_expenses,
        gross_profit,
        net_profit: gross_profit - total_fees - operating_expenses,
    }
}

fn operating_total(expenses: &[Expense]) -> Money {
    expenses
        .iter()
        .filter(|e| e.kind == ExpenseType::Operating)
        .map(|e| e.amount)
        .sum()
}

// =============================================================================
// Stock Levels
// =============================================================================

/// Units on hand for one item name, summed across its batches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StockLevel {
    pub item_name: String,
    pub total_qty: i64,
}

/// Groups batches by exact item name and sums `current_qty`.
pub fn stock_levels(inventory: &[InventoryItem]) -> Vec<StockLevel> {
    let mut levels: Vec<StockLevel> = Vec::new();

    for item in inventory {
        match levels.iter_mut().find(|l| l.item_name == item.item_name) {
            Some(level) => level.total_qty += item.current_qty,
            None => levels.push(StockLevel {
                item_name: item.item_name.clone(),
                total_qty: item.current_qty,
            }),
        }
    }

    levels
}

/// Item groups whose summed quantity is strictly below `threshold`.
pub fn low_stock(inventory: &[InventoryItem], threshold: i64) -> Vec<StockLevel> {
    stock_levels(inventory)
        .into_iter()
        .filter(|l| l.total_qty < threshold)
        .collect()
}

// =============================================================================
// Monthly Trend
// =============================================================================

/// One month of the trend chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MonthlyPoint {
    /// `YYYY-MM`
    pub month: String,
    pub sales: Money,
    pub profit: Money,
    pub expenses: Money,
}

impl MonthlyPoint {
    fn empty(month: &str) -> Self {
        MonthlyPoint {
            month: month.to_string(),
            sales: Money::zero(),
            profit: Money::zero(),
            expenses: Money::zero(),
        }
    }
}

/// Month key of a `YYYY-MM-DD` string: its first 7 characters.
fn month_key(date: &str) -> &str {
    match date.char_indices().nth(7) {
        Some((idx, _)) => &date[..idx],
        None => date,
    }
}

/// Buckets sales and expenses by month and keeps the latest `months`.
///
/// Sales add `selling_price` to `sales` and `margin_earn - platform_fee` to
/// `profit`. Any expense opens its month's bucket, but only Operating
/// expenses add to `expenses` and subtract from `profit`.
///
/// ```text
///  2024-01  2024-02  ...  2024-09  2024-10
///  ───────────────────────────────────────
///  dropped  dropped       kept     kept      (ascending, tail of N)
/// ```
pub fn monthly_trend(data: &AppData, months: usize) -> Vec<MonthlyPoint> {
    let mut buckets: BTreeMap<&str, MonthlyPoint> = BTreeMap::new();

    for sale in &data.sales {
        let key = month_key(&sale.sale_date);
        let point = buckets
            .entry(key)
            .or_insert_with(|| MonthlyPoint::empty(key));
        point.sales += sale.selling_price;
        point.profit += sale.margin_earn - sale.platform_fee;
    }

    for expense in &data.expenses {
        let key = month_key(&expense.date_spent);
        let point = buckets
            .entry(key)
            .or_insert_with(|| MonthlyPoint::empty(key));
        if expense.kind == ExpenseType::Operating {
            point.expenses += expense.amount;
            point.profit -= expense.amount;
        }
    }

    let skip = buckets.len().saturating_sub(months);
    buckets.into_values().skip(skip).collect()
}

// =============================================================================
// Platform Breakdown
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PlatformTotal {
    pub platform: Platform,
    pub total: Money,
}

/// Sums `selling_price` per platform.
pub fn platform_breakdown(sales: &[Sale]) -> Vec<PlatformTotal> {
    let mut totals: Vec<PlatformTotal> = Vec::new();

    for sale in sales {
        match totals.iter_mut().find(|t| t.platform == sale.platform) {
            Some(entry) => entry.total += sale.selling_price,
            None => totals.push(PlatformTotal {
                platform: sale.platform,
                total: sale.selling_price,
            }),
        }
    }

    totals
}

// =============================================================================
// Annual Report
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Money,
}

/// Simplified profit and loss for one year. No tax rate is applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AnnualReport {
    pub year: i32,
    pub total_sales: Money,
    pub total_cogs: Money,
    pub total_fees: Money,
    pub gross_profit: Money,
    /// Operating expenses grouped by category.
    pub expense_breakdown: Vec<CategoryTotal>,
    pub total_operating_expenses: Money,
    pub net_profit: Money,
}

/// Builds the annual report for `year`.
///
/// A record belongs to the year when its date string starts with the
/// year's decimal text. This is a lexical match: `"20231-01"` counts as 2023.
pub fn annual_report(data: &AppData, year: i32) -> AnnualReport {
    let prefix = year.to_string();

    let sales: Vec<Sale> = data
        .sales
        .iter()
        .filter(|s| s.sale_date.starts_with(&prefix))
        .cloned()
        .collect();

    let operating: Vec<&Expense> = data
        .expenses
        .iter()
        .filter(|e| e.date_spent.starts_with(&prefix) && e.kind == ExpenseType::Operating)
        .collect();

    let mut expense_breakdown: Vec<CategoryTotal> = Vec::new();
    for expense in &operating {
        match expense_breakdown
            .iter_mut()
            .find(|c| c.category == expense.category)
        {
            Some(entry) => entry.total += expense.amount,
            None => expense_breakdown.push(CategoryTotal {
                category: expense.category.clone(),
                total: expense.amount,
            }),
        }
    }

    let t = totals(&sales, &[]);
    let total_operating_expenses: Money = operating.iter().map(|e| e.amount).sum();

    AnnualReport {
        year,
        total_sales: t.total_revenue,
        total_cogs: t.total_cogs,
        total_fees: t.total_fees,
        gross_profit: t.gross_profit,
        expense_breakdown,
        total_operating_expenses,
        net_profit: t.gross_profit - t.total_fees - total_operating_expenses,
    }
}

// =============================================================================
// Dashboard
// =============================================================================

/// Everything the dashboard cards show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DashboardSummary {
    pub totals: Totals,
    pub low_stock: Vec<StockLevel>,
    pub low_stock_count: usize,
}

pub fn dashboard(data: &AppData, low_stock_threshold: i64) -> DashboardSummary {
    let low_stock = low_stock(&data.inventory, low_stock_threshold);
    DashboardSummary {
        totals: totals(&data.sales, &data.expenses),
        low_stock_count: low_stock.len(),
        low_stock,
    }
}

// =============================================================================
// Expense Totals
// =============================================================================

/// Expense sums per accounting type, for the expenses screen header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ExpenseTypeTotals {
    pub operating: Money,
    pub drawing: Money,
    pub capital: Money,
    pub income: Money,
    pub restock: Money,
}

pub fn expense_totals_by_type(expenses: &[Expense]) -> ExpenseTypeTotals {
    expenses
        .iter()
        .fold(ExpenseTypeTotals::default(), |mut acc, e| {
            let slot = match e.kind {
                ExpenseType::Operating => &mut acc.operating,
                ExpenseType::Drawing => &mut acc.drawing,
                ExpenseType::Capital => &mut acc.capital,
                ExpenseType::Income => &mut acc.income,
                ExpenseType::Restock => &mut acc.restock,
            };
            *slot += e.amount;
            acc
        })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{InventoryId, SaleStatus, StockStatus};

    fn sale(date: &str, price: i64, cogs: i64, fee: i64, platform: Platform) -> Sale {
        Sale {
            id: format!("s-{date}-{price}"),
            inventory_id: InventoryId::new("b1"),
            item_name: "Widget".to_string(),
            sale_date: date.to_string(),
            selling_price: Money::from_sen(price),
            cogs: Money::from_sen(cogs),
            platform_fee: Money::from_sen(fee),
            selling_earn: Money::from_sen(price - fee),
            margin_earn: Money::from_sen(price - fee - cogs),
            tracking_num: String::new(),
            username_buyer: String::new(),
            sku_ref_no: String::new(),
            platform,
            status: SaleStatus::Delivered,
        }
    }

    fn expense(date: &str, category: &str, amount: i64, kind: ExpenseType) -> Expense {
        Expense {
            id: format!("e-{date}-{amount}"),
            date_spent: date.to_string(),
            category: category.to_string(),
            description: String::new(),
            amount: Money::from_sen(amount),
            kind,
        }
    }

    fn batch(name: &str, qty: i64) -> InventoryItem {
        InventoryItem {
            id: InventoryId::generate(),
            date_purchase: "2024-01-01".to_string(),
            item_name: name.to_string(),
            qty_received: qty,
            unit_price: Money::from_sen(100),
            shipping_charge: Money::zero(),
            total_unit_cost: Money::from_sen(100),
            current_qty: qty,
            status: StockStatus::Onhand,
        }
    }

    #[test]
    fn test_totals() {
        let sales = vec![
            sale("2024-01-10", 10_000, 4_000, 500, Platform::Shopee),
            sale("2024-02-10", 20_000, 9_000, 1_000, Platform::Lazada),
        ];
        let expenses = vec![
            expense("2024-01-15", "Packaging", 1_500, ExpenseType::Operating),
            expense("2024-01-20", "Owner", 50_000, ExpenseType::Drawing),
        ];

        let t = totals(&sales, &expenses);
        assert_eq!(t.total_revenue.sen(), 30_000);
        assert_eq!(t.total_cogs.sen(), 13_000);
        assert_eq!(t.gross_profit.sen(), 17_000);
        assert_eq!(t.operating_expenses.sen(), 1_500);
        assert_eq!(t.net_profit.sen(), 17_000 - 1_500 - 1_500);
    }

    #[test]
    fn test_totals_ignore_ordering() {
        let mut sales = vec![
            sale("2024-01-10", 10_000, 4_000, 500, Platform::Shopee),
            sale("2024-02-10", 20_000, 9_000, 1_000, Platform::Lazada),
            sale("2024-03-10", 7_500, 2_000, 250, Platform::TikTok),
        ];
        let expenses = vec![expense("2024-01-15", "Rental", 900, ExpenseType::Operating)];

        let forward = totals(&sales, &expenses);
        sales.reverse();
        assert_eq!(totals(&sales, &expenses), forward);
    }

    #[test]
    fn test_empty_collections_fold_to_zero() {
        let t = totals(&[], &[]);
        assert_eq!(t, Totals::default());
        assert!(monthly_trend(&AppData::default(), 6).is_empty());
        assert!(platform_breakdown(&[]).is_empty());
    }

    #[test]
    fn test_low_stock_groups_by_name() {
        let inventory = vec![batch("A", 2), batch("A", 2), batch("B", 5), batch("C", 4)];

        let low = low_stock(&inventory, 5);
        let names: Vec<_> = low.iter().map(|l| l.item_name.as_str()).collect();
        assert_eq!(names, vec!["A", "C"]);
        assert_eq!(low[0].total_qty, 4);
    }

    #[test]
    fn test_stock_levels_first_occurrence_order() {
        let inventory = vec![batch("Zeta", 1), batch("Alpha", 1), batch("Zeta", 3)];
        let levels = stock_levels(&inventory);

        assert_eq!(levels.len(), 2);
        assert_eq!(levels[0].item_name, "Zeta");
        assert_eq!(levels[0].total_qty, 4);
        assert_eq!(levels[1].item_name, "Alpha");
    }

    #[test]
    fn test_monthly_trend_keeps_latest_six_ascending() {
        let sales = (1..=8)
            .map(|m| sale(&format!("2024-{m:02}-05"), 1_000, 400, 100, Platform::Shopee))
            .collect();
        let data = AppData {
            sales,
            ..AppData::default()
        };

        let trend = monthly_trend(&data, 6);
        let months: Vec<_> = trend.iter().map(|p| p.month.as_str()).collect();
        assert_eq!(
            months,
            vec!["2024-03", "2024-04", "2024-05", "2024-06", "2024-07", "2024-08"]
        );
    }

    #[test]
    fn test_monthly_trend_profit_and_expenses() {
        let data = AppData {
            sales: vec![sale("2024-05-01", 10_000, 4_000, 500, Platform::Shopee)],
            expenses: vec![
                expense("2024-05-09", "Packaging", 300, ExpenseType::Operating),
                expense("2024-05-10", "Owner", 9_999, ExpenseType::Drawing),
                expense("2024-06-01", "Capital", 5_000, ExpenseType::Capital),
            ],
            ..AppData::default()
        };

        let trend = monthly_trend(&data, 6);
        assert_eq!(trend.len(), 2);

        let may = &trend[0];
        assert_eq!(may.sales.sen(), 10_000);
        assert_eq!(may.expenses.sen(), 300);
        // margin 5_500, minus fee 500, minus operating 300
        assert_eq!(may.profit.sen(), 4_700);

        let june = &trend[1];
        assert_eq!(june.month, "2024-06");
        assert!(june.sales.is_zero());
        assert!(june.expenses.is_zero());
    }

    #[test]
    fn test_platform_breakdown() {
        let sales = vec![
            sale("2024-01-01", 1_000, 0, 0, Platform::TikTok),
            sale("2024-01-02", 2_000, 0, 0, Platform::Shopee),
            sale("2024-01-03", 3_000, 0, 0, Platform::TikTok),
        ];

        let breakdown = platform_breakdown(&sales);
        assert_eq!(
            breakdown,
            vec![
                PlatformTotal {
                    platform: Platform::TikTok,
                    total: Money::from_sen(4_000),
                },
                PlatformTotal {
                    platform: Platform::Shopee,
                    total: Money::from_sen(2_000),
                },
            ]
        );
    }

    #[test]
    fn test_annual_report_filters_by_year() {
        let data = AppData {
            sales: vec![
                sale("2023-05-10", 10_000, 4_000, 500, Platform::Shopee),
                sale("2024-01-01", 20_000, 0, 0, Platform::Shopee),
            ],
            ..AppData::default()
        };

        let report = annual_report(&data, 2023);
        assert_eq!(report.total_sales.sen(), 10_000);
        assert_eq!(report.total_cogs.sen(), 4_000);
        assert_eq!(report.total_fees.sen(), 500);
        assert_eq!(report.gross_profit.sen(), 6_000);
        assert_eq!(report.net_profit.sen(), 5_500);
    }

    #[test]
    fn test_annual_report_expense_breakdown() {
        let data = AppData {
            expenses: vec![
                expense("2023-03-01", "Postage & Courier", 1_000, ExpenseType::Operating),
                expense("2023-04-01", "Packaging", 500, ExpenseType::Operating),
                expense("2023-05-01", "Postage & Courier", 250, ExpenseType::Operating),
                expense("2023-05-02", "Owner", 9_000, ExpenseType::Drawing),
                expense("2022-12-31", "Packaging", 7_000, ExpenseType::Operating),
            ],
            ..AppData::default()
        };

        let report = annual_report(&data, 2023);
        assert_eq!(report.expense_breakdown.len(), 2);
        assert_eq!(report.expense_breakdown[0].category, "Postage & Courier");
        assert_eq!(report.expense_breakdown[0].total.sen(), 1_250);
        assert_eq!(report.total_operating_expenses.sen(), 1_750);
        assert_eq!(report.net_profit.sen(), -1_750);
    }

    #[test]
    fn test_annual_report_prefix_match_is_lexical() {
        let data = AppData {
            sales: vec![sale("20231-01", 1_000, 0, 0, Platform::Other)],
            ..AppData::default()
        };

        assert_eq!(annual_report(&data, 2023).total_sales.sen(), 1_000);
    }

    #[test]
    fn test_dashboard() {
        let data = AppData {
            inventory: vec![batch("A", 1), batch("B", 10)],
            sales: vec![sale("2024-01-01", 5_000, 2_000, 0, Platform::Offline)],
            ..AppData::default()
        };

        let summary = dashboard(&data, 5);
        assert_eq!(summary.low_stock_count, 1);
        assert_eq!(summary.low_stock[0].item_name, "A");
        assert_eq!(summary.totals.net_profit.sen(), 3_000);
    }

    #[test]
    fn test_expense_totals_by_type() {
        let expenses = vec![
            expense("2024-01-01", "Rental", 1_000, ExpenseType::Operating),
            expense("2024-01-02", "Owner", 2_000, ExpenseType::Drawing),
            expense("2024-01-03", "Owner", 3_000, ExpenseType::Capital),
            expense("2024-01-04", "Rental", 500, ExpenseType::Operating),
        ];

        let totals = expense_totals_by_type(&expenses);
        assert_eq!(totals.operating.sen(), 1_500);
        assert_eq!(totals.drawing.sen(), 2_000);
        assert_eq!(totals.capital.sen(), 3_000);
        assert!(totals.income.is_zero());
        assert!(totals.restock.is_zero());
    }
}
