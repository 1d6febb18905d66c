//! List-screen queries: grouped stock view and sales search.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::{InventoryItem, Platform, Sale};

/// All batches sharing one item name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct StockGroup {
    pub item_name: String,
    pub total_qty: i64,
    pub batches: Vec<InventoryItem>,
}

/// Groups batches by item name, keeping names that contain `search`
/// (case-insensitive). An empty search keeps everything.
pub fn stock_groups(inventory: &[InventoryItem], search: &str) -> Vec<StockGroup> {
    let needle = search.trim().to_lowercase();
    let mut groups: Vec<StockGroup> = Vec::new();

    for item in inventory
        .iter()
        .filter(|i| needle.is_empty() || i.item_name.to_lowercase().contains(&needle))
    {
        match groups.iter_mut().find(|g| g.item_name == item.item_name) {
            Some(group) => {
                group.total_qty += item.current_qty;
                group.batches.push(item.clone());
            }
            None => groups.push(StockGroup {
                item_name: item.item_name.clone(),
                total_qty: item.current_qty,
                batches: vec![item.clone()],
            }),
        }
    }

    groups
}

/// Sales list filter bar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SalesFilter {
    /// `None` means all platforms.
    #[serde(default)]
    pub platform: Option<Platform>,
    /// Matched against item name, tracking number and buyer handle.
    #[serde(default)]
    pub search: String,
}

impl SalesFilter {
    fn matches(&self, sale: &Sale, needle: &str) -> bool {
        if let Some(platform) = self.platform {
            if sale.platform != platform {
                return false;
            }
        }

        needle.is_empty()
            || [&sale.item_name, &sale.tracking_num, &sale.username_buyer]
                .iter()
                .any(|field| field.to_lowercase().contains(needle))
    }
}

/// Filters sales and orders them newest `sale_date` first.
///
/// Sales on the same date keep their collection order.
pub fn search_sales<'a>(sales: &'a [Sale], filter: &SalesFilter) -> Vec<&'a Sale> {
    let needle = filter.search.trim().to_lowercase();

    let mut hits: Vec<&Sale> = sales
        .iter()
        .filter(|s| filter.matches(s, &needle))
        .collect();
    hits.sort_by(|a, b| b.sale_date.cmp(&a.sale_date));
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::types::{InventoryId, SaleStatus, StockStatus};

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

    fn sale(id: &str, date: &str, item: &str, buyer: &str, platform: Platform) -> Sale {
        Sale {
            id: id.to_string(),
            inventory_id: InventoryId::new("b"),
            item_name: item.to_string(),
            sale_date: date.to_string(),
            selling_price: Money::from_sen(1_000),
            cogs: Money::zero(),
            platform_fee: Money::zero(),
            selling_earn: Money::from_sen(1_000),
            margin_earn: Money::from_sen(1_000),
            tracking_num: format!("MY{id}"),
            username_buyer: buyer.to_string(),
            sku_ref_no: String::new(),
            platform,
            status: SaleStatus::Delivered,
        }
    }

    #[test]
    fn test_stock_groups() {
        let inventory = vec![
            batch("Phone Case", 3),
            batch("Cable", 1),
            batch("Phone Case", 2),
        ];

        let groups = stock_groups(&inventory, "");
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].item_name, "Phone Case");
        assert_eq!(groups[0].total_qty, 5);
        assert_eq!(groups[0].batches.len(), 2);

        let groups = stock_groups(&inventory, "phone");
        assert_eq!(groups.len(), 1);
        assert!(stock_groups(&inventory, "tripod").is_empty());
    }

    #[test]
    fn test_search_sales_orders_newest_first() {
        let sales = vec![
            sale("1", "2024-01-05", "Cable", "amy", Platform::Shopee),
            sale("2", "2024-03-01", "Cable", "ben", Platform::Lazada),
            sale("3", "2024-01-05", "Lamp", "cat", Platform::Shopee),
        ];

        let ids: Vec<_> = search_sales(&sales, &SalesFilter::default())
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(ids, vec!["2", "1", "3"]);
    }

    #[test]
    fn test_search_sales_filters() {
        let sales = vec![
            sale("1", "2024-01-05", "Cable", "amy", Platform::Shopee),
            sale("2", "2024-03-01", "Cable", "ben", Platform::Lazada),
            sale("3", "2024-01-06", "Lamp", "Amy_K", Platform::Shopee),
        ];

        let filter = SalesFilter {
            platform: Some(Platform::Shopee),
            search: String::new(),
        };
        assert_eq!(search_sales(&sales, &filter).len(), 2);

        let filter = SalesFilter {
            platform: None,
            search: "AMY".to_string(),
        };
        let ids: Vec<_> = search_sales(&sales, &filter)
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(ids, vec!["3", "1"]);

        let filter = SalesFilter {
            platform: None,
            search: "my2".to_string(),
        };
        assert_eq!(search_sales(&sales, &filter)[0].id, "2");
    }
}
