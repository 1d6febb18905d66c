//! # Inventory Commands

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use cloudstock_core::query::{stock_groups, StockGroup};
use cloudstock_core::validation::{coerce_money, coerce_quantity, validate_date, validate_item_name};
use cloudstock_core::{InventoryId, InventoryItem, NewInventoryBatch};

use crate::error::ApiError;
use crate::App;

/// Restock form as submitted. Numbers arrive as text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RestockForm {
    pub date_purchase: String,
    pub item_name: String,
    #[serde(default)]
    pub qty_received: String,
    #[serde(default)]
    pub unit_price: String,
    #[serde(default)]
    pub shipping_charge: String,
}

impl RestockForm {
    fn into_batch(self) -> Result<NewInventoryBatch, ApiError> {
        validate_item_name(&self.item_name)?;
        validate_date("date_purchase", &self.date_purchase)?;

        Ok(NewInventoryBatch {
            date_purchase: self.date_purchase,
            item_name: self.item_name.trim().to_string(),
            qty_received: coerce_quantity(&self.qty_received),
            unit_price: coerce_money(&self.unit_price),
            shipping_charge: coerce_money(&self.shipping_charge),
        })
    }
}

/// Records a new batch at the top of the inventory list.
pub async fn restock_inventory(app: &App, form: RestockForm) -> Result<InventoryItem, ApiError> {
    debug!(item_name = %form.item_name, "restock_inventory command");

    let batch = form.into_batch()?;
    let id = InventoryId::generate();

    let data = app
        .store()
        .apply({
            let id = id.clone();
            move |data| data.with_restock(batch, id)
        })
        .await?;

    let item = data
        .find_batch(&id)
        .cloned()
        .ok_or_else(|| ApiError::internal("Restocked batch missing after save"))?;

    info!(
        batch_id = %item.id,
        item_name = %item.item_name,
        qty = item.qty_received,
        "Inventory restocked"
    );
    Ok(item)
}

/// Inventory screen: batches grouped by item name, filtered by `search`.
pub async fn list_stock_groups(app: &App, search: &str) -> Result<Vec<StockGroup>, ApiError> {
    let data = app.store().snapshot().await;
    Ok(stock_groups(&data.inventory, search))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::test_support::app;

    fn form(name: &str, qty: &str) -> RestockForm {
        RestockForm {
            date_purchase: "2024-06-01".to_string(),
            item_name: name.to_string(),
            qty_received: qty.to_string(),
            unit_price: "12.50".to_string(),
            shipping_charge: "1.20".to_string(),
        }
    }

    #[tokio::test]
    async fn test_restock_coerces_and_derives() {
        let app = app().await;
        let item = restock_inventory(&app, form("  Desk Lamp ", "8")).await.unwrap();

        assert_eq!(item.item_name, "Desk Lamp");
        assert_eq!(item.current_qty, 8);
        assert_eq!(item.total_unit_cost.sen(), 1_370);
    }

    #[tokio::test]
    async fn test_blank_numbers_become_zero() {
        let app = app().await;
        let mut f = form("Sticker", "");
        f.unit_price = String::new();

        let item = restock_inventory(&app, f).await.unwrap();
        assert_eq!(item.qty_received, 0);
        assert!(item.unit_price.is_zero());
    }

    #[tokio::test]
    async fn test_rejects_missing_name() {
        let app = app().await;
        let err = restock_inventory(&app, form("", "1")).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(app.store().snapshot().await.inventory.is_empty());
    }

    #[tokio::test]
    async fn test_list_stock_groups() {
        let app = app().await;
        restock_inventory(&app, form("Desk Lamp", "2")).await.unwrap();
        restock_inventory(&app, form("Mouse Pad", "5")).await.unwrap();
        restock_inventory(&app, form("Desk Lamp", "3")).await.unwrap();

        let groups = list_stock_groups(&app, "lamp").await.unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].total_qty, 5);
        assert_eq!(groups[0].batches.len(), 2);
    }
}
