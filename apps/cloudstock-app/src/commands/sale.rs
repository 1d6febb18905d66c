//! # Sale Commands

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use cloudstock_core::query::{self, SalesFilter};
use cloudstock_core::validation::{coerce_money, validate_date};
use cloudstock_core::{
    generate_id, CoreError, InventoryId, NewSale, Platform, RefundOutcome, RefundPolicy, Sale,
};

use crate::commands::today;
use crate::error::ApiError;
use crate::App;

/// Manual sale entry. The item name comes from the referenced batch, and
/// so does the cost unless `cogs` is filled in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleForm {
    pub inventory_id: String,
    /// Blank means today.
    #[serde(default)]
    pub sale_date: String,
    #[serde(default)]
    pub selling_price: String,
    #[serde(default)]
    pub platform_fee: String,
    /// Blank means the batch's unit cost.
    #[serde(default)]
    pub cogs: String,
    #[serde(default)]
    pub tracking_num: String,
    #[serde(default)]
    pub username_buyer: String,
    #[serde(default)]
    pub sku_ref_no: String,
    pub platform: Platform,
}

/// Records a sale against an existing batch.
///
/// The batch's `current_qty` is not reduced.
pub async fn record_sale(app: &App, form: SaleForm) -> Result<Sale, ApiError> {
    debug!(inventory_id = %form.inventory_id, platform = %form.platform, "record_sale command");

    let sale_date = if form.sale_date.trim().is_empty() {
        today()
    } else {
        validate_date("sale_date", &form.sale_date)?;
        form.sale_date.clone()
    };
    let inventory_id = InventoryId::new(form.inventory_id.clone());

    let sale = app
        .store()
        .apply_with(move |data| {
            let Some(batch) = data.find_batch(&inventory_id) else {
                return (data, Err(CoreError::BatchNotFound(form.inventory_id)));
            };

            let cogs = if form.cogs.trim().is_empty() {
                batch.total_unit_cost
            } else {
                coerce_money(&form.cogs)
            };

            let sale = Sale::record(
                NewSale {
                    item_name: batch.item_name.clone(),
                    inventory_id,
                    sale_date,
                    selling_price: coerce_money(&form.selling_price),
                    cogs,
                    platform_fee: coerce_money(&form.platform_fee),
                    tracking_num: form.tracking_num,
                    username_buyer: form.username_buyer,
                    sku_ref_no: form.sku_ref_no,
                    platform: form.platform,
                },
                generate_id(),
            );
            (data.with_sale(sale.clone()), Ok(sale))
        })
        .await??;

    info!(
        sale_id = %sale.id,
        platform = %sale.platform,
        price = %sale.selling_price,
        "Sale recorded"
    );
    Ok(sale)
}

/// Sales screen: filtered by platform and text, newest first.
pub async fn search_sales(app: &App, filter: SalesFilter) -> Result<Vec<Sale>, ApiError> {
    let data = app.store().snapshot().await;
    Ok(query::search_sales(&data.sales, &filter)
        .into_iter()
        .cloned()
        .collect())
}

/// Refunds a sale.
///
/// `return_to_stock` puts one unit back on the referenced batch; otherwise
/// the cost of goods is written off. An unknown sale id changes nothing.
pub async fn refund_sale(
    app: &App,
    sale_id: &str,
    return_to_stock: bool,
) -> Result<RefundOutcome, ApiError> {
    debug!(sale_id = %sale_id, return_to_stock, "refund_sale command");

    let policy = RefundPolicy::from_return_flag(return_to_stock);
    let outcome = app
        .store()
        .apply_with(|data| data.with_refund(sale_id, policy))
        .await?;

    match &outcome {
        RefundOutcome::Refunded { restocked } => {
            info!(sale_id = %sale_id, restocked, "Sale refunded");
        }
        RefundOutcome::RefundedBatchMissing { inventory_id } => {
            warn!(
                sale_id = %sale_id,
                inventory_id = %inventory_id,
                "Sale refunded but its batch no longer exists; stock not restored"
            );
        }
        RefundOutcome::SaleNotFound => {
            warn!(sale_id = %sale_id, "Refund requested for unknown sale");
        }
    }

    Ok(outcome)
}
