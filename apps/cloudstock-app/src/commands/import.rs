//! # Platform Import
//!
//! A stand-in for marketplace order import. No external API is called:
//! after a fixed delay one mock order is synthesized and recorded.
//!
//! ## Timeline
//! ```text
//!  t=0            import_from_platform(Shopee) called
//!  │              (other commands keep running)
//!  t=delay_ms     store.apply_with(..)
//!  │                ├── inventory reference = newest batch in the
//!  │                │   CURRENT records, or a fresh dangling id
//!  │                └── sale prepended
//!  ▼
//!  ImportResult
//! ```
//!
//! The mock order is built inside the store update, so anything recorded
//! during the delay is kept and can be referenced.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use std::time::Duration;
use tracing::{debug, info};

use cloudstock_core::{
    generate_id, AppData, InventoryId, Money, Platform, Sale, SaleStatus,
};

use crate::commands::today;
use crate::error::ApiError;
use crate::App;

/// Where the mock order claims to come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImportSource {
    Shopee,
    Lazada,
    /// The owner's master spreadsheet; orders are recorded as Offline.
    Master,
}

impl ImportSource {
    pub const fn platform(&self) -> Platform {
        match self {
            ImportSource::Shopee => Platform::Shopee,
            ImportSource::Lazada => Platform::Lazada,
            ImportSource::Master => Platform::Offline,
        }
    }
}

impl fmt::Display for ImportSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ImportSource::Shopee => "Shopee",
            ImportSource::Lazada => "Lazada",
            ImportSource::Master => "Master",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportResult {
    pub source: ImportSource,
    pub imported: usize,
    pub sale: Sale,
    /// Status line for the import screen.
    pub message: String,
}

/// Waits the configured delay, then records one mock order.
pub async fn import_from_platform(app: &App, source: ImportSource) -> Result<ImportResult, ApiError> {
    let delay = Duration::from_millis(app.config().import.delay_ms);
    debug!(%source, ?delay, "import_from_platform command");

    tokio::time::sleep(delay).await;

    let sale = app
        .store()
        .apply_with(|data| {
            let sale = mock_order(&data, source);
            (data.with_sale(sale.clone()), sale)
        })
        .await?;

    info!(
        %source,
        sale_id = %sale.id,
        inventory_id = %sale.inventory_id,
        "Imported mock order"
    );

    Ok(ImportResult {
        source,
        imported: 1,
        message: format!("Successfully imported 1 record from {}.", source),
        sale,
    })
}

/// Mock selling price in sen: 150.00 up to, but never reaching, 200.00.
const MOCK_PRICE_SEN: Range<i64> = 15_000..20_000;

/// Synthesizes one delivered order.
///
/// Price is random in [`MOCK_PRICE_SEN`]; cost, fee, payout and margin are
/// fixed figures.
fn mock_order(data: &AppData, source: ImportSource) -> Sale {
    let mut rng = rand::thread_rng();

    let inventory_id = data
        .inventory
        .first()
        .map(|batch| batch.id.clone())
        .unwrap_or_else(InventoryId::generate);

    Sale {
        id: generate_id(),
        inventory_id,
        item_name: format!("Mock Imported Item {}", rng.gen_range(0..100)),
        sale_date: today(),
        selling_price: Money::from_sen(rng.gen_range(MOCK_PRICE_SEN)),
        cogs: Money::from_sen(8_000),
        platform_fee: Money::from_sen(1_500),
        selling_earn: Money::from_sen(13_500),
        margin_earn: Money::from_sen(5_500),
        tracking_num: format!("MY{}", random_base36(&mut rng, 8).to_uppercase()),
        username_buyer: format!("buyer_{}", random_base36(&mut rng, 4)),
        sku_ref_no: "SKU-999".to_string(),
        platform: source.platform(),
        status: SaleStatus::Delivered,
    }
}

fn random_base36(rng: &mut impl Rng, len: usize) -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    (0..len)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::expense::{record_expense, ExpenseForm};
    use crate::commands::inventory::{restock_inventory, RestockForm};
    use crate::test_support::app;
    use cloudstock_core::ExpenseType;

    #[tokio::test]
    async fn test_import_shape() {
        let app = app().await;
        let result = import_from_platform(&app, ImportSource::Shopee).await.unwrap();
        let sale = &result.sale;

        assert_eq!(result.message, "Successfully imported 1 record from Shopee.");
        assert_eq!(sale.platform, Platform::Shopee);
        assert_eq!(sale.status, SaleStatus::Delivered);
        assert!(MOCK_PRICE_SEN.contains(&sale.selling_price.sen()));
        assert_eq!(sale.cogs.sen(), 8_000);
        assert_eq!(sale.margin_earn.sen(), 5_500);
        assert_eq!(sale.sku_ref_no, "SKU-999");
        assert_eq!(sale.sale_date, today());

        assert_eq!(sale.tracking_num.len(), 10);
        assert!(sale.tracking_num.starts_with("MY"));
        assert!(!sale.tracking_num.chars().any(|c| c.is_ascii_lowercase()));
        assert_eq!(sale.username_buyer.len(), "buyer_".len() + 4);
    }

    #[test]
    fn test_mock_price_stays_below_two_hundred() {
        assert!(!MOCK_PRICE_SEN.contains(&20_000));

        let data = AppData::default();
        for _ in 0..500 {
            let sale = mock_order(&data, ImportSource::Shopee);
            let price = sale.selling_price.sen();
            assert!((15_000..20_000).contains(&price), "price {price}");
        }
    }

    #[tokio::test]
    async fn test_master_imports_as_offline() {
        let app = app().await;
        let result = import_from_platform(&app, ImportSource::Master).await.unwrap();
        assert_eq!(result.sale.platform, Platform::Offline);
    }

    #[tokio::test]
    async fn test_import_references_newest_batch() {
        let app = app().await;
        let batch = restock_inventory(
            &app,
            RestockForm {
                date_purchase: "2024-06-01".to_string(),
                item_name: "Tumbler".to_string(),
                qty_received: "5".to_string(),
                ..RestockForm::default()
            },
        )
        .await
        .unwrap();

        let result = import_from_platform(&app, ImportSource::Lazada).await.unwrap();
        assert_eq!(result.sale.inventory_id, batch.id);
    }

    #[tokio::test]
    async fn test_import_without_inventory_dangles() {
        let app = app().await;
        let result = import_from_platform(&app, ImportSource::Shopee).await.unwrap();

        let data = app.store().snapshot().await;
        assert!(data.find_batch(&result.sale.inventory_id).is_none());
        assert_eq!(data.sales[0].id, result.sale.id);
    }

    #[tokio::test]
    async fn test_concurrent_write_is_not_lost() {
        let app = app().await;

        let (imported, expense) = tokio::join!(
            import_from_platform(&app, ImportSource::Shopee),
            record_expense(
                &app,
                ExpenseForm {
                    date_spent: "2024-06-01".to_string(),
                    category: "Packaging".to_string(),
                    description: String::new(),
                    amount: "3".to_string(),
                    kind: ExpenseType::Operating,
                },
            )
        );
        imported.unwrap();
        expense.unwrap();

        let data = app.store().snapshot().await;
        assert_eq!(data.sales.len(), 1);
        assert_eq!(data.expenses.len(), 1);
    }
}
