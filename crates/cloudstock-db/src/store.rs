//! # Record Store
//!
//! The single owner of the [`AppData`] aggregate. Every write goes through
//! [`RecordStore::apply`], which runs an updater against the latest value,
//! persists the result and only then publishes it.
//!
//! ## Write Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  command ──► store.apply(|data| data.with_sale(sale))                  │
//! │                    │                                                    │
//! │                    ▼                                                    │
//! │             ┌─────────────┐                                            │
//! │             │ lock Mutex  │  one writer at a time                      │
//! │             └──────┬──────┘                                            │
//! │                    ▼                                                    │
//! │          next = updater(current.clone())                               │
//! │                    │                                                    │
//! │         unchanged? ├──► yes: nothing to write                          │
//! │                    ▼                                                    │
//! │          save JSON under "cloudstock_data"                             │
//! │                    │                                                    │
//! │             failed? ├──► yes: keep current, return DbError             │
//! │                    ▼                                                    │
//! │          current = next   (visible to readers)                         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Because the updater receives the value under the lock, two overlapping
//! writers (for example a delayed import and a manual sale) both land; the
//! second one sees the first one's result.

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use cloudstock_core::AppData;

use crate::error::DbResult;
use crate::pool::Database;
use crate::repository::snapshot::{SnapshotRepository, STORAGE_KEY, UNREADABLE_KEY};

/// In-memory aggregate plus its durable copy.
#[derive(Debug)]
pub struct RecordStore {
    current: Mutex<AppData>,
    snapshots: SnapshotRepository,
}

impl RecordStore {
    /// Loads the aggregate from the database.
    ///
    /// A missing document starts empty. A document that does not load,
    /// whether broken JSON or a single record of the wrong shape, is first
    /// copied to [`UNREADABLE_KEY`] and the store starts empty. The next
    /// write replaces [`STORAGE_KEY`] only; the copy stays for recovery.
    pub async fn open(db: &Database) -> DbResult<Self> {
        let snapshots = db.snapshots();

        let data = match snapshots.load_raw(STORAGE_KEY).await? {
            None => {
                info!("No stored records, starting empty");
                AppData::default()
            }
            Some(text) => match serde_json::from_str::<AppData>(&text) {
                Ok(data) => {
                    info!(
                        inventory = data.inventory.len(),
                        sales = data.sales.len(),
                        expenses = data.expenses.len(),
                        "Loaded stored records"
                    );
                    data
                }
                Err(e) => {
                    snapshots.save_raw(UNREADABLE_KEY, &text).await?;
                    warn!(
                        error = %e,
                        key = UNREADABLE_KEY,
                        "Stored records are unreadable, set aside and starting empty"
                    );
                    AppData::default()
                }
            },
        };

        Ok(RecordStore {
            current: Mutex::new(data),
            snapshots,
        })
    }

    /// Returns a copy of the current aggregate.
    pub async fn snapshot(&self) -> AppData {
        self.current.lock().await.clone()
    }

    /// Replaces the aggregate with `updater(latest)` and returns the new value.
    pub async fn apply<F>(&self, updater: F) -> DbResult<AppData>
    where
        F: FnOnce(AppData) -> AppData,
    {
        self.apply_with(|data| {
            let next = updater(data);
            let published = next.clone();
            (next, published)
        })
        .await
    }

    /// Like [`apply`](Self::apply), but the updater also returns a value
    /// computed against the same aggregate it modified.
    pub async fn apply_with<F, T>(&self, updater: F) -> DbResult<T>
    where
        F: FnOnce(AppData) -> (AppData, T),
    {
        let mut current = self.current.lock().await;
        let (next, output) = updater(current.clone());

        if next == *current {
            debug!("Update left records unchanged, skipping write");
            return Ok(output);
        }

        let text = serde_json::to_string(&next)?;
        self.snapshots.save_raw(STORAGE_KEY, &text).await?;

        debug!(
            inventory = next.inventory.len(),
            sales = next.sales.len(),
            expenses = next.expenses.len(),
            "Records persisted"
        );
        *current = next;
        Ok(output)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DbConfig;
    use cloudstock_core::{
        ExpenseType, InventoryId, Money, NewExpense, NewInventoryBatch, RefundOutcome,
        RefundPolicy,
    };
    use std::sync::Arc;

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn expense(description: &str) -> NewExpense {
        NewExpense {
            date_spent: "2024-04-01".to_string(),
            category: "Packaging".to_string(),
            description: description.to_string(),
            amount: Money::from_sen(250),
            kind: ExpenseType::Operating,
        }
    }

    #[tokio::test]
    async fn test_open_empty() {
        let db = db().await;
        let store = RecordStore::open(&db).await.unwrap();
        assert!(store.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn test_apply_persists_across_reopen() {
        let db = db().await;
        let store = RecordStore::open(&db).await.unwrap();

        store
            .apply(|data| {
                data.with_restock(
                    NewInventoryBatch {
                        date_purchase: "2024-04-01".to_string(),
                        item_name: "Tote Bag".to_string(),
                        qty_received: 12,
                        unit_price: Money::from_sen(800),
                        shipping_charge: Money::from_sen(50),
                    },
                    InventoryId::new("tote-1"),
                )
            })
            .await
            .unwrap();

        let reopened = RecordStore::open(&db).await.unwrap();
        let data = reopened.snapshot().await;
        assert_eq!(data.inventory.len(), 1);
        assert_eq!(data.inventory[0].item_name, "Tote Bag");
    }

    #[tokio::test]
    async fn test_unreadable_document_starts_empty() {
        let db = db().await;
        db.snapshots()
            .save_raw(STORAGE_KEY, "{not json")
            .await
            .unwrap();

        let store = RecordStore::open(&db).await.unwrap();
        assert!(store.snapshot().await.is_empty());

        store.apply(|d| d.with_new_expense(expense("first"))).await.unwrap();
        let reopened = RecordStore::open(&db).await.unwrap();
        assert_eq!(reopened.snapshot().await.expenses.len(), 1);

        let set_aside = db.snapshots().load_raw(UNREADABLE_KEY).await.unwrap();
        assert_eq!(set_aside.as_deref(), Some("{not json"));
    }

    #[tokio::test]
    async fn test_mistyped_record_is_set_aside_before_next_write() {
        let db = db().await;
        let original = r#"{
            "inventory": [{"id": "b1", "date_purchase": "2024-01-01", "item_name": "Lamp",
                           "qty_received": "ten", "unit_price": 25.5, "shipping_charge": 0,
                           "total_unit_cost": 25.5, "current_qty": 10, "status": "Onhand"}],
            "sales": [],
            "expenses": [{"id": "e1", "date_spent": "2024-01-02", "category": "Packaging",
                          "description": "Boxes", "amount": 12, "type": "Operating"}],
            "skuMappings": []
        }"#;
        db.snapshots().save_raw(STORAGE_KEY, original).await.unwrap();

        let store = RecordStore::open(&db).await.unwrap();
        assert!(store.snapshot().await.is_empty());

        store.apply(|d| d.with_new_expense(expense("after"))).await.unwrap();

        let set_aside = db.snapshots().load_raw(UNREADABLE_KEY).await.unwrap().unwrap();
        assert_eq!(set_aside, original);
        assert!(set_aside.contains("\"description\": \"Boxes\""));

        let current = db.snapshots().load_raw(STORAGE_KEY).await.unwrap().unwrap();
        assert!(current.contains("after"));
    }

    #[tokio::test]
    async fn test_readable_document_is_not_set_aside() {
        let db = db().await;
        let store = RecordStore::open(&db).await.unwrap();
        store.apply(|d| d.with_new_expense(expense("ok"))).await.unwrap();

        RecordStore::open(&db).await.unwrap();
        assert!(db.snapshots().load_raw(UNREADABLE_KEY).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_apply_with_returns_outcome() {
        let db = db().await;
        let store = RecordStore::open(&db).await.unwrap();

        let outcome = store
            .apply_with(|d| d.with_refund("missing", RefundPolicy::ReturnToStock))
            .await
            .unwrap();
        assert_eq!(outcome, RefundOutcome::SaleNotFound);
        assert!(db.snapshots().load_raw(STORAGE_KEY).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_applies_all_land() {
        let db = db().await;
        let store = Arc::new(RecordStore::open(&db).await.unwrap());

        let mut handles = Vec::new();
        for i in 0..10 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store
                    .apply(move |d| d.with_new_expense(expense(&format!("e{i}"))))
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.snapshot().await.expenses.len(), 10);
        let reopened = RecordStore::open(&db).await.unwrap();
        assert_eq!(reopened.snapshot().await.expenses.len(), 10);
    }

    #[tokio::test]
    async fn test_failed_write_keeps_previous_value() {
        let db = db().await;
        let store = RecordStore::open(&db).await.unwrap();
        store.apply(|d| d.with_new_expense(expense("kept"))).await.unwrap();

        db.close().await;
        let result = store.apply(|d| d.with_new_expense(expense("lost"))).await;

        assert!(result.is_err());
        let data = store.snapshot().await;
        assert_eq!(data.expenses.len(), 1);
        assert_eq!(data.expenses[0].description, "kept");
    }
}
