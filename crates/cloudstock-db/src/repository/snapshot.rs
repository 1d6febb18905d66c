//! # Snapshot Repository
//!
//! Reads and writes raw text documents in the key-value slot. The store
//! keeps the whole aggregate under [`STORAGE_KEY`]; parsing happens one
//! layer up so a corrupt document can be handled there. A document that
//! fails to load is copied to [`UNREADABLE_KEY`] before anything else is
//! written.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;

/// Key of the aggregate document.
pub const STORAGE_KEY: &str = "cloudstock_data";

/// Where a stored aggregate that no longer loads is set aside.
pub const UNREADABLE_KEY: &str = "cloudstock_data.unreadable";

/// Repository for raw documents in `kv_store`.
#[derive(Debug, Clone)]
pub struct SnapshotRepository {
    pool: SqlitePool,
}

impl SnapshotRepository {
    /// Creates a new SnapshotRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SnapshotRepository { pool }
    }

    /// Returns the document stored under `key`, if any.
    pub async fn load_raw(&self, key: &str) -> DbResult<Option<String>> {
        let value: Option<String> = sqlx::query_scalar("SELECT value FROM kv_store WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        debug!(key = %key, found = value.is_some(), "Loaded document");
        Ok(value)
    }

    /// Writes `value` under `key`, replacing any previous document.
    pub async fn save_raw(&self, key: &str, value: &str) -> DbResult<()> {
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        debug!(key = %key, bytes = value.len(), "Saved document");
        Ok(())
    }

    /// Removes the document under `key`. Returns true if one existed.
    pub async fn delete(&self, key: &str) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM kv_store WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
