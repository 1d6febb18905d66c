//! # Settings Repository
//!
//! The local lock passcode. It is a convenience lock for a shared screen,
//! stored as entered; it does not protect the data at rest.

use sqlx::SqlitePool;
use tracing::info;

use cloudstock_core::validation::validate_passcode;

use crate::error::DbResult;
use crate::repository::snapshot::SnapshotRepository;

/// Key of the passcode entry.
pub const PASSCODE_KEY: &str = "cloudstock_passcode";

#[derive(Debug, Clone)]
pub struct SettingsRepository {
    slot: SnapshotRepository,
}

impl SettingsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SettingsRepository {
            slot: SnapshotRepository::new(pool),
        }
    }

    /// The configured passcode, if the lock is enabled.
    pub async fn passcode(&self) -> DbResult<Option<String>> {
        self.slot.load_raw(PASSCODE_KEY).await
    }

    /// Enables the lock or changes its passcode.
    pub async fn set_passcode(&self, passcode: &str) -> DbResult<()> {
        validate_passcode(passcode)?;
        self.slot.save_raw(PASSCODE_KEY, passcode).await?;
        info!("Passcode lock enabled");
        Ok(())
    }

    /// Disables the lock.
    pub async fn clear_passcode(&self) -> DbResult<()> {
        if self.slot.delete(PASSCODE_KEY).await? {
            info!("Passcode lock disabled");
        }
        Ok(())
    }

    /// Checks an unlock attempt. With no passcode set, everything unlocks.
    pub async fn verify_passcode(&self, attempt: &str) -> DbResult<bool> {
        Ok(match self.passcode().await? {
            Some(stored) => stored == attempt,
            None => true,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::error::DbError;
    use crate::{Database, DbConfig};

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_no_passcode_unlocks() {
        let settings = db().await.settings();
        assert!(settings.passcode().await.unwrap().is_none());
        assert!(settings.verify_passcode("anything").await.unwrap());
    }

    #[tokio::test]
    async fn test_set_and_verify() {
        let settings = db().await.settings();
        settings.set_passcode("4821").await.unwrap();

        assert!(settings.verify_passcode("4821").await.unwrap());
        assert!(!settings.verify_passcode("1111").await.unwrap());

        settings.clear_passcode().await.unwrap();
        assert!(settings.verify_passcode("1111").await.unwrap());
    }

    #[tokio::test]
    async fn test_rejects_short_passcode() {
        let settings = db().await.settings();
        let err = settings.set_passcode("12").await.unwrap_err();

        assert!(matches!(err, DbError::Validation(_)));
        assert!(settings.passcode().await.unwrap().is_none());
    }
}
