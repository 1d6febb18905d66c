//! # CloudStock App Library
//!
//! The command layer the web frontend calls into.
//!
//! ## Module Organization
//! ```text
//! cloudstock_app/
//! ├── lib.rs          ◄─── You are here (App bootstrap & logging)
//! ├── config.rs       ◄─── AppConfig (TOML + env overrides)
//! ├── error.rs        ◄─── API error type for commands
//! └── commands/
//!     ├── mod.rs      ◄─── Command exports
//!     ├── inventory.rs◄─── Restock and stock list
//!     ├── sale.rs     ◄─── Sales entry, search, refunds
//!     ├── expense.rs  ◄─── Expense entry and totals
//!     ├── report.rs   ◄─── Dashboard, trend, annual report
//!     ├── import.rs   ◄─── Simulated platform import
//!     ├── backup.rs   ◄─── Export / restore
//!     └── settings.rs ◄─── Passcode lock
//! ```
//!
//! ## Shared State
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  App                                                                    │
//! │  ├── config: AppConfig    read-only after startup                      │
//! │  ├── db: Database         settings repository                          │
//! │  └── store: RecordStore   every read and write of the records          │
//! │                                                                         │
//! │  Commands take `&App`; wrap it in an `Arc` to share across tasks.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod config;
pub mod error;

use tracing::info;
use tracing_subscriber::EnvFilter;

use cloudstock_db::{Database, DbConfig, RecordStore};

use config::AppConfig;
use error::ApiError;

/// Handles every command needs.
#[derive(Debug)]
pub struct App {
    config: AppConfig,
    db: Database,
    store: RecordStore,
}

impl App {
    /// Opens the configured database and loads the records.
    ///
    /// ## Startup Sequence
    /// ```text
    /// 1. Resolve database path ── CLOUDSTOCK_DB_PATH or platform data dir
    /// 2. Create parent directory
    /// 3. Connect (WAL) and run migrations
    /// 4. Load the aggregate into the RecordStore
    /// ```
    pub async fn bootstrap(config: AppConfig) -> Result<Self, ApiError> {
        let db_path = config.database_path()?;
        if let Some(parent) = db_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        info!(?db_path, "Database path determined");

        let db = Database::new(DbConfig::new(db_path)).await?;
        info!("Database connected and migrations applied");

        Self::with_database(config, db).await
    }

    /// Builds the app on an already open database.
    pub async fn with_database(config: AppConfig, db: Database) -> Result<Self, ApiError> {
        let store = RecordStore::open(&db).await?;
        info!(business = %config.business.name, "CloudStock ready");
        Ok(App { config, db, store })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=cloudstock_db=trace` - Trace the store only
/// - Default: INFO, DEBUG for CloudStock crates
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,cloudstock=debug,sqlx=warn"));

    // A second call (tests, embedding hosts) keeps the first subscriber.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// An app on a private in-memory database with no import delay.
    pub async fn app() -> App {
        let mut config = AppConfig::default();
        config.import.delay_ms = 0;

        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        App::with_database(config, db).await.unwrap()
    }
}
