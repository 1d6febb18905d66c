//! # cloudstock-db: Persistence Layer for CloudStock
//!
//! This crate owns the bookkeeping aggregate at runtime and its durable
//! copy in SQLite.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        CloudStock Data Flow                             │
//! │                                                                         │
//! │  App command (record_sale)                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  cloudstock-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │  RecordStore  │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │  (store.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │───►│ SnapshotRepo  │    │ 001_initial  │  │   │
//! │  │   │ Mutex<AppData>│    │ SettingsRepo  │    │ _schema.sql  │  │   │
//! │  │   └───────────────┘    └───────┬───────┘    └──────────────┘  │   │
//! │  │                                │                                │   │
//! │  │                        ┌───────▼───────┐                        │   │
//! │  │                        │   Database    │                        │   │
//! │  │                        │   (pool.rs)   │                        │   │
//! │  │                        └───────────────┘                        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │          <platform data dir>/cloudstock.db                      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`store`] - The record store (`apply(updater)`)
//! - [`repository`] - Key-value slot repositories
//! - [`migrations`] - Embedded SQL migrations
//! - [`error`] - Database error types
//!
//! ## Usage
//! ```rust,ignore
//! let db = Database::new(DbConfig::new("./cloudstock.db")).await?;
//! let store = RecordStore::open(&db).await?;
//!
//! store.apply(|data| data.with_new_expense(expense)).await?;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod store;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::settings::{SettingsRepository, PASSCODE_KEY};
pub use repository::snapshot::{SnapshotRepository, STORAGE_KEY, UNREADABLE_KEY};
pub use store::RecordStore;
