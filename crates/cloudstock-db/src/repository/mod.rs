//! # Repository Module
//!
//! Database repository implementations for CloudStock.
//!
//! ## Storage Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         kv_store table                                  │
//! │                                                                         │
//! │  RecordStore                                                           │
//! │       │  load / persist whole aggregate                                │
//! │       ▼                                                                 │
//! │  SnapshotRepository ──► key "cloudstock_data"      (JSON document)     │
//! │                                                                         │
//! │  App settings commands                                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SettingsRepository ──► key "cloudstock_passcode"  (lock passcode)     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`SnapshotRepository`](snapshot::SnapshotRepository) - raw document slot
//! - [`SettingsRepository`](settings::SettingsRepository) - passcode lock

pub mod settings;
pub mod snapshot;
