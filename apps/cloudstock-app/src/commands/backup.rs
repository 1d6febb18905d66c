//! # Backup Commands
//!
//! Manual cross-device sync: export the records to a JSON file on one
//! device, restore it on another.
//!
//! ## Restore Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  read file ──✗──► IO_ERROR      "Could not read file"                  │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  decode_backup ──✗──► BACKUP_ERROR  "Could not read file"              │
//! │      │                              "Invalid backup file"              │
//! │      ▼                                                                  │
//! │  confirm(preview)? ──no──► Cancelled (records untouched)               │
//! │      │                                                                  │
//! │      ▼ yes                                                              │
//! │  store.apply(|_| restored) ──► Restored                                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The restore replaces everything, including records created since the
//! backup was taken.

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use cloudstock_core::backup::{backup_file_name, decode_backup, encode_backup};

use crate::error::{ApiError, ErrorCode};
use crate::App;

#[derive(Debug, Clone, Serialize)]
pub struct ExportResult {
    pub path: PathBuf,
    pub file_name: String,
}

/// Writes `cloudstock_backup_<today>.json` into `dir`, or the configured
/// backup directory. An existing file from the same day is overwritten.
pub async fn export_backup(app: &App, dir: Option<PathBuf>) -> Result<ExportResult, ApiError> {
    let dir = match dir {
        Some(dir) => dir,
        None => app.config().backup_dir()?,
    };
    debug!(?dir, "export_backup command");

    let data = app.store().snapshot().await;
    let text = encode_backup(&data)?;

    let file_name = backup_file_name(chrono::Local::now().date_naive());
    let path = dir.join(&file_name);

    tokio::fs::create_dir_all(&dir).await?;
    tokio::fs::write(&path, text).await?;

    info!(?path, sales = data.sales.len(), "Backup exported");
    Ok(ExportResult { path, file_name })
}

/// What the confirmation prompt shows before anything is replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BackupPreview {
    pub inventory: usize,
    pub sales: usize,
    pub expenses: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RestoreOutcome {
    Restored(BackupPreview),
    Cancelled,
}

/// Replaces all records with the backup at `path` once `confirm` agrees.
pub async fn restore_backup<F>(app: &App, path: &Path, confirm: F) -> Result<RestoreOutcome, ApiError>
where
    F: FnOnce(&BackupPreview) -> bool,
{
    debug!(?path, "restore_backup command");

    let text = tokio::fs::read_to_string(path).await.map_err(|e| {
        warn!(?path, error = %e, "Backup file unreadable");
        ApiError::new(ErrorCode::IoError, "Could not read file")
    })?;

    let restored = decode_backup(&text)?;
    let preview = BackupPreview {
        inventory: restored.inventory.len(),
        sales: restored.sales.len(),
        expenses: restored.expenses.len(),
    };

    if !confirm(&preview) {
        info!("Restore cancelled");
        return Ok(RestoreOutcome::Cancelled);
    }

    app.store().apply(|_| restored).await?;

    info!(
        inventory = preview.inventory,
        sales = preview.sales,
        expenses = preview.expenses,
        "Records restored from backup"
    );
    Ok(RestoreOutcome::Restored(preview))
}
